//! Adapters: concrete implementations of the crate's port traits.
//!
//! | Adapter | Implements | Connects to                            |
//! |---------|------------|----------------------------------------|
//! | `delay` | `DelayNs`  | FreeRTOS delay / host thread sleep     |
//! | `uart`  | `Endpoint` | ESP-IDF UART driver / in-memory buffer |

pub mod delay;
pub mod uart;
