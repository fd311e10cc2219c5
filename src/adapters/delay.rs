//! Blocking delay adapter for settle windows.
//!
//! - **`target_os = "espidf"`**: re-exports `esp_idf_hal`'s `FreeRtos`
//!   delay, which already implements [`DelayNs`].
//! - **`not(target_os = "espidf")`**: [`HostDelay`] sleeps the calling
//!   thread.
//!
//! Settle delays are plain blocking waits; nothing else runs meanwhile.

#[cfg(target_os = "espidf")]
pub use esp_idf_hal::delay::FreeRtos as PlatformDelay;

#[cfg(not(target_os = "espidf"))]
pub use self::host::HostDelay as PlatformDelay;

#[cfg(not(target_os = "espidf"))]
pub use self::host::HostDelay;

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::time::Duration;

    use embedded_hal::delay::DelayNs;

    /// Thread-sleep delay for host builds.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct HostDelay;

    impl HostDelay {
        pub fn new() -> Self {
            Self
        }
    }

    impl DelayNs for HostDelay {
        fn delay_ns(&mut self, ns: u32) {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }

        fn delay_ms(&mut self, ms: u32) {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }

}
