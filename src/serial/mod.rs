//! Endpoint abstraction for any byte-oriented serial channel.
//!
//! Concrete implementations:
//! - hardware UART ([`adapters::uart`](crate::adapters::uart))
//! - [`NullEndpoint`], the stand-in for an absent secondary channel
//! - [`ChannelTransport`], which fans out over up to two endpoints
//!
//! Reconfiguration logic is generic over `Endpoint`, so a new channel type
//! needs no changes to the protocols.

pub mod null;
pub mod transport;

pub use null::NullEndpoint;
pub use transport::{ChannelTransport, TransportMode};

use crate::error::LinkError;

/// Byte-oriented serial channel that can be (re)opened at a given speed.
pub trait Endpoint {
    /// Open the channel at `baud`.  Opening an open channel re-initialises it.
    fn open(&mut self, baud: u32);

    /// Close the channel.  Closing a closed channel is a no-op.
    fn close(&mut self);

    /// Take the next received byte, or `None` when nothing is pending.
    fn read(&mut self) -> Option<u8>;

    /// Look at the next received byte without consuming it.
    fn peek(&mut self) -> Option<u8>;

    /// Number of received bytes waiting to be read.
    fn available(&self) -> usize;

    /// Queue one byte for transmission.
    fn write(&mut self, byte: u8) -> Result<(), LinkError>;

    /// Block until queued output has been sent.
    fn flush(&mut self);

    /// Write every byte, even after a failure.  Fails if any byte failed.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        bytes
            .iter()
            .fold(Ok(()), |acc, &b| acc.and(self.write(b)))
    }

    /// Send `text` as-is.
    fn print(&mut self, text: &str) -> Result<(), LinkError> {
        self.write_all(text.as_bytes())
    }

    /// Send `text` followed by CR LF.
    fn println(&mut self, text: &str) -> Result<(), LinkError> {
        let body = self.print(text);
        body.and(self.write_all(b"\r\n"))
    }
}

impl<T: Endpoint + ?Sized> Endpoint for &mut T {
    fn open(&mut self, baud: u32) {
        (**self).open(baud);
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }

    fn peek(&mut self) -> Option<u8> {
        (**self).peek()
    }

    fn available(&self) -> usize {
        (**self).available()
    }

    fn write(&mut self, byte: u8) -> Result<(), LinkError> {
        (**self).write(byte)
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}
