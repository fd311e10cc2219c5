use crate::error::LinkError;

use super::Endpoint;

/// An endpoint that discards all writes and never receives.
/// Fills the secondary slot of a primary-only [`ChannelTransport`](super::ChannelTransport).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEndpoint;

impl Endpoint for NullEndpoint {
    fn open(&mut self, _baud: u32) {}

    fn close(&mut self) {}

    fn read(&mut self) -> Option<u8> {
        None
    }

    fn peek(&mut self) -> Option<u8> {
        None
    }

    fn available(&self) -> usize {
        0
    }

    fn write(&mut self, _byte: u8) -> Result<(), LinkError> {
        Ok(())
    }

    fn flush(&mut self) {}
}
