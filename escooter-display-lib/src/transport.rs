//! Transport capabilities the codec hands bytes to.
//!
//! The protocol is fire-and-forget: no acknowledgement, no retries. A transport only
//! needs to accept bytes ([`FrameSink`]) and, for the display link, report bytes it
//! receives ([`ByteSource`]). Opening ports and pacing sends is left to the caller.

use crate::packet::Message;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Something that accepts outgoing bytes.
pub trait FrameSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Called with every chunk of bytes a [`ByteSource`] receives.
pub type ReceiveCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// Something that delivers incoming bytes to a callback.
pub trait ByteSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register `callback`. Implementations may invoke it from another thread.
    fn on_receive(&mut self, callback: ReceiveCallback) -> Result<(), Self::Error>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    type Error = S::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }
}

/// Writes every frame to the display first, then to the host link.
pub struct Mirror<D, H> {
    display: D,
    host: H,
}

impl<D, H> Mirror<D, H>
where
    D: FrameSink,
    H: FrameSink<Error = D::Error>,
{
    pub fn new(display: D, host: H) -> Self {
        Self { display, host }
    }

    pub fn into_inner(self) -> (D, H) {
        (self.display, self.host)
    }
}

impl<D, H> FrameSink for Mirror<D, H>
where
    D: FrameSink,
    H: FrameSink<Error = D::Error>,
{
    type Error = D::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.display.write(bytes)?;
        self.host.write(bytes)
    }
}

/// Finalizes messages and writes them to a sink.
pub struct Transmitter<S> {
    sink: S,
    frames_sent: u64,
}

impl<S: FrameSink> Transmitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, frames_sent: 0 }
    }

    /// Recompute the checksum and write all 14 bytes.
    pub fn send(&mut self, message: &mut Message) -> Result<(), S::Error> {
        let frame = message.finalize();
        debug!(bytes = hex::encode(frame), "Display write");
        self.sink.write(&frame)?;
        self.frames_sent += 1;
        Ok(())
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// Forward every byte `source` receives to `sink`.
///
/// Write failures are logged and the relay keeps going.
pub fn relay<Src, K>(source: &mut Src, mut sink: K) -> Result<(), Src::Error>
where
    Src: ByteSource,
    K: FrameSink + Send + 'static,
{
    source.on_receive(Box::new(move |bytes: &[u8]| {
        debug!(bytes = hex::encode(bytes), "Relaying display bytes");
        if let Err(e) = sink.write(bytes) {
            warn!("Failed to relay {} byte(s) to host: {}", bytes.len(), e);
        }
    }))
}

/// In-memory sink recording every write. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write so far, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// All written bytes concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.writes().concat()
    }
}

impl FrameSink for MemorySink {
    type Error = Infallible;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(bytes.to_vec());
        }
        Ok(())
    }
}

/// In-memory source; [`MemorySource::inject`] plays the part of the display.
#[derive(Default)]
pub struct MemorySource {
    callbacks: Vec<ReceiveCallback>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `bytes` to every registered callback.
    pub fn inject(&mut self, bytes: &[u8]) {
        for callback in self.callbacks.iter_mut() {
            callback(bytes);
        }
    }
}

impl ByteSource for MemorySource {
    type Error = Infallible;

    fn on_receive(&mut self, callback: ReceiveCallback) -> Result<(), Self::Error> {
        self.callbacks.push(callback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmitter_counts_frames() {
        let mut transmitter = Transmitter::new(MemorySink::new());
        let mut message = Message::new();
        transmitter.send(&mut message).unwrap();
        transmitter.send(&mut message).unwrap();
        assert_eq!(transmitter.frames_sent(), 2);
        assert_eq!(transmitter.sink().writes().len(), 2);
    }

    #[test]
    fn sink_by_reference() {
        let mut sink = MemorySink::new();
        {
            let mut transmitter = Transmitter::new(&mut sink);
            transmitter.send(&mut Message::new()).unwrap();
        }
        assert_eq!(sink.bytes().len(), 14);
    }
}
