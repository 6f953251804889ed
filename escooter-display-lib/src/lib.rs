//! Codec for the 14-byte serial protocol of an e-scooter instrument display.
//!
//! Build a [`Message`], change it through its setters, and hand it to a
//! [`Transmitter`], which stamps the XOR checksum and writes the bytes to any
//! [`FrameSink`].

pub mod constants;
pub mod demo;
pub mod error;
pub mod message;
pub mod packet;
pub mod speed;
pub mod transport;


pub use error::DisplayError;
pub use message::{DisplayFrame, DisplayState};
pub use packet::{LedState, Message, OperationMode};
pub use transport::{ByteSource, FrameSink, Mirror, Transmitter};
