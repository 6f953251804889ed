//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use escooter_display_lib::constants::*;
#[allow(unused_imports)]
pub use escooter_display_lib::error::DisplayError;
#[allow(unused_imports)]
pub use escooter_display_lib::message::{DisplayFrame, DisplayState};
#[allow(unused_imports)]
pub use escooter_display_lib::packet::{LedState, Message, OperationMode, checksum};
#[allow(unused_imports)]
pub use escooter_display_lib::transport::{
    ByteSource, FrameSink, MemorySink, MemorySource, Mirror, Transmitter, relay,
};
#[allow(unused_imports)]
pub use hex;

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// XOR of bytes 0-12, computed independently of the library
#[allow(dead_code)]
pub fn xor_of_head(frame: &[u8]) -> u8 {
    frame[..NCHAR - 1].iter().fold(0u8, |acc, b| acc ^ b)
}

/// Default message as it leaves the codec
#[allow(dead_code)]
pub const DEFAULT_FRAME: &str = "020e01000100000008f0000000f4";

/// Speed mode, LED on, speed 25.0 (sequence 89, shown as 25.1), battery 80.0 %
#[allow(dead_code)]
pub const DRIVING_FRAME: &str = "020e0100020003200059f1800004";
