use crate::constants::*;
use crate::error::DisplayError;
use crate::speed::speed_to_sequence;
use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the display renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum OperationMode {
    /// Screen off
    Blank = 0,
    /// Charging animation driven by the battery field
    Charge = 1,
    /// Numeric speed driven by the speed sequence
    Speed = 2,
}

// Not derived: num_enum would treat a `#[default]` variant as the fallback for unknown codes.
impl Default for OperationMode {
    fn default() -> Self {
        OperationMode::Charge
    }
}

/// Behaviour of the lamp attached to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LedState {
    #[default]
    Off,
    On,
    /// Overlays on the current on/off bytes, see [`Message::set_led`]
    Blink,
}

/// One 14-byte display message.
///
/// ```text
/// 0    start marker 0x02
/// 1-2  constants 0x0E 0x01
/// 3    error code
/// 4    operation mode
/// 5    reserved
/// 6-7  battery thousandths, big-endian
/// 8-9  speed sequence, big-endian
/// 10   LED enable / screen off
/// 11   LED on flag
/// 12   LED blink flag
/// 13   XOR of bytes 0-12
/// ```
///
/// Byte 13 goes stale on every setter. It is only brought up to date by
/// [`Message::finalize`], which every transmit path goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message([u8; NCHAR]);

impl Message {
    /// A message holding the default state.
    pub fn new() -> Self {
        let mut message = Self([0; NCHAR]);
        message.initialize();
        message
    }

    /// A default message reporting `code` in the error byte.
    ///
    /// The display blinks the error while charging and shows it steadily while driving.
    pub fn with_error_code(code: u8) -> Self {
        let mut message = Self([0; NCHAR]);
        message.initialize_with_error(code);
        message
    }

    /// Reset to the default state: charge mode, no error, battery 0, speed sentinel,
    /// LED fields cleared.
    pub fn initialize(&mut self) {
        self.initialize_with_error(NO_ERROR);
    }

    /// Reset to the default state with `code` in the error byte. Header bytes are only
    /// ever written here.
    pub fn initialize_with_error(&mut self, code: u8) {
        self.0[START_OFFSET] = START_MARKER;
        self.0[VERSION_OFFSET] = PROTOCOL_VERSION;
        self.0[RESERVED_2_OFFSET] = RESERVED_2;
        self.0[ERROR_OFFSET] = code;
        self.0[MODE_OFFSET] = OperationMode::Charge.into();
        self.0[RESERVED_5_OFFSET] = RESERVED_5;
        self.write_u16(BATTERY_OFFSET, 0);
        self.write_u16(SPEED_OFFSET, DEFAULT_SPEED_SEQUENCE);
        self.0[LED_ENABLE_OFFSET] = 0x00;
        self.0[LED_ON_OFFSET] = 0x00;
        self.0[LED_BLINK_OFFSET] = 0x00;
        self.0[CHECKSUM_OFFSET] = 0x00;
    }

    /// Set byte 4.
    ///
    /// Blanking also stamps byte 10 with 0xF0: the hardware cannot turn the screen off
    /// while the LED enable value 0xF1 is present. This overwrites whatever `set_led`
    /// put there, and bytes 11-12 are left alone, so a blank screen with the lamp on
    /// needs `set_led` called again after blanking.
    pub fn set_operation_mode(&mut self, mode: OperationMode) {
        trace!(%mode, "set operation mode");
        self.0[MODE_OFFSET] = mode.into();
        if mode == OperationMode::Blank {
            self.0[LED_ENABLE_OFFSET] = SCREEN_OFF;
        }
    }

    /// Set the lamp. `Blink` only ORs the blink flag into byte 12 and keeps bytes 10-11.
    pub fn set_led(&mut self, state: LedState) {
        trace!(%state, "set led");
        match state {
            LedState::Off => {
                self.0[LED_ENABLE_OFFSET] = 0x00;
                self.0[LED_ON_OFFSET] = 0x00;
                self.0[LED_BLINK_OFFSET] = 0x00;
            }
            LedState::On => {
                self.0[LED_ENABLE_OFFSET] = LED_ENABLE;
                self.0[LED_ON_OFFSET] = LED_ON_FLAG;
                self.0[LED_BLINK_OFFSET] = 0x00;
            }
            LedState::Blink => {
                self.0[LED_BLINK_OFFSET] |= LED_BLINK_FLAG;
            }
        }
    }

    /// Battery level in thousandths (0-999). Out of range values are truncated to
    /// 16 bits, not clamped.
    pub fn set_battery(&mut self, thousandths: i32) {
        trace!(thousandths, "set battery");
        self.write_u16(BATTERY_OFFSET, thousandths as u16);
    }

    /// Speed in display units, see [`crate::speed`].
    pub fn set_speed(&mut self, speed: f64) {
        let sequence = speed_to_sequence(speed);
        trace!(speed, sequence, "set speed");
        self.write_u16(SPEED_OFFSET, sequence);
    }

    /// XOR of bytes 0-12.
    pub fn checksum(&self) -> u8 {
        checksum(&self.0)
    }

    /// Store the checksum in byte 13 and return the bytes ready for the wire.
    pub fn finalize(&mut self) -> [u8; NCHAR] {
        self.0[CHECKSUM_OFFSET] = self.checksum();
        self.0
    }

    /// Raw view of the buffer. Byte 13 may be stale.
    pub fn as_bytes(&self) -> &[u8; NCHAR] {
        &self.0
    }

    /// Byte 4 decoded. Errors only for frames parsed off the wire.
    pub fn operation_mode(&self) -> Result<OperationMode, DisplayError> {
        let code = self.0[MODE_OFFSET];
        OperationMode::try_from(code).map_err(|_| DisplayError::UnknownMode(code))
    }

    pub fn error_code(&self) -> u8 {
        self.0[ERROR_OFFSET]
    }

    pub fn battery(&self) -> u16 {
        self.read_u16(BATTERY_OFFSET)
    }

    pub fn speed_sequence(&self) -> u16 {
        self.read_u16(SPEED_OFFSET)
    }

    /// Bytes 10, 11 and 12.
    pub fn led_bytes(&self) -> [u8; 3] {
        [
            self.0[LED_ENABLE_OFFSET],
            self.0[LED_ON_OFFSET],
            self.0[LED_BLINK_OFFSET],
        ]
    }

    /// Whether byte 13 matches the current contents.
    pub fn is_checksum_valid(&self) -> bool {
        self.0[CHECKSUM_OFFSET] == self.checksum()
    }

    fn write_u16(&mut self, offset: usize, value: u16) {
        self.0[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    fn read_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.0[offset], self.0[offset + 1]])
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

/// XOR of every byte except the last one of a frame.
pub fn checksum(frame: &[u8; NCHAR]) -> u8 {
    frame[..CHECKSUM_OFFSET].iter().fold(0, |acc, byte| acc ^ byte)
}

/// Parses a frame received off the wire, checking length, start marker and checksum.
impl TryFrom<&[u8]> for Message {
    type Error = DisplayError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let frame: [u8; NCHAR] = bytes.try_into().map_err(|_| DisplayError::InvalidLength {
            expected: NCHAR,
            actual: bytes.len(),
        })?;
        if frame[START_OFFSET] != START_MARKER {
            return Err(DisplayError::InvalidStartMarker(frame[START_OFFSET]));
        }
        let computed = checksum(&frame);
        let received = frame[CHECKSUM_OFFSET];
        if computed != received {
            return Err(DisplayError::ChecksumMismatch { computed, received });
        }
        Ok(Self(frame))
    }
}

impl TryFrom<Bytes> for Message {
    type Error = DisplayError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        Message::try_from(bytes.as_ref())
    }
}

/// Finalizes a copy, so the produced bytes never carry a stale checksum.
impl From<Message> for Bytes {
    fn from(mut message: Message) -> Self {
        Bytes::copy_from_slice(&message.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes() {
        assert_eq!(u8::from(OperationMode::Blank), 0);
        assert_eq!(u8::from(OperationMode::Charge), 1);
        assert_eq!(u8::from(OperationMode::Speed), 2);
        assert_eq!(OperationMode::try_from(2u8), Ok(OperationMode::Speed));
        assert!(OperationMode::try_from(3u8).is_err());
    }

    #[test]
    fn stale_checksum_is_detected() {
        let mut message = Message::new();
        message.finalize();
        assert!(message.is_checksum_valid());
        message.set_battery(500);
        assert!(!message.is_checksum_valid());
    }

    #[test]
    fn error_code_only_set_at_init() {
        let mut message = Message::with_error_code(7);
        message.set_operation_mode(OperationMode::Speed);
        message.set_led(LedState::On);
        message.set_speed(20.0);
        message.set_battery(100);
        assert_eq!(message.error_code(), 7);
        message.initialize();
        assert_eq!(message.error_code(), NO_ERROR);
    }

    #[test]
    fn initialize_with_error_resets_everything_else() {
        let mut message = Message::new();
        message.set_operation_mode(OperationMode::Blank);
        message.set_led(LedState::Blink);
        message.set_battery(999);
        message.initialize_with_error(0x0A);

        let mut expected = *Message::new().as_bytes();
        expected[ERROR_OFFSET] = 0x0A;
        assert_eq!(message.as_bytes(), &expected);
        assert_eq!(Message::with_error_code(0x0A), message);
    }
}
