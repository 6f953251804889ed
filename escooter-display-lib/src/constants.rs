// Protocol constants for the e-scooter display

/// Length of every message on the wire (14 bytes)
pub const NCHAR: usize = 14;

/// Baud rate of both the display and host links
pub const BAUD_RATE: u32 = 9600;

/// Start-of-message marker, byte 0. Only 0x02 is accepted by the display.
pub const START_MARKER: u8 = 0x02;

/// Byte 1, constant. No visible effect on the display.
pub const PROTOCOL_VERSION: u8 = 0x0E;

/// Byte 2, constant. No visible effect on the display.
pub const RESERVED_2: u8 = 0x01;

/// Byte 5, constant.
pub const RESERVED_5: u8 = 0x00;

/// Error code meaning "no error"
pub const NO_ERROR: u8 = 0x00;

// Byte offsets
pub const START_OFFSET: usize = 0;
pub const VERSION_OFFSET: usize = 1;
pub const RESERVED_2_OFFSET: usize = 2;
pub const ERROR_OFFSET: usize = 3;
pub const MODE_OFFSET: usize = 4;
pub const RESERVED_5_OFFSET: usize = 5;
pub const BATTERY_OFFSET: usize = 6;
pub const SPEED_OFFSET: usize = 8;
pub const LED_ENABLE_OFFSET: usize = 10;
pub const LED_ON_OFFSET: usize = 11;
pub const LED_BLINK_OFFSET: usize = 12;
pub const CHECKSUM_OFFSET: usize = NCHAR - 1;

/// Byte 10 when the LED lamp is enabled. The screen cannot be blanked while this is set.
pub const LED_ENABLE: u8 = 0xF1;

/// Byte 10 stamped by blanking the screen (screen forced off, LED not enabled)
pub const SCREEN_OFF: u8 = 0xF0;

/// Flag bit in byte 11 that turns the LED lamp on
pub const LED_ON_FLAG: u8 = 0x80;

/// Flag bit in byte 12 that makes the LED lamp blink, overriding on/off
pub const LED_BLINK_FLAG: u8 = 0x80;

/// Speed sequence written at init (0x08F0 = 2288, about 0.9 on the display)
pub const DEFAULT_SPEED_SEQUENCE: u16 = 0x08F0;

/// Numerator of the device's `speed = 2236 / sequence` relation
pub const SPEED_NUMERATOR: f64 = 2236.0;

/// Resolution the display shows speed at
pub const SPEED_STEP: f64 = 0.1;

/// Added to the quantized speed so device-side truncation lands on the intended
/// tenth. Also keeps the divisor non-zero.
pub const SPEED_EPSILON: f64 = 0.05;

/// Highest speed the display can render, found empirically
pub const MAX_DISPLAY_SPEED: f64 = 97.2;

/// Highest battery value the charge animation understands
pub const MAX_BATTERY_THOUSANDTHS: u16 = 999;
