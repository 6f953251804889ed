use crate::constants::{CHECKSUM_OFFSET, LED_BLINK_FLAG, LED_ENABLE, LED_ON_FLAG, MODE_OFFSET, SCREEN_OFF};
use crate::error::DisplayError;
use crate::packet::{LedState, Message, OperationMode};
use crate::speed::rendered_speed;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vehicle state as the application sees it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayState {
    pub mode: OperationMode,
    pub led: LedState,
    pub battery_thousandths: i32,
    pub speed: f64,
}

impl DisplayState {
    /// Write the state into `message`.
    ///
    /// With the lamp off the LED bytes are cleared before the mode is set, so a blank
    /// screen still carries the screen-off value in byte 10. With the lamp on or blinking
    /// the mode goes first so that the LED bytes survive blanking. Battery and speed are
    /// always written, whatever the mode.
    pub fn apply(&self, message: &mut Message) {
        if self.led == LedState::Off {
            message.set_led(LedState::Off);
            message.set_operation_mode(self.mode);
        } else {
            message.set_operation_mode(self.mode);
            message.set_led(self.led);
        }
        message.set_battery(self.battery_thousandths);
        message.set_speed(self.speed);
    }

    /// A fresh default message carrying this state.
    pub fn to_message(&self) -> Message {
        let mut message = Message::new();
        self.apply(&mut message);
        message
    }
}

/// A message interpreted field by field, for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayFrame {
    pub error_code: u8,
    /// `None` when byte 4 holds an unknown code
    pub mode: Option<OperationMode>,
    pub mode_code: u8,
    /// Lamp state as the display will show it. Blink wins over on/off.
    pub led: LedState,
    /// Byte 10 holds the screen-off value
    pub screen_forced_off: bool,
    pub battery_thousandths: u16,
    pub speed_sequence: u16,
    /// Reading the display shows for the sequence, `None` for sequence 0
    pub displayed_speed: Option<f64>,
    pub checksum: u8,
    pub checksum_valid: bool,
}

impl From<&Message> for DisplayFrame {
    fn from(message: &Message) -> Self {
        let bytes = message.as_bytes();
        let [enable, on, blink] = message.led_bytes();
        let led = if blink & LED_BLINK_FLAG != 0 {
            LedState::Blink
        } else if enable == LED_ENABLE && on & LED_ON_FLAG != 0 {
            LedState::On
        } else {
            LedState::Off
        };
        let speed_sequence = message.speed_sequence();
        Self {
            error_code: message.error_code(),
            mode: message.operation_mode().ok(),
            mode_code: bytes[MODE_OFFSET],
            led,
            screen_forced_off: enable == SCREEN_OFF,
            battery_thousandths: message.battery(),
            speed_sequence,
            displayed_speed: rendered_speed(speed_sequence),
            checksum: bytes[CHECKSUM_OFFSET],
            checksum_valid: message.is_checksum_valid(),
        }
    }
}

impl DisplayFrame {
    /// Parse a hex string such as `020e0100010000000...`. Whitespace is ignored.
    pub fn from_hex(hex_data: &str) -> Result<Self, DisplayError> {
        let cleaned: String = hex_data.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = hex::decode(cleaned)?;
        let message = Message::try_from(bytes.as_slice())?;
        Ok(Self::from(&message))
    }
}

impl fmt::Display for DisplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Some(mode) => mode.to_string(),
            None => format!("Unknown ({})", self.mode_code),
        };
        let speed = match self.displayed_speed {
            Some(speed) => format!("{:.1}", speed),
            None => "-".to_string(),
        };
        writeln!(f, "┌─ Display Frame ─────────────────────────────┐")?;
        writeln!(f, "│ Mode:    {:<12} Error:    {:<10} │", mode, self.error_code)?;
        writeln!(
            f,
            "│ LED:     {:<12} Blanked:  {:<10} │",
            self.led.to_string(),
            self.screen_forced_off
        )?;
        writeln!(
            f,
            "│ Battery: {:>5.1} %      Sequence: {:<10} │",
            f64::from(self.battery_thousandths) / 10.0,
            self.speed_sequence
        )?;
        let status = if self.checksum_valid { "ok" } else { "BAD" };
        writeln!(
            f,
            "│ Speed:   {:<12} Checksum: {:#04x} {:<5} │",
            speed, self.checksum, status
        )?;
        write!(f, "└─────────────────────────────────────────────┘")
    }
}
