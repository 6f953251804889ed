//! Test pattern that sweeps every field the display can show.
//!
//! One cycle is: speed mode with the lamp on, speeds 0.0 to 98.9 in tenths; the screen
//! blanked for five seconds; charge mode with the lamp blinking, battery 0 to 999.
//! [`DemoSweep`] only produces the messages and how long each should stay on the wire
//! before the next one; sending and sleeping are up to the caller.

use crate::packet::{LedState, Message, OperationMode};
use std::time::Duration;
use strum_macros::Display;

/// Number of speed steps per cycle (0.0 to 98.9)
pub const SPEED_STEPS: u32 = 990;

/// Number of battery steps per cycle (0 to 999)
pub const CHARGE_STEPS: u32 = 1000;

/// Time between sweep steps
pub const STEP_INTERVAL: Duration = Duration::from_millis(100);

/// How long the blank screen is held
pub const BLANK_HOLD: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DemoPhase {
    #[strum(to_string = "speed sweep")]
    SpeedSweep,
    #[strum(to_string = "blank")]
    Blank,
    #[strum(to_string = "charge sweep")]
    ChargeSweep,
}

/// One message of the sweep and how long to wait after sending it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoStep {
    pub phase: DemoPhase,
    pub message: Message,
    pub hold: Duration,
}

/// Endless (or `cycles`-bounded) iterator over the demo pattern.
#[derive(Debug, Clone)]
pub struct DemoSweep {
    message: Message,
    phase: DemoPhase,
    index: u32,
    cycles_completed: u64,
    max_cycles: Option<u64>,
}

impl DemoSweep {
    pub fn new() -> Self {
        Self {
            message: Message::new(),
            phase: DemoPhase::SpeedSweep,
            index: 0,
            cycles_completed: 0,
            max_cycles: None,
        }
    }

    /// Stop after `cycles` complete cycles.
    pub fn cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }
}

impl Default for DemoSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for DemoSweep {
    type Item = DemoStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.max_cycles.is_some_and(|max| self.cycles_completed >= max) {
            return None;
        }

        let phase = self.phase;
        let hold = match phase {
            DemoPhase::SpeedSweep => {
                if self.index == 0 {
                    self.message.set_operation_mode(OperationMode::Speed);
                    self.message.set_led(LedState::On);
                }
                self.message.set_speed(f64::from(self.index) * 0.1);
                self.index += 1;
                if self.index == SPEED_STEPS {
                    self.phase = DemoPhase::Blank;
                    self.index = 0;
                }
                STEP_INTERVAL
            }
            DemoPhase::Blank => {
                self.message.set_operation_mode(OperationMode::Blank);
                self.phase = DemoPhase::ChargeSweep;
                BLANK_HOLD
            }
            DemoPhase::ChargeSweep => {
                if self.index == 0 {
                    self.message.set_operation_mode(OperationMode::Charge);
                    self.message.set_led(LedState::Blink);
                }
                self.message.set_battery(self.index as i32);
                self.index += 1;
                if self.index == CHARGE_STEPS {
                    self.phase = DemoPhase::SpeedSweep;
                    self.index = 0;
                    self.cycles_completed += 1;
                }
                STEP_INTERVAL
            }
        };

        Some(DemoStep {
            phase,
            message: self.message,
            hold,
        })
    }
}
