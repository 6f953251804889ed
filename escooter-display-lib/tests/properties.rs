//! Property tests over the whole input domain of the setters

mod common;

use common::*;
use proptest::prelude::*;

fn mode_strategy() -> impl Strategy<Value = OperationMode> {
    prop_oneof![
        Just(OperationMode::Blank),
        Just(OperationMode::Charge),
        Just(OperationMode::Speed),
    ]
}

fn led_strategy() -> impl Strategy<Value = LedState> {
    prop_oneof![Just(LedState::Off), Just(LedState::On), Just(LedState::Blink)]
}

proptest! {
    #[test]
    fn finalized_checksum_is_xor_of_head(
        mode in mode_strategy(),
        led in led_strategy(),
        battery in 0i32..1000,
        speed in 0.0f64..100.0,
    ) {
        let mut message = Message::new();
        message.set_operation_mode(mode);
        message.set_led(led);
        message.set_battery(battery);
        message.set_speed(speed);
        let frame = message.finalize();
        prop_assert_eq!(frame[CHECKSUM_OFFSET], xor_of_head(&frame));
        prop_assert_eq!(message.finalize(), frame);
        prop_assert!(Message::try_from(frame.as_slice()).is_ok());
    }

    #[test]
    fn battery_round_trips_in_range(battery in 0i32..1000) {
        let mut message = Message::new();
        message.set_battery(battery);
        prop_assert_eq!(i32::from(message.battery()), battery);
    }

    #[test]
    fn battery_wraps_like_u16(battery in any::<i32>()) {
        let mut message = Message::new();
        message.set_battery(battery);
        prop_assert_eq!(message.battery(), battery as u16);
    }

    #[test]
    fn speed_sequence_non_increasing(a in 0.0f64..200.0, b in 0.0f64..200.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let mut message = Message::new();
        message.set_speed(low);
        let slow = message.speed_sequence();
        message.set_speed(high);
        prop_assert!(message.speed_sequence() <= slow);
    }

    #[test]
    fn blink_only_adds_flag(mode in mode_strategy(), led in led_strategy()) {
        let mut message = Message::new();
        message.set_led(led);
        message.set_operation_mode(mode);
        let before = message.led_bytes();
        message.set_led(LedState::Blink);
        let after = message.led_bytes();
        prop_assert_eq!(&after[..2], &before[..2]);
        prop_assert_eq!(after[2], before[2] | LED_BLINK_FLAG);
    }
}
