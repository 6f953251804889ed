//! Parsing frames read back off the wire

mod common;

use common::*;

#[test]
fn test_parse_default_frame() {
    let message = Message::try_from(hex_to_bytes(DEFAULT_FRAME)).expect("Failed to parse frame");
    assert_eq!(message, {
        let mut m = Message::new();
        m.finalize();
        m
    });
}

#[test]
fn test_frame_wrong_length() {
    let test_cases = vec![
        (vec![], "Empty frame"),
        (vec![0x02], "1 byte frame"),
        (vec![0x02; 13], "13 byte frame"),
        (vec![0x02; 15], "15 byte frame"),
    ];

    for (bytes_vec, description) in test_cases {
        let len = bytes_vec.len();
        match Message::try_from(bytes_vec.as_slice()) {
            Err(DisplayError::InvalidLength { expected, actual }) => {
                assert_eq!(expected, NCHAR, "{}", description);
                assert_eq!(actual, len, "{}", description);
            }
            Ok(_) => panic!("{}: Expected error but got Ok", description),
            Err(other) => panic!("{}: Expected InvalidLength error, got: {:?}", description, other),
        }
    }
}

#[test]
fn test_frame_bad_start_marker() {
    let mut frame = hex::decode(DEFAULT_FRAME).unwrap();
    frame[0] = 0x03;
    frame[CHECKSUM_OFFSET] = xor_of_head(&frame);
    assert_eq!(
        Message::try_from(frame.as_slice()),
        Err(DisplayError::InvalidStartMarker(0x03))
    );
}

#[test]
fn test_frame_bad_checksum() {
    let mut frame = hex::decode(DEFAULT_FRAME).unwrap();
    frame[CHECKSUM_OFFSET] ^= 0xFF;
    assert_eq!(
        Message::try_from(frame.as_slice()),
        Err(DisplayError::ChecksumMismatch {
            computed: 0xF4,
            received: 0x0B,
        })
    );
}

#[test]
fn test_unknown_mode_is_reported_not_rejected() {
    let mut frame = hex::decode(DEFAULT_FRAME).unwrap();
    frame[MODE_OFFSET] = 0x07;
    frame[CHECKSUM_OFFSET] = xor_of_head(&frame);
    let message = Message::try_from(frame.as_slice()).expect("Frame itself is well formed");
    assert_eq!(message.operation_mode(), Err(DisplayError::UnknownMode(7)));

    let view = DisplayFrame::from(&message);
    assert_eq!(view.mode, None);
    assert_eq!(view.mode_code, 7);
    assert!(view.to_string().contains("Unknown (7)"));
}

#[test]
fn test_display_frame_from_hex() {
    let frame = DisplayFrame::from_hex(DRIVING_FRAME).expect("Failed to decode frame");
    assert_eq!(frame.mode, Some(OperationMode::Speed));
    assert_eq!(frame.led, LedState::On);
    assert!(!frame.screen_forced_off);
    assert_eq!(frame.battery_thousandths, 800);
    assert_eq!(frame.speed_sequence, 89);
    assert_eq!(frame.displayed_speed, Some(25.1));
    assert!(frame.checksum_valid);
}

#[test]
fn test_display_frame_from_spaced_hex() {
    let spaced = "02 0e 01 00 01 00 00 00 08 f0 00 00 00 f4";
    let frame = DisplayFrame::from_hex(spaced).expect("Whitespace should be ignored");
    assert_eq!(frame.mode, Some(OperationMode::Charge));
    assert_eq!(frame.displayed_speed, Some(0.9));
}

#[test]
fn test_display_frame_from_bad_hex() {
    assert!(matches!(
        DisplayFrame::from_hex("02zz"),
        Err(DisplayError::Hex(_))
    ));
}

#[test]
fn test_display_frame_rendering() {
    let frame = DisplayFrame::from_hex(DRIVING_FRAME).unwrap();
    let rendered = frame.to_string();
    assert!(rendered.contains("Speed"));
    assert!(rendered.contains("25.1"));
    assert!(rendered.contains("80.0 %"));
    assert!(rendered.contains("ok"));
}
