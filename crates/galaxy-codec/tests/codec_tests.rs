//! Codec tests: reference encodings, round trips over numbers, nil and
//! nested pairs, and malformed input.

use galaxy_codec::{demodulate, modulate, CodecError};
use galaxy_types::Value;
use pretty_assertions::assert_eq;

fn n(v: i64) -> Value {
    Value::Number(v)
}

// ─────────────────────────────────────────────────────────────────────
// Reference encodings
// ─────────────────────────────────────────────────────────────────────

#[test]
fn reference_numbers() {
    assert_eq!(modulate(&n(1)), "01100001");
    assert_eq!(modulate(&n(2)), "01100010");
    assert_eq!(modulate(&n(-1)), "10100001");
}

#[test]
fn reference_nil_and_pairs() {
    assert_eq!(modulate(&Value::Nil), "00");
    assert_eq!(modulate(&Value::pair(Value::Nil, Value::Nil)), "110000");
    assert_eq!(modulate(&Value::list([n(0)])), "1101000");
    assert_eq!(modulate(&Value::point(1, 2)), "110110000101100010");
}

#[test]
fn reference_lists() {
    assert_eq!(
        modulate(&Value::list([n(1), n(2)])),
        "1101100001110110001000"
    );
    assert_eq!(
        modulate(&Value::list([n(1), Value::list([n(2), n(3)]), n(4)])),
        "1101100001111101100010110110001100110110010000"
    );
}

#[test]
fn demodulate_reference_list() {
    assert_eq!(
        demodulate("1101100001110110001000"),
        Ok(Value::list([n(1), n(2)]))
    );
}

#[test]
fn demodulate_server_greeting() {
    // (1, 0)
    assert_eq!(demodulate("11011000011101000"), Ok(Value::list([n(1), n(0)])));
}

// ─────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────

#[test]
fn numbers_round_trip() {
    let samples = [
        0,
        1,
        -1,
        7,
        8,
        15,
        16,
        -255,
        256,
        1678847,
        123229502148636,
        -123229502148636,
        i64::MAX,
        i64::MIN,
        i64::MIN + 1,
    ];
    for v in samples {
        assert_eq!(demodulate(&modulate(&n(v))), Ok(n(v)), "round trip of {v}");
    }
}

#[test]
fn nested_structures_round_trip() {
    let state = Value::list([
        n(2),
        Value::list([n(1), n(-1)]),
        n(0),
        Value::list([Value::Nil, Value::point(-3, 4)]),
        Value::pair(n(9), n(10)),
    ]);
    assert_eq!(demodulate(&modulate(&state)), Ok(state));
}

#[test]
fn long_list_round_trips_without_recursion() {
    let long = Value::list((0..300_000).map(n).collect::<Vec<_>>());
    let bits = modulate(&long);
    let back = demodulate(&bits).unwrap();
    assert_eq!(back.as_list().map(|items| items.len()), Some(300_000));
    assert!(back == long);
}

// ─────────────────────────────────────────────────────────────────────
// Malformed input
// ─────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_truncated() {
    assert_eq!(
        demodulate(""),
        Err(CodecError::Truncated {
            position: 0,
            needed: 2
        })
    );
}

#[test]
fn unterminated_length_prefix() {
    assert_eq!(
        demodulate("01111"),
        Err(CodecError::UnterminatedLength { position: 2 })
    );
}

#[test]
fn missing_magnitude_bits() {
    assert_eq!(
        demodulate("0110001"),
        Err(CodecError::Truncated {
            position: 4,
            needed: 1
        })
    );
}

#[test]
fn pair_missing_tail() {
    assert!(matches!(
        demodulate("1101100001"),
        Err(CodecError::Truncated { position: 10, .. })
    ));
}

#[test]
fn invalid_characters() {
    assert_eq!(
        demodulate("0110002"),
        Err(CodecError::InvalidCharacter {
            position: 6,
            found: '2'
        })
    );
}

#[test]
fn trailing_bits() {
    assert_eq!(
        demodulate("0001"),
        Err(CodecError::TrailingBits {
            position: 2,
            count: 2
        })
    );
}

#[test]
fn magnitude_overflow() {
    // 2^63 as a positive number
    let bits = format!("01{}0{}", "1".repeat(16), format!("1{}", "0".repeat(63)));
    assert!(matches!(demodulate(&bits), Err(CodecError::Overflow { .. })));
    // 17 nibbles of ones
    let bits = format!("01{}0{}", "1".repeat(17), "1".repeat(68));
    assert!(matches!(demodulate(&bits), Err(CodecError::Overflow { .. })));
}

#[test]
fn error_messages_are_descriptive() {
    let err = demodulate("01111").unwrap_err();
    assert_eq!(err.to_string(), "unterminated length prefix starting at bit 2");
}
