//! Property-based tests for the varint and field codecs.

#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use bytes::BytesMut;
use packetwire_codec::varint::{self, TERMINATOR};
use packetwire_codec::{CodecConfig, CodecError, FieldType, Value};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_varint_roundtrip(n in any::<u64>()) {
        let encoded = varint::encode(n);
        let (decoded, rest) = varint::decode(&encoded).unwrap();
        prop_assert_eq!(decoded, n);
        prop_assert!(rest.is_empty());
    }
}

proptest! {
    #[test]
    fn prop_varint_is_minimal(n in any::<u64>()) {
        let encoded = varint::encode(n);
        let bits = 64 - n.leading_zeros() as usize;
        let expected = if n == 0 { 1 } else { bits.div_ceil(7) };
        prop_assert_eq!(encoded.len(), expected);
        // No redundant leading zero group.
        if encoded.len() > 1 {
            prop_assert_ne!(encoded[0] >> 1, 0);
        }
    }
}

proptest! {
    #[test]
    fn prop_varint_without_terminator_fails(
        bytes in prop::collection::vec(any::<u8>().prop_map(|b| b & !TERMINATOR), 0..9)
    ) {
        let result = varint::decode(&bytes);
        let is_unterminated = matches!(result, Err(CodecError::Unterminated { .. }));
        prop_assert!(is_unterminated);
    }
}

proptest! {
    #[test]
    fn prop_varint_leaves_trailing_bytes(n in any::<u64>(), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut wire = varint::encode(n).to_vec();
        wire.extend_from_slice(&tail);
        let (decoded, rest) = varint::decode(&wire).unwrap();
        prop_assert_eq!(decoded, n);
        prop_assert_eq!(rest, tail.as_slice());
    }
}

proptest! {
    #[test]
    fn prop_string_field_roundtrip(s in ".*") {
        let mut wire = BytesMut::new();
        FieldType::Str.encode(&Value::from(s.as_str()), &mut wire).unwrap();
        let decoded = FieldType::Str
            .decode(&mut Cursor::new(wire.to_vec()), &CodecConfig::default())
            .unwrap();
        prop_assert_eq!(decoded, Value::Str(s));
    }
}

proptest! {
    #[test]
    fn prop_float_field_roundtrip(v in any::<f64>().prop_filter("NaN never equals itself", |v| !v.is_nan())) {
        let mut wire = BytesMut::new();
        FieldType::Float.encode(&Value::Float(v), &mut wire).unwrap();
        prop_assert_eq!(wire.len(), 8);
        let decoded = FieldType::Float
            .decode(&mut Cursor::new(wire.to_vec()), &CodecConfig::default())
            .unwrap();
        prop_assert_eq!(decoded, Value::Float(v));
    }
}
