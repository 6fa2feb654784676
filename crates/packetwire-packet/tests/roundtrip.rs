//! Packet-level round trip and rejection tests.

#![allow(clippy::unwrap_used)]

use std::io::Cursor;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use packetwire_packet::{
    FieldType, Packet, PacketError, PacketReader, PacketSchema, PacketType, TypeRegistry, Value,
};
use proptest::prelude::*;

fn mixed_registry() -> (TypeRegistry, PacketType) {
    let mut registry = TypeRegistry::new();
    let ty = registry
        .register(
            PacketSchema::builder("Telemetry")
                .int("seq")
                .string("source")
                .float("reading")
                .bytes("blob")
                .int("flags")
                .build()
                .unwrap(),
        )
        .unwrap();
    (registry, ty)
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("NaN never equals itself", |v| !v.is_nan())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_mixed_packet_roundtrip(
        seq in any::<u64>(),
        source in "\\PC{0,32}",
        reading in finite_f64(),
        blob in prop::collection::vec(any::<u8>(), 0..64),
        flags in 0u64..1024,
    ) {
        let (registry, ty) = mixed_registry();
        let packet = Packet::new(
            &ty,
            vec![
                Value::Int(seq),
                Value::Str(source),
                Value::Float(reading),
                Value::Bytes(Bytes::from(blob)),
                Value::Int(flags),
            ],
        )
        .unwrap();

        let wire = packet.serialize(&registry).unwrap();
        let (decoded, rest) = Packet::deserialize(&wire, &registry).unwrap();
        prop_assert_eq!(&decoded, &packet);
        prop_assert!(rest.is_empty());
    }
}

proptest! {
    #[test]
    fn prop_stream_of_packets_decodes_in_order(seqs in prop::collection::vec(any::<u64>(), 0..16)) {
        let (registry, ty) = mixed_registry();
        let mut wire = BytesMut::new();
        for seq in &seqs {
            Packet::builder(&ty)
                .arg(*seq)
                .field("source", "s")
                .field("reading", 1.0)
                .field("blob", Bytes::new())
                .field("flags", 0u64)
                .build()
                .unwrap()
                .serialize_into(&registry, &mut wire)
                .unwrap();
        }

        let mut reader = PacketReader::new(Cursor::new(wire.to_vec()), Arc::new(registry));
        let decoded: Vec<u64> = reader
            .packets()
            .map(|p| p.unwrap().get("seq").and_then(Value::as_int).unwrap())
            .collect();
        prop_assert_eq!(decoded, seqs);
    }
}

#[test]
fn empty_string_and_bytes_roundtrip() {
    let (registry, ty) = mixed_registry();
    let packet = Packet::new(
        &ty,
        vec![
            Value::Int(0),
            Value::from(""),
            Value::Float(-0.0),
            Value::Bytes(Bytes::new()),
            Value::Int(0),
        ],
    )
    .unwrap();

    let wire = packet.serialize(&registry).unwrap();
    let (decoded, _) = Packet::deserialize(&wire, &registry).unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn multibyte_utf8_roundtrip() {
    let (registry, ty) = mixed_registry();
    let packet = Packet::builder(&ty)
        .arg(1u64)
        .arg("größe ☃ 日本")
        .arg(2.5)
        .arg(vec![0xffu8, 0x00])
        .arg(9u64)
        .build()
        .unwrap();

    let wire = packet.serialize(&registry).unwrap();
    let (decoded, _) = Packet::deserialize(&wire, &registry).unwrap();
    assert_eq!(decoded.get("source"), Some(&Value::from("größe ☃ 日本")));
}

#[test]
fn unknown_identifier_is_rejected() {
    let (registry, _) = mixed_registry();

    let mut wire = BytesMut::new();
    packetwire_codec::write_length_delimited(&"Unheard".to_string(), &mut wire);
    packetwire_codec::varint::encode_into(7, &mut wire);

    let err = Packet::deserialize(&wire, &registry).unwrap_err();
    assert!(err.is_unknown_type());
}

#[test]
fn wrong_type_for_every_field_is_rejected() {
    let (_, ty) = mixed_registry();
    let good = vec![
        Value::Int(1),
        Value::from("a"),
        Value::Float(1.0),
        Value::Bytes(Bytes::new()),
        Value::Int(2),
    ];
    let wrong = [
        Value::from("not int"),
        Value::Int(3),
        Value::from("not float"),
        Value::Float(0.5),
        Value::Bytes(Bytes::from_static(b"x")),
    ];

    for (index, bad) in wrong.into_iter().enumerate() {
        let mut values = good.clone();
        let found = bad.field_type();
        values[index] = bad;

        let expected = ty.schema().fields()[index].field_type();
        let err = Packet::new(&ty, values).unwrap_err();
        assert!(
            matches!(
                err,
                PacketError::TypeMismatch { expected: e, found: f, .. } if e == expected && f == found
            ),
            "field {index}: {err}"
        );
    }
    assert_eq!(ty.schema().fields()[0].field_type(), FieldType::Int);
}
