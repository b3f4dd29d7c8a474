// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph id and graph id array decoding through the public codec.
#![allow(clippy::unwrap_used)]

use agtext::{Codec, CodecConfig, CodecError, ErrorKind, GraphId, IdRange, Source, LOCAL_ID_MAX};
use proptest::prelude::*;

fn ids(codec: &Codec, text: &str) -> Result<Option<Vec<GraphId>>, CodecError> {
    codec.decode_ids(Source::from(text))
}

fn rendered(ids: &[GraphId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

#[test]
fn range_boundaries() {
    let codec = Codec::default();
    let max = format!("{}.{}", u16::MAX, LOCAL_ID_MAX);
    assert_eq!(codec.decode_id(Source::from(max.as_str())).unwrap().to_string(), max);
    assert_eq!(codec.decode_id(Source::from("0.0")).unwrap().to_string(), "0.0");

    for text in ["65536.0", "0.281474976710656", "99999999999999999999.1"] {
        let err = codec.decode_id(Source::from(text)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadIdentifierRange, "{text}");
    }

    let strict = Codec::new(CodecConfig::default().with_id_range(IdRange::NonZero));
    assert_eq!(
        strict.decode_id(Source::from("0.0")).unwrap_err().kind(),
        ErrorKind::BadIdentifierRange
    );
    assert!(strict.decode_id(Source::from("1.1")).is_ok());
}

#[test]
fn canonical_rendering_drops_leading_zeros() {
    let id = Codec::default().decode_id(Source::from("007.0010")).unwrap();
    assert_eq!(id.to_string(), "7.10");
    assert!(id == GraphId::new(7, 10).unwrap());
}

#[test]
fn id_array_states_are_distinct() {
    let codec = Codec::default();
    assert!(codec.decode_ids(Source::Null).unwrap().is_none());
    assert!(ids(&codec, "{}").unwrap().unwrap().is_empty());

    let decoded = ids(&codec, "{NULL,1.1,65535.281474976710655}").unwrap().unwrap();
    assert_eq!(rendered(&decoded), ["NULL", "1.1", "65535.281474976710655"]);
    assert!(decoded[0].is_null());

    let encoded = codec.encode_ids(Some(decoded.as_slice())).unwrap();
    assert_eq!(encoded, b"{NULL,1.1,65535.281474976710655}");
    assert_eq!(codec.encode_ids(Some(&[][..])).unwrap(), b"{}");
    assert_eq!(codec.encode_ids(None), None);
}

#[test]
fn id_array_errors() {
    let codec = Codec::default();
    for text in ["", "1.1", "{1.1", "1.1}", "{1.1,}", "{,1.1}", "{1.1 ,2.2}", "[1.1]"] {
        let err = ids(&codec, text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadSequenceRepresentation, "{text:?}");
    }

    let err = ids(&codec, "{1.1,x.1}").unwrap_err();
    assert!(matches!(err, CodecError::InvalidSequenceElement { index: 1, .. }));
    assert_eq!(err.root().kind(), ErrorKind::BadIdentifierFormat);

    let err = codec.decode_ids(Source::Bool(true)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedSourceType);
}

fn graph_id() -> impl Strategy<Value = GraphId> {
    prop_oneof![
        1 => Just(GraphId::NULL),
        8 => (any::<u16>(), 0..=LOCAL_ID_MAX).prop_map(|(label, local)| {
            GraphId::new(label, local).unwrap()
        }),
    ]
}

/// Equality that treats two NULLs as the same element.
fn same(a: &[GraphId], b: &[GraphId]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x.is_null() && y.is_null()) || x == y)
}

proptest! {
    #[test]
    fn id_text_round_trip(id in graph_id()) {
        let text = id.to_string();
        let back = GraphId::parse(&text).unwrap();
        prop_assert_eq!(back.to_string(), text);
    }

    #[test]
    fn id_array_round_trip(items in prop::option::of(prop::collection::vec(graph_id(), 0..16))) {
        let codec = Codec::default();
        let encoded = codec.encode_ids(items.as_deref());
        let decoded = codec.decode_ids(encoded.as_deref().into()).unwrap();
        match (&items, &decoded) {
            (None, None) => {}
            (Some(a), Some(b)) => prop_assert!(same(a, b), "{:?} != {:?}", a, b),
            _ => prop_assert!(false, "NULL-ness changed: {:?} -> {:?}", items, decoded),
        }
    }
}
