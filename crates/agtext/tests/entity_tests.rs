// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex and edge decoding into reference and user-defined host records.
#![allow(clippy::unwrap_used)]

use agtext::{
    Codec, CodecConfig, CodecError, Core, Edge, EdgeHeader, EdgeReader, EmptyProperties, Entity,
    EntityField, EntityReader, ErrorKind, GraphId, IdRange, Source, Vertex, VertexHeader,
    VertexReader,
};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Edge host that keeps its property object verbatim.
#[derive(Debug, Default)]
struct Knows {
    header: EdgeHeader,
    raw: Vec<u8>,
}

impl Entity for Knows {
    type Reader = EdgeReader;
    type Properties = IgnoredAny;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        self.header.save(core)
    }

    fn save_properties(&mut self, raw: &[u8]) -> Result<(), CodecError> {
        self.raw = raw.to_vec();
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct UserProperties {
    name: String,
    #[serde(default)]
    age: Option<u32>,
}

/// Vertex host filled through the default structured property decode.
#[derive(Debug, Default)]
struct User {
    header: VertexHeader,
    name: String,
    age: Option<u32>,
}

impl Entity for User {
    type Reader = VertexReader;
    type Properties = UserProperties;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        self.header.save(core)
    }

    fn store_properties(&mut self, properties: UserProperties) -> Result<(), CodecError> {
        self.name = properties.name;
        self.age = properties.age;
        Ok(())
    }
}

/// Records which capabilities the codec invoked.
#[derive(Debug, Default)]
struct Probe {
    cores: Vec<Option<String>>,
    properties_calls: usize,
}

impl Entity for Probe {
    type Reader = VertexReader;
    type Properties = IgnoredAny;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        self.cores.push(core.map(|c| c.label().to_owned()));
        Ok(())
    }

    fn save_properties(&mut self, _raw: &[u8]) -> Result<(), CodecError> {
        self.properties_calls += 1;
        Ok(())
    }
}

/// Vertex host that only accepts one label.
#[derive(Debug, Default)]
struct PersonOnly(VertexHeader);

impl Entity for PersonOnly {
    type Reader = VertexReader;
    type Properties = IgnoredAny;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        if let Some(core) = &core {
            if core.label() != "person" {
                return Err(CodecError::host(format!("unexpected label {}", core.label())));
            }
        }
        self.0.save(core)
    }
}

fn lenient() -> Codec {
    Codec::new(CodecConfig::default().with_empty_properties(EmptyProperties::ImplicitEmpty))
}

#[test]
fn vertex_with_properties() {
    let mut v: Vertex = Vertex::default();
    Codec::default()
        .decode_entity(Source::from(r#"v[3.1]{"a":1}"#), &mut v)
        .unwrap();
    assert!(v.header.valid);
    assert_eq!(v.header.label, "v");
    assert_eq!(v.header.id.to_string(), "3.1");
    assert_eq!(v.properties["a"], 1);
}

#[test]
fn label_may_contain_brackets_and_properties_may_contain_braces() {
    let mut v: Vertex = Vertex::default();
    Codec::default()
        .decode_entity(Source::from(r#"a[x][7.2]{"s":"}{"}"#), &mut v)
        .unwrap();
    assert_eq!(v.header.label, "a[x]");
    assert_eq!(v.header.id.to_string(), "7.2");
    assert_eq!(v.properties["s"], "}{");
}

#[test]
fn missing_properties_follow_policy() {
    let mut v: Vertex = Vertex::default();
    let err = Codec::default()
        .decode_entity(Source::from("v[3.1]"), &mut v)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedObject);

    lenient().decode_entity(Source::from("v[3.1]"), &mut v).unwrap();
    assert!(v.header.valid);
    assert!(v.properties.is_empty());
}

#[test]
fn edge_header_ids() {
    let mut e: Edge = Edge::default();
    Codec::default()
        .decode_entity(Source::from("e[4.1][3.1,3.2]{}"), &mut e)
        .unwrap();
    assert_eq!(e.header.label, "e");
    assert_eq!(e.header.id.to_string(), "4.1");
    assert_eq!(e.header.start.to_string(), "3.1");
    assert_eq!(e.header.end.to_string(), "3.2");
    assert!(e.properties.is_empty());
}

#[test]
fn zero_ids_follow_range_policy() {
    let strict = Codec::new(CodecConfig::default().with_id_range(IdRange::NonZero));
    let mut v: Vertex = Vertex::default();
    let err = strict.decode_entity(Source::from("v[0.0]{}"), &mut v).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadEntityRepresentation);
    assert_eq!(err.root().kind(), ErrorKind::BadIdentifierRange);

    Codec::default()
        .decode_entity(Source::from("v[0.0]{}"), &mut v)
        .unwrap();
    assert_eq!(v.header.id.to_string(), "0.0");
}

#[test]
fn whole_input_must_be_consumed() {
    let mut v: Vertex = Vertex::default();
    for text in ["v[3.1]{}x", "v[3.1]{}{}", "v[3.1]{},v[3.2]{}", ""] {
        let err = Codec::default()
            .decode_entity(Source::from(text), &mut v)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadEntityRepresentation, "{text:?}");
    }
}

#[test]
fn unsupported_sources() {
    let mut v: Vertex = Vertex::default();
    for src in [Source::Int(1), Source::Float(3.1), Source::Bool(false)] {
        let err = Codec::default().decode_entity(src, &mut v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedSourceType);
    }
}

#[test]
fn null_source_only_saves_core() {
    let mut probe = Probe::default();
    Codec::default().decode_entity(Source::Null, &mut probe).unwrap();
    assert_eq!(probe.cores, vec![None]);
    assert_eq!(probe.properties_calls, 0);

    Codec::default()
        .decode_entity(Source::from("v[3.1]{}"), &mut probe)
        .unwrap();
    assert_eq!(probe.cores, vec![None, Some("v".to_owned())]);
    assert_eq!(probe.properties_calls, 1);
}

#[test]
fn null_source_resets_reference_record() {
    let codec = Codec::default();
    let mut v: Vertex = Vertex::default();
    codec.decode_entity(Source::from(r#"v[3.1]{"a":1}"#), &mut v).unwrap();
    codec.decode_entity(Source::Null, &mut v).unwrap();
    assert!(v.is_null());
    assert!(v.properties.is_empty());
    assert_eq!(v.to_string(), "NULL");
}

#[test]
fn custom_host_keeps_raw_properties() {
    let mut knows = Knows::default();
    Codec::default()
        .decode_entity(Source::from(r#"knows[4.1][3.1,3.2]{"since": 2020}"#), &mut knows)
        .unwrap();
    assert_eq!(knows.header.label, "knows");
    assert_eq!(knows.raw, br#"{"since": 2020}"#);
}

#[test]
fn custom_host_uses_structured_decode() {
    let mut user = User::default();
    Codec::default()
        .decode_entity(Source::from(r#"user[5.9]{"name":"ann","age":41}"#), &mut user)
        .unwrap();
    assert_eq!(user.header.id.to_string(), "5.9");
    assert_eq!(user.name, "ann");
    assert_eq!(user.age, Some(41));

    let err = Codec::default()
        .decode_entity(Source::from(r#"user[5.9]{"name":1}"#), &mut user)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidProperties);
}

#[test]
fn host_rejections_propagate() {
    let mut person = PersonOnly::default();
    Codec::default()
        .decode_entity(Source::from("person[1.1]{}"), &mut person)
        .unwrap();
    let err = Codec::default()
        .decode_entity(Source::from("robot[1.2]{}"), &mut person)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostCapabilityMismatch);
    assert_eq!(err.to_string(), "host record rejected value: unexpected label robot");
}

#[test]
fn pre_split_edge_is_rejected_by_vertex_host() {
    let codec = Codec::default();
    let data = EdgeReader::read_entity(b"e[4.1][3.1,3.2]{}", codec.config()).unwrap();
    let mut v: Vertex = Vertex::default();
    let err = codec.decode_entity(Source::Entity(data), &mut v).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostCapabilityMismatch);
}

#[test]
fn entity_array_states() {
    let codec = Codec::default();
    assert!(codec.decode_entities::<Vertex>(Source::Null).unwrap().is_none());
    assert!(codec
        .decode_entities::<Vertex>(Source::from("[]"))
        .unwrap()
        .unwrap()
        .is_empty());

    let vs = codec
        .decode_entities::<Vertex>(Source::from(r#"[NULL,v[3.1]{},v[3.2]{"k":[1,2]}]"#))
        .unwrap()
        .unwrap();
    assert_eq!(vs.len(), 3);
    assert!(vs[0].is_null());
    assert_eq!(vs[1].header.id.to_string(), "3.1");
    assert_eq!(vs[2].properties["k"][1], 2);

    let encoded = codec.encode_entities(Some(vs.as_slice())).unwrap().unwrap();
    assert_eq!(encoded, br#"[NULL,v[3.1]{},v[3.2]{"k":[1,2]}]"#);
    assert_eq!(codec.encode_entities::<Vertex>(None).unwrap(), None);
}

#[test]
fn entity_array_errors() {
    let codec = Codec::default();
    for text in ["", "v[3.1]{}", "[v[3.1]{}", "[v[3.1]{},]", "[v[3.1]{} ]", "[v[3.1]]"] {
        let err = codec
            .decode_entities::<Vertex>(Source::from(text))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadSequenceRepresentation, "{text:?}");
    }

    let err = codec
        .decode_entities::<Edge>(Source::from("[e[4.1][3.1,3.2]{},v[3.1]{}]"))
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidSequenceElement { index: 1, .. }));
}

#[test]
fn entity_array_implicit_empty_properties() {
    let vs = lenient()
        .decode_entities::<Vertex>(Source::from("[v[3.1],NULL,v[3.2]]"))
        .unwrap()
        .unwrap();
    assert_eq!(vs.len(), 3);
    assert!(vs[2].properties.is_empty());
    assert_eq!(vs[2].header.id.to_string(), "3.2");
}

#[test]
fn fixed_length_destination() {
    let codec = Codec::default();
    let mut users: [User; 2] = Default::default();
    codec
        .decode_entities_into(
            Source::from(r#"[u[1.1]{"name":"a"},u[1.2]{"name":"b"}]"#),
            &mut users,
        )
        .unwrap();
    assert_eq!(users[1].name, "b");

    let err = codec
        .decode_entities_into(Source::from(r#"[u[1.1]{"name":"a"}]"#), &mut users)
        .unwrap_err();
    assert!(matches!(err, CodecError::SequenceLength { expected: 2, found: 1 }));

    let err = codec.decode_entities_into(Source::Null, &mut users).unwrap_err();
    assert!(matches!(err, CodecError::NullArray));
    assert_eq!(err.kind(), ErrorKind::BadSequenceRepresentation);
}

fn vertex(label: &str) -> Vertex {
    Vertex {
        header: VertexHeader {
            valid: true,
            label: label.into(),
            id: GraphId::parse("3.1").unwrap(),
        },
        ..Vertex::default()
    }
}

#[test]
fn encode_rejects_headers_without_wire_form() {
    let codec = Codec::default();

    let v: Vertex = serde_json::from_str(r#"{"valid":true,"label":"v","id":null}"#).unwrap();
    let err = codec.encode_entity(&v).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidEntityField { kind: "vertex", field: EntityField::Id, .. }
    ));
    assert_eq!(err.kind(), ErrorKind::BadEntityRepresentation);
    assert_eq!(v.to_string(), r#"<invalid vertex ID: bad graphid representation: "NULL">"#);

    let e: Edge = Edge {
        header: EdgeHeader {
            valid: true,
            label: "e".into(),
            id: GraphId::parse("4.1").unwrap(),
            start: GraphId::parse("3.1").unwrap(),
            end: GraphId::NULL,
        },
        ..Edge::default()
    };
    let err = codec.encode_entity(&e).unwrap_err();
    assert!(matches!(err, CodecError::InvalidEntityField { field: EntityField::End, .. }));

    for label in ["", "a\nb", "a[1.1]"] {
        let v = vertex(label);
        let err = codec.encode_entity(&v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadEntityRepresentation, "{label:?}");
    }

    // A bracket that does not open an id is part of the label and survives.
    let v = vertex("a[x]");
    let wire = codec.encode_entity(&v).unwrap().unwrap();
    assert_eq!(wire, b"a[x][3.1]{}");
    let mut back: Vertex = Vertex::default();
    codec.decode_entity(Source::Bytes(&wire), &mut back).unwrap();
    assert_eq!(back.header.label, "a[x]");
}
