use blockyaml::{ConstructContext, Converter, Error, Node, Parser, Value};

/// A converter that upper-cases whatever scalar its tag is applied to.
struct UpperConverter;

impl Converter for UpperConverter {
    type Target = String;

    fn construct_scalar(
        &self,
        node: &Node,
        _ctx: &ConstructContext<'_>,
    ) -> Result<String, Error> {
        let (text, _) = node.as_scalar().expect("dispatched on a scalar");
        Ok(text.to_uppercase())
    }
}

#[test]
fn custom_scalar_converter_applies() {
    let mut parser = Parser::new();
    parser.register_with_tag("!Upper", UpperConverter).unwrap();
    assert_eq!(
        parser.parse_str("!Upper mYGarBaGeCASe").unwrap(),
        Value::Str("MYGARBAGECASE".into())
    );
}

#[test]
fn custom_converter_skips_plain_resolution() {
    let mut parser = Parser::new();
    parser.register_with_tag("!Upper", UpperConverter).unwrap();
    // The tagged scalar is the converter's to interpret; the strict boolean
    // policy only applies to untagged or core-tagged scalars.
    assert_eq!(
        parser.parse_str("!Upper no").unwrap(),
        Value::Str("NO".into())
    );
}

#[test]
fn converter_rejects_node_kinds_it_does_not_support() {
    let mut parser = Parser::new();
    parser.register_with_tag("!Upper", UpperConverter).unwrap();
    let err = parser.parse_str("!Upper [1, 2]").unwrap_err();
    assert!(matches!(err, Error::TypeAssertion { .. }));
    assert!(err.to_string().contains("got a sequence"), "{err}");
}

#[test]
fn unregistered_tag_errors() {
    let parser = Parser::new();
    let err = parser.parse_str("!Unregistered x").unwrap_err();
    assert!(matches!(err, Error::UnknownTag { .. }));
    let msg = err.to_string();
    assert!(msg.contains("`!Unregistered`"), "{msg}");
    assert!(msg.contains("register a converter"), "{msg}");

    let err = parser.parse_str("!.html").unwrap_err();
    assert!(matches!(err, Error::UnknownTag { .. }));
}

#[test]
fn core_tags_force_resolution() {
    let parser = Parser::new();
    assert_eq!(parser.parse_str("!!int 42").unwrap(), Value::Int(42));
    assert_eq!(parser.parse_str("!!int 0x1a").unwrap(), Value::Int(26));
    assert_eq!(parser.parse_str("!!float 1e3").unwrap(), Value::Float(1000.0));
    assert_eq!(parser.parse_str("!!null anything").unwrap(), Value::Null);
    // Quoted scalars resolve too when explicitly tagged.
    assert_eq!(parser.parse_str("!!int '42'").unwrap(), Value::Int(42));
}

#[test]
fn core_tag_mismatch_errors() {
    let parser = Parser::new();
    let err = parser.parse_str("!!int forty-two").unwrap_err();
    assert!(err.to_string().contains("invalid integer"), "{err}");

    let err = parser.parse_str("!!float x").unwrap_err();
    assert!(err.to_string().contains("invalid float"), "{err}");
}

#[test]
fn long_form_core_tags_normalize() {
    let parser = Parser::new();
    assert_eq!(
        parser.parse_str("!<tag:yaml.org,2002:int> 42").unwrap(),
        Value::Int(42)
    );
}

#[test]
fn duplicate_tag_registration_is_rejected() {
    let mut parser = Parser::new();
    parser.register_with_tag("!Upper", UpperConverter).unwrap();
    let err = parser
        .register_with_tag("!Upper", UpperConverter)
        .unwrap_err();
    assert!(matches!(err, Error::Registration { .. }));
    assert!(err.to_string().contains("tag `!Upper`"), "{err}");
}

#[test]
fn duplicate_type_registration_is_rejected() {
    let mut parser = Parser::new();
    parser.register_with_tag("!Upper", UpperConverter).unwrap();
    // Same target type under another tag is ambiguous for representation.
    let err = parser
        .register_with_tag("!Louder", UpperConverter)
        .unwrap_err();
    assert!(matches!(err, Error::Registration { .. }));
    assert!(err.to_string().contains("type `String`"), "{err}");
}

#[test]
fn core_schema_tags_cannot_be_shadowed() {
    let mut parser = Parser::new();
    let err = parser.register_with_tag("!!int", UpperConverter).unwrap_err();
    assert!(matches!(err, Error::Registration { .. }));
}

#[test]
fn parse_only_converter_has_no_represent() {
    let mut parser = Parser::new();
    parser.register_with_tag("!Upper", UpperConverter).unwrap();
    // UpperConverter targets String, so representing a plain string would
    // dispatch to it; it opted out of represent.
    let value = parser.parse_str("!Upper abc").unwrap();
    assert_eq!(value, Value::Str("ABC".into()));
    // Strings are built-in values, so dumping still works.
    assert_eq!(parser.dump_str(&value).unwrap(), "ABC\n");
}
