use blockyaml::{Error, Parser, Value};

blockyaml::yaml_record! {
    pub struct Date {
        month: String,
        week: i64,
        day: i64 = 0,
    }
}

blockyaml::yaml_record! {
    pub struct Rect {
        x: i64,
        y: i64,
    }
}

fn parser() -> Parser {
    let mut parser = Parser::new();
    parser.register_record::<Date>().unwrap();
    parser.register_record::<Rect>().unwrap();
    parser
}

#[test]
fn primitive_typed_parses() {
    let parser = Parser::new();
    assert_eq!(parser.typed::<i64>().parse_str("42").unwrap(), 42);
    assert_eq!(
        parser.typed::<String>().parse_str("hello").unwrap(),
        "hello"
    );
    assert!(parser.typed::<bool>().parse_str("true").unwrap());
    assert_eq!(
        parser.typed::<Vec<i64>>().parse_str("- 1\n- 2\n").unwrap(),
        vec![1, 2]
    );
    assert_eq!(parser.typed::<Option<i64>>().parse_str("").unwrap(), None);
    assert_eq!(
        parser.typed::<Option<i64>>().parse_str("3").unwrap(),
        Some(3)
    );
}

#[test]
fn primitive_mismatch_is_a_type_assertion() {
    let parser = Parser::new();
    let err = parser.typed::<String>().parse_str("42").unwrap_err();
    assert!(matches!(err, Error::TypeAssertion { .. }));
    let msg = err.to_string();
    assert!(msg.contains("expected a string, got an integer"), "{msg}");
}

#[test]
fn tagged_document_constructs_and_asserts() {
    let parser = parser();
    let date: Date = parser.typed().parse_str("!Date\nmonth: June\nweek: 1\n").unwrap();
    assert_eq!(date.month, "June");
}

#[test]
fn mismatched_tag_never_returns_the_wrong_type() {
    let parser = parser();
    let err = parser
        .typed::<Rect>()
        .parse_str("!Date\nmonth: June\nweek: 1\n")
        .unwrap_err();
    assert!(matches!(err, Error::TypeAssertion { .. }));
    let msg = err.to_string();
    assert!(
        msg.contains("expected Rect") && msg.contains("`Date`"),
        "unexpected error: {msg}"
    );
}

#[test]
fn untagged_document_constructs_through_the_asserted_type() {
    let parser = parser();
    // No `!Rect` tag in the document: the asserted top-level type directs
    // construction through the registered converter.
    let rect: Rect = parser.typed().parse_str("x: 2\ny: 4\n").unwrap();
    assert_eq!(rect, Rect { x: 2, y: 4 });
}

#[test]
fn untagged_document_is_still_validated() {
    let parser = parser();
    let err = parser.typed::<Rect>().parse_str("x: 2\nz: 4\n").unwrap_err();
    assert!(matches!(err, Error::MissingFields { .. }));
}

#[test]
fn untyped_parse_of_untagged_mapping_stays_generic() {
    let parser = parser();
    // Without a type assertion there is nothing to direct construction, so
    // the mapping stays a plain mapping.
    let value = parser.parse_str("x: 2\ny: 4\n").unwrap();
    assert_eq!(value.get("x"), Some(&Value::Int(2)));
    assert!(value.downcast_ref::<Rect>().is_none());
}

#[test]
fn typed_view_dumps_like_the_parser() {
    let parser = parser();
    let rect = Rect { x: 2, y: 4 };
    assert_eq!(
        parser.typed::<Rect>().dump_str(&rect).unwrap(),
        "!Rect\nx: 2\ny: 4\n"
    );
}
