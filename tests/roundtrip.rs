use blockyaml::{Parser, Value};
use indoc::indoc;

fn assert_round_trip(parser: &Parser, text: &str) {
    let first = parser.parse_str(text).expect("initial parse");
    let dumped = parser.dump_str(&first).expect("dump");
    let second = parser.parse_str(&dumped).expect("re-parse of dumped text");
    assert_eq!(first, second, "value changed through dump:\n{dumped}");
}

#[test]
fn plain_document_round_trips() {
    let parser = Parser::new();
    assert_round_trip(
        &parser,
        indoc! {"
            name: demo
            count: 3
            ratio: 4.2
            enabled: true
            missing: null
            notes:
              - first
              - 2
              - nested:
                  deep: [a, b]
        "},
    );
}

#[test]
fn scalars_round_trip() {
    let parser = Parser::new();
    for text in ["hello", "42", "4.2", "true", "false", "null", "4.2.1"] {
        assert_round_trip(&parser, text);
    }
}

#[test]
fn boolean_lookalike_strings_survive_dumping() {
    let parser = Parser::new();
    // These must come back as the same strings, which means the dumper has
    // to quote them; a strict re-parse would otherwise reject `no`.
    let value = Value::Map(vec![
        (Value::Str("country".into()), Value::Str("no".into())),
        (Value::Str("confirm".into()), Value::Str("Yes".into())),
        (Value::Str("switch".into()), Value::Str("off".into())),
    ]);
    let dumped = parser.dump_str(&value).unwrap();
    assert!(dumped.contains("'no'"), "quoted in output: {dumped}");
    let back = parser.parse_str(&dumped).unwrap();
    assert_eq!(back, value);
}

#[test]
fn number_like_strings_survive_dumping() {
    let parser = Parser::new();
    let value = Value::Map(vec![
        (Value::Str("version".into()), Value::Str("42".into())),
        (Value::Str("pi".into()), Value::Str("3.14".into())),
        (Value::Str("hex".into()), Value::Str("0x10".into())),
        (Value::Str("nothing".into()), Value::Str("null".into())),
        (Value::Str("tilde".into()), Value::Str("~".into())),
    ]);
    let back = parser.parse_str(&parser.dump_str(&value).unwrap()).unwrap();
    assert_eq!(back, value);
}

#[test]
fn awkward_strings_survive_dumping() {
    let parser = Parser::new();
    let value = Value::Seq(vec![
        Value::Str("".into()),
        Value::Str("multi\nline".into()),
        Value::Str("single ' quote".into()),
        Value::Str("a: colon space".into()),
        Value::Str("#comment-ish".into()),
        Value::Str("- dash".into()),
        Value::Str("trailing ".into()),
        Value::Str("[flow, chars]".into()),
    ]);
    let back = parser.parse_str(&parser.dump_str(&value).unwrap()).unwrap();
    assert_eq!(back, value);
}

#[test]
fn floats_round_trip_value_for_value() {
    let parser = Parser::new();
    for f in [4.2, -0.001, 1e300, 4.0, f64::INFINITY, f64::NEG_INFINITY] {
        let dumped = parser.dump_str(&Value::Float(f)).unwrap();
        let back = parser.parse_str(&dumped).unwrap();
        assert_eq!(back.as_f64(), Some(f), "through: {dumped}");
    }
    // NaN compares unequal to itself; check the shape instead.
    let dumped = parser.dump_str(&Value::Float(f64::NAN)).unwrap();
    assert_eq!(dumped, ".nan\n");
    assert!(parser.parse_str(&dumped).unwrap().as_f64().unwrap().is_nan());
}

#[test]
fn empty_containers_round_trip() {
    let parser = Parser::new();
    let value = Value::Map(vec![
        (Value::Str("seq".into()), Value::Seq(vec![])),
        (Value::Str("map".into()), Value::Map(vec![])),
    ]);
    let dumped = parser.dump_str(&value).unwrap();
    assert_eq!(dumped, "seq: []\nmap: {}\n");
    assert_eq!(parser.parse_str(&dumped).unwrap(), value);
}

#[test]
fn non_string_keys_round_trip() {
    let parser = Parser::new();
    assert_round_trip(&parser, "1: one\n2: two\ntrue: yep\n");
}

#[test]
fn dumping_rust_values_directly() {
    let parser = Parser::new();
    assert_eq!(parser.dump_str(&42i64).unwrap(), "42\n");
    assert_eq!(parser.dump_str("hello").unwrap(), "hello\n");
    assert_eq!(parser.dump_str(&vec![1i64, 2, 3]).unwrap(), "- 1\n- 2\n- 3\n");
    assert_eq!(parser.dump_str(&true).unwrap(), "true\n");
    assert_eq!(parser.dump_str(&Option::<i64>::None).unwrap(), "null\n");
}
