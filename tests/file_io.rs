use anyhow::Result;
use blockyaml::{Error, Parser, Value};

blockyaml::yaml_record! {
    pub struct Endpoint {
        host: String,
        port: i64 = 8080,
    }
}

#[test]
fn dump_and_parse_through_a_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.yaml");

    let parser = Parser::new();
    let value = Value::Map(vec![
        (Value::Str("name".into()), Value::Str("demo".into())),
        (Value::Str("retries".into()), Value::Int(3)),
    ]);
    parser.dump(&value, &path)?;

    let back = parser.parse(&path)?;
    assert_eq!(back, value);
    Ok(())
}

#[test]
fn typed_parse_through_a_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("endpoint.yaml");
    std::fs::write(&path, "!Endpoint\nhost: localhost\n")?;

    let mut parser = Parser::new();
    parser.register_record::<Endpoint>().unwrap();

    let endpoint: Endpoint = parser.typed().parse(&path)?;
    assert_eq!(endpoint.host, "localhost");
    assert_eq!(endpoint.port, 8080);

    parser.typed::<Endpoint>().dump(&endpoint, &path)?;
    let text = std::fs::read_to_string(&path)?;
    assert_eq!(text, "!Endpoint\nhost: localhost\nport: 8080\n");
    Ok(())
}

#[test]
fn missing_file_surfaces_io_error() {
    let parser = Parser::new();
    let err = parser.parse("/definitely/not/there.yaml").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("IO error"), "{err}");
}

#[test]
fn parse_errors_from_files_keep_locations() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "ok: 1\nbad: no\n")?;

    let parser = Parser::new();
    let err = parser.parse(&path).unwrap_err();
    let location = err.location().expect("location");
    assert_eq!(location.line(), 2);
    Ok(())
}
