#![cfg(feature = "serde")]

use uri_builder::{component::Scheme, query::QueryParameter, Uri};

#[test]
fn uri_as_string() {
    let u = Uri::parse("http://example.com/a?b#c").unwrap();
    let json = serde_json::to_string(&u).unwrap();
    assert_eq!(json, r#""http://example.com/a?b#c""#);

    let back: Uri<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, u);
    let borrowed: Uri<&str> = serde_json::from_str(&json).unwrap();
    assert_eq!(borrowed.fragment().unwrap(), "c");

    let e = serde_json::from_str::<Uri<String>>(r#""file://""#).unwrap_err();
    assert!(e.to_string().contains("expected authority at index 7"));
}

#[test]
fn scheme_and_parameter() {
    assert_eq!(serde_json::to_string(Scheme::SFTP).unwrap(), r#""sftp""#);

    let p = QueryParameter::new("q", Some("a b"));
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, r#"{"name":"q","value":"a b"}"#);
    let back: QueryParameter = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
    assert_eq!(back.to_raw(), "q=a%20b");
}
