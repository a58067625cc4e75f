use uri_builder::{
    error::ParseErrorKind, escape, new_uri, parse_uri, query::QueryParameter, UriBuilder,
};

fn pairs(b: &UriBuilder) -> Vec<(&str, Option<&str>)> {
    b.query_parameters()
        .iter()
        .map(|p| (p.name(), p.value()))
        .collect()
}

#[test]
fn build_file_uri() {
    let s = new_uri()
        .set_scheme("file")
        .set_path("/foo/bar.txt")
        .add_query_parameter("param1", "value1")
        .build_string();
    assert_eq!(s, "file:///foo/bar.txt?param1=value1");
}

#[test]
fn parse_empty_path_with_query() {
    let b = parse_uri("file://?param1=value1").unwrap();
    assert_eq!(b.path(), Some(""));
    assert_eq!(b.host(), None);
    assert_eq!(pairs(&b), [("param1", Some("value1"))]);
    assert_eq!(b.build_string(), "file://?param1=value1");
}

#[test]
fn parse_without_query() {
    let b = parse_uri("file:///foo/bar.txt").unwrap();
    assert!(b.query_parameters().is_empty());
    assert!(b.query_parameters_multimap().is_empty());
    assert_eq!(b.raw_query_string(), None);
}

#[test]
fn root_path() {
    let b = parse_uri("file:///").unwrap();
    assert_eq!(b.path(), Some("/"));
    assert_eq!(b.build_string(), "file:///");
}

#[test]
fn query_order_and_grouping() {
    let b = parse_uri("?a=1&b=2&a=3").unwrap();
    assert_eq!(
        pairs(&b),
        [("a", Some("1")), ("b", Some("2")), ("a", Some("3"))]
    );
    let map = b.query_parameters_multimap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a").unwrap(), ["1", "3"]);
    assert_eq!(map.get("b").unwrap(), ["2"]);
}

#[test]
fn set_query_parameter_replaces_values() {
    let mut b = new_uri();
    b.add_query_parameter("k", "v1").add_query_parameter("k", "v2");
    assert_eq!(b.raw_query_string(), Some("k=v1&k=v2"));

    b.set_query_parameter("k", "v3");
    assert_eq!(pairs(&b), [("k", Some("v3"))]);
    assert_eq!(b.query_parameter_values("k").unwrap(), ["v3"]);
    assert_eq!(b.raw_query_string(), Some("k=v3"));
}

#[test]
fn set_query_parameter_moves_to_end() {
    let mut b = parse_uri("http://h/?k=1&x=2").unwrap();
    b.set_query_parameter("k", "3");
    assert_eq!(b.build_string(), "http://h/?x=2&k=3");
}

#[test]
fn remove_query_parameter() {
    let mut b = parse_uri("http://h/p?a=1&b=2&a=3#f").unwrap();
    b.remove_query_parameter("a");
    assert_eq!(b.build_string(), "http://h/p?b=2#f");
    assert_eq!(b.first_query_parameter_value("a"), None);

    b.remove_query_parameter("b");
    assert_eq!(b.raw_query_string(), None);
    assert!(b.query_parameters().is_empty());
    assert_eq!(b.build_string(), "http://h/p?#f");

    // Removing an absent parameter leaves the raw query untouched.
    let mut b = parse_uri("http://h/?a=%41").unwrap();
    b.remove_query_parameter("zzz");
    assert_eq!(b.raw_query_string(), Some("a=%41"));
}

#[test]
fn parameters_are_escaped() {
    let mut b = new_uri();
    b.set_path("/")
        .add_query_parameter("a b", "1&2=3+4")
        .add_query_parameter("flag", None)
        .add_query_parameter("empty", "");
    assert_eq!(b.build_string(), "/?a%20b=1%262%3D3%2B4&flag&empty=");

    let parsed = parse_uri(&b.build_string()).unwrap();
    assert_eq!(parsed.query_parameters(), b.query_parameters());
    assert_eq!(parsed.first_query_parameter_value("a b"), Some("1&2=3+4"));
    assert_eq!(parsed.query_parameter_values("flag").unwrap(), [""]);
    assert_eq!(
        parsed.query_parameters()[1],
        QueryParameter::new("flag", None)
    );
}

#[test]
fn raw_query_string_setter() {
    let mut b = new_uri();
    b.set_raw_query_string("x=%31&&y").unwrap();
    assert_eq!(pairs(&b), [("x", Some("1")), ("y", None)]);
    assert_eq!(b.raw_query_string(), Some("x=%31&&y"));

    b.set_raw_query_string(None).unwrap();
    assert!(b.query_parameters().is_empty());
    assert_eq!(b.raw_query_string(), None);
}

#[test]
fn round_trip() {
    let mut b = new_uri();
    b.set_scheme("https")
        .set_user_info("jo hn:s3cr@t")
        .set_host("exämple.org")
        .set_port(8443)
        .set_path("/dir name/file#1.txt")
        .add_query_parameter("q", "a b")
        .add_query_parameter("lang", "中文")
        .add_query_parameter("q", "c&d")
        .set_fragment("part 2");

    let s = b.build_string();
    assert_eq!(
        s,
        "https://jo%20hn:s3cr%40t@ex%C3%A4mple.org:8443/dir%20name/file%231.txt\
         ?q=a%20b&lang=%E4%B8%AD%E6%96%87&q=c%26d#part%202"
    );

    let parsed = parse_uri(&s).unwrap();
    assert_eq!(parsed.build_string(), s);
    assert_eq!(parsed.user_info(), Some("jo hn:s3cr@t"));
    assert_eq!(parsed.host(), Some("exämple.org"));
    assert_eq!(parsed.port(), Some(8443));
    assert_eq!(parsed.path(), Some("/dir name/file#1.txt"));
    assert_eq!(parsed.query_parameters(), b.query_parameters());
    assert_eq!(parsed.fragment(), Some("part 2"));

    let uri = b.build().unwrap();
    assert_eq!(uri.as_str(), s);
    assert_eq!(uri.port(), Some(8443));
}

#[test]
fn raw_setters() {
    let mut b = new_uri();
    b.set_scheme("http")
        .set_raw_host("ex%41mple.com")
        .unwrap()
        .set_raw_path("/a%2Fb")
        .unwrap();
    assert_eq!(b.host(), Some("exAmple.com"));
    assert_eq!(b.path(), Some("/a/b"));
    assert_eq!(b.build_string(), "http://ex%41mple.com/a%2Fb");

    let e = b.set_raw_user_info("%E6%B5").unwrap_err();
    assert_eq!(e.index(), 0);
    assert_eq!(b.user_info(), None);
}

#[test]
fn clearing_components() {
    let mut b = parse_uri("ftp://u@h:21/p?q#f").unwrap();
    b.set_user_info(None)
        .set_port(None)
        .set_path(None)
        .set_fragment(None);
    assert_eq!(b.build_string(), "ftp://h?q");

    b.set_raw_query_string(None).unwrap().set_host(None);
    assert_eq!(b.build_string(), "ftp://");
    assert_eq!(b.build().unwrap_err().plain().kind(), ParseErrorKind::MissingAuthority);
}

#[test]
fn path_segments_with_escape() {
    let path = ["/", &escape::escape_path_segment("a/b"), "/c"].concat();
    let mut b = new_uri();
    b.set_raw_path(&*path).unwrap();
    assert_eq!(b.raw_path(), Some("/a%2Fb/c"));
    assert_eq!(b.path(), Some("/a/b/c"));
}

#[test]
fn builder_equality() {
    let a = parse_uri("http://h/?a=%41").unwrap();
    let mut b = new_uri();
    b.set_scheme("http").set_host("h").set_path("/");
    b.set_raw_query_string("a=%41").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.clone(), a);
}
