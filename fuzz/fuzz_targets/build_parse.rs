#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use uri_builder::{component::Scheme, new_uri, parse_uri};

#[derive(Arbitrary, Debug)]
struct UriComponents<'a> {
    scheme: Option<&'a str>,
    userinfo: Option<&'a str>,
    host: Option<&'a str>,
    port: Option<u16>,
    path: Option<&'a str>,
    params: Vec<(&'a str, Option<&'a str>)>,
    fragment: Option<&'a str>,
}

fuzz_target!(|c: UriComponents<'_>| {
    if c.scheme.is_some_and(|s| Scheme::new(s).is_none()) {
        return;
    }
    // An authority is only written after a scheme.
    if c.scheme.is_none() && (c.userinfo.is_some() || c.host.is_some() || c.port.is_some()) {
        return;
    }
    if c.path.is_some_and(|p| !p.is_empty() && !p.starts_with('/')) {
        return;
    }
    if c.scheme.is_none() && c.path.is_some_and(|p| p.starts_with("//")) {
        return;
    }
    // Empty entries are dropped when parsing.
    if c.params.iter().any(|&(name, value)| name.is_empty() && value.is_none()) {
        return;
    }

    let mut b = new_uri();
    b.set_scheme(c.scheme)
        .set_user_info(c.userinfo)
        .set_host(c.host)
        .set_port(c.port)
        .set_path(c.path)
        .set_fragment(c.fragment);
    for &(name, value) in &c.params {
        b.add_query_parameter(name, value);
    }

    let s = b.build_string();
    let Ok(parsed) = parse_uri(&s) else {
        // Only blank input and an authority with nothing after "//" are rejected.
        assert!(s.is_empty() || s.ends_with("://"));
        return;
    };

    assert_eq!(parsed.build_string(), s);
    assert_eq!(parsed.query_parameters(), b.query_parameters());
    assert_eq!(parsed.fragment(), b.fragment());
    assert_eq!(parsed.path(), Some(b.path().unwrap_or("")));
    if c.host.is_some_and(|h| !h.is_empty()) {
        assert_eq!(parsed.host(), b.host());
    }
});
