#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(r) = uri_builder::Uri::parse(data) else {
        return;
    };

    let mut tail = String::from(r.path().as_str());
    if let Some(q) = r.query() {
        tail.push('?');
        tail.push_str(q.as_str());
    }
    if let Some(f) = r.fragment() {
        tail.push('#');
        tail.push_str(f.as_str());
    }
    assert!(data.ends_with(&tail));

    let mut start = 0;
    if let Some(s) = r.scheme() {
        assert_eq!(&data[..s.as_str().len() + 1], [s.as_str(), ":"].concat());
        start = s.as_str().len() + 1;
    }

    let rest = &data[start..data.len() - tail.len()];
    if !r.has_authority() {
        assert_eq!(rest, "");
        return;
    }

    let mut auth = rest.strip_prefix("//").unwrap();
    if let Some(ui) = r.userinfo() {
        auth = auth.strip_prefix(ui.as_str()).unwrap();
        auth = auth.strip_prefix('@').unwrap();
    }
    let port = auth.strip_prefix(r.host().unwrap()).unwrap();
    match port.strip_prefix(':') {
        Some("") | None => assert_eq!(r.port(), None),
        Some(digits) => assert_eq!(r.port(), digits.parse().ok()),
    }
});
