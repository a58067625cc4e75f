#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_builder::escape::*;

fuzz_target!(|data: &str| {
    for s in [
        escape_user_info(data),
        escape_host(data),
        escape_path_segment(data),
        escape_query_param(data),
        escape_fragment(data),
    ] {
        assert_eq!(unescape(&s).unwrap(), data);
    }

    if data.starts_with('/') {
        let s = escape_path(data).unwrap();
        assert_eq!(unescape(&s).unwrap(), data);
    }

    if data
        .bytes()
        .all(|x| x.is_ascii_alphanumeric() || b"-._~".contains(&x))
    {
        assert_eq!(escape_query_param(data), data);
        assert_eq!(escape_path_segment(data), data);
    }
});
