use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uri_builder::{escape, new_uri, parse_uri, query::QueryParameters, Uri};

criterion_group!(
    benches,
    bench_parse,
    bench_parse_uri,
    bench_build,
    bench_escape,
    bench_unescape,
    bench_query,
);
criterion_main!(benches);

const PARSE_CASE: &str = "https://user@example.com/search?q=%E6%B5%8B%E8%AF%95&page=2#fragment";
const ESCAPE_CASE: &str = "te😃a 测1`~!@试#$%st^&+=";
const QUERY_CASE: &str = "a=1&b=%E6%B5%8B&a=3&flag&c=x%20y";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Uri::parse(black_box(PARSE_CASE))));
}

fn bench_parse_uri(c: &mut Criterion) {
    c.bench_function("parse_uri", |b| {
        b.iter(|| parse_uri(black_box(PARSE_CASE)))
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build", |b| {
        b.iter(|| {
            new_uri()
                .set_scheme("https")
                .set_user_info("user")
                .set_host("example.com")
                .set_port(8443)
                .set_path("/search")
                .add_query_parameter("q", "测试")
                .add_query_parameter("page", "2")
                .set_fragment("fragment")
                .build()
        })
    });
}

fn bench_escape(c: &mut Criterion) {
    c.bench_function("escape", |b| {
        b.iter(|| escape::escape_query_param(black_box(ESCAPE_CASE)))
    });
}

fn bench_unescape(c: &mut Criterion) {
    let escaped = escape::escape_query_param(ESCAPE_CASE);
    c.bench_function("unescape", |b| {
        b.iter(|| escape::unescape(black_box(&escaped)))
    });
}

fn bench_query(c: &mut Criterion) {
    c.bench_function("query", |b| {
        b.iter(|| QueryParameters::parse(black_box(Some(QUERY_CASE))))
    });
}
