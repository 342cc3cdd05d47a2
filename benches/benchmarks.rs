use binix_gfxinfo::{
    AdapterInfo, DriverVersionFormat, Feature, OperatingSystem, RuleTable, SystemDescriptor,
    VersionTuple,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn haswell_laptop() -> SystemDescriptor {
    SystemDescriptor::new(OperatingSystem::Windows10)
        .with_adapter(AdapterInfo::new("0x8086", "0x0416", "10.18.14.4264"))
        .with_screen(1920, 1080)
        .with_battery(true)
        .with_refresh_rate(60)
}

/// Driver version parsing, run once per query
fn benchmark_version_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("version_parse");

    group.bench_function("decimal", |b| {
        b.iter(|| VersionTuple::parse(black_box("24.21.13.9826"), DriverVersionFormat::Decimal))
    });

    group.bench_function("padded", |b| {
        b.iter(|| {
            VersionTuple::parse(black_box("10.18.14.4264"), DriverVersionFormat::PaddedDecimal)
        })
    });

    group.finish();
}

/// Feature queries against the built-in blocklist
fn benchmark_queries(c: &mut Criterion) {
    let table = RuleTable::builtin(DriverVersionFormat::PaddedDecimal);
    let system = haswell_laptop();
    let mut group = c.benchmark_group("blocklist");

    group.bench_function("query_feature_status", |b| {
        b.iter(|| table.query_feature_status(black_box(&system), Feature::WebGlAngle))
    });

    // a feature no rule mentions walks the whole table
    group.bench_function("query_feature_status_miss", |b| {
        b.iter(|| table.query_feature_status(black_box(&system), Feature::Av1HwDecode))
    });

    group.bench_function("query_all", |b| {
        b.iter(|| table.query_all(black_box(&system)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_version_parse, benchmark_queries);
criterion_main!(benches);
