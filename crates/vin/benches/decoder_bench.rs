//! VIN 디코더 벤치마크

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use junkyard_core::vin::Vin;
use junkyard_vin::VinDecoder;

const SAMPLE_VINS: &[&str] = &[
    "1N4AL3AP8JC231503",
    "1HGCM82633A004352",
    "5YJ3E1EA7KF317000",
    "WBA3A5C50DF000000",
    "KMHDH4AE0DU000000",
    "YV1RS592962000000",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("vin_parse", |b| {
        b.iter(|| {
            for raw in SAMPLE_VINS {
                let _ = black_box(Vin::parse(black_box(raw)));
            }
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let decoder = VinDecoder::new();
    let vins: Vec<Vin> = SAMPLE_VINS
        .iter()
        .filter_map(|raw| Vin::parse(raw).ok())
        .collect();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("vin_decode_mixed_regions", |b| {
        b.iter(|| {
            for vin in &vins {
                black_box(decoder.decode_vin_with_rng(black_box(vin), &mut rng));
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_decode);
criterion_main!(benches);
