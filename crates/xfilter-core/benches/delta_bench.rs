use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use xfilter_core::{
    aggregate_by_bin, query_by_indices, AggregateFn, Binning, ChartSink, PerRowTile, Stride,
};

struct Shown {
    y: Vec<f64>,
    unfiltered: Vec<f64>,
}

impl ChartSink for Shown {
    fn data_points(&self) -> usize { self.y.len() }
    fn get_source_y_axis(&self) -> Vec<f64> { self.y.clone() }
    fn unfiltered_y_axis(&self) -> xfilter_core::Result<Vec<f64>> { Ok(self.unfiltered.clone()) }
    fn reset_chart(&mut self, result: Vec<f64>) { self.y = result; }
}

fn gen_tile(n: usize) -> PerRowTile {
    let cols = (0..n)
        .map(|c| (0..n).map(|r| ((c * 31 + r * 7) % 5) as f64).collect())
        .collect();
    PerRowTile::from_columns(cols).expect("square tile")
}

fn gen_keys(rows: usize, bins: usize) -> Vec<f64> {
    // multiplicative hash in u64 so 32-bit targets do not overflow
    (0..rows as u64).map(|i| (i.wrapping_mul(2_654_435_761) % bins as u64) as f64).collect()
}

fn bench_delta(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_update");
    for &n in &[256usize, 1024usize] {
        let tile = gen_tile(n);
        let old: Vec<usize> = (0..n / 2).collect();
        let new: Vec<usize> = (0..n / 2 + 1).collect();
        group.bench_with_input(BenchmarkId::new("delta_one_row", n), &n, |b, &n| {
            let mut shown = Shown { y: vec![0.0; n], unfiltered: tile.column_sum() };
            b.iter(|| {
                query_by_indices(black_box(&old), black_box(&new), &tile, &mut shown).unwrap();
            });
        });

        let keys = gen_keys(1_000_000, n);
        let binning = Binning::new(0.0, Some(Stride::Int(1)), n).expect("binning");
        group.bench_with_input(BenchmarkId::new("full_rescan_1m_rows", n), &n, |b, _| {
            b.iter(|| {
                let _ = black_box(aggregate_by_bin(&keys, None, &binning, AggregateFn::Count));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_delta);
criterion_main!(benches);
