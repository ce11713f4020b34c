use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weather_store::processors::merge_first_seen;
use weather_store::readers::observation_reader::parse_observation_line;
use weather_store::readers::yield_reader::parse_yield_line;
use weather_store::utils::units::{tenths_to_celsius, tenths_to_mm, total_tenths_mm_to_cm};

// Station file lines with roughly one day in ten fully missing
fn create_station_lines(days: usize) -> Vec<String> {
    (0..days)
        .map(|day| {
            let date = 19850101 + (day % 28) as u32 + 100 * ((day / 28) % 12) as u32;
            if day % 10 == 9 {
                format!("{}\t-9999\t-9999\t-9999", date)
            } else {
                format!(
                    "{}\t{}\t{}\t{}",
                    date,
                    (day % 400) as i32 - 100,
                    (day % 300) as i32 - 150,
                    day % 250
                )
            }
        })
        .collect()
}

fn benchmark_line_parsing(c: &mut Criterion) {
    let lines = create_station_lines(10_000);

    c.bench_function("parse_observation_lines", |b| {
        b.iter(|| {
            let parsed = lines
                .iter()
                .filter(|line| parse_observation_line(black_box(line)).is_ok())
                .count();
            black_box(parsed)
        })
    });

    c.bench_function("parse_malformed_line", |b| {
        b.iter(|| black_box(parse_observation_line(black_box("19850101\tabc\t-22"))))
    });

    let yield_lines: Vec<String> = (1985..2015).map(|year| format!("{}\t{}", year, year * 7)).collect();
    c.bench_function("parse_yield_lines", |b| {
        b.iter(|| {
            let entries: Vec<_> = yield_lines
                .iter()
                .filter_map(|line| parse_yield_line(line).ok())
                .collect();
            black_box(merge_first_seen(entries))
        })
    });
}

fn benchmark_unit_conversion(c: &mut Criterion) {
    let raw: Vec<Option<i32>> = (0..10_000)
        .map(|i| if i % 10 == 0 { Some(-9999) } else { Some(i - 5_000) })
        .collect();

    c.bench_function("tenths_conversion", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for value in &raw {
                sum += tenths_to_celsius(*value).unwrap_or(0.0);
                sum += tenths_to_mm(*value).unwrap_or(0.0);
            }
            black_box(sum)
        })
    });

    c.bench_function("yearly_precip_to_cm", |b| {
        b.iter(|| black_box(total_tenths_mm_to_cm(black_box(Some(123_456)))))
    });
}

fn benchmark_varying_file_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("station_file_by_days");

    for &days in &[365, 3_650, 36_500] {
        group.bench_with_input(BenchmarkId::new("days", days), &days, |b, &days| {
            let lines = create_station_lines(days);
            b.iter(|| {
                let valid: Vec<_> = lines
                    .iter()
                    .filter_map(|line| parse_observation_line(line).ok())
                    .collect();
                black_box(valid.len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_line_parsing,
    benchmark_unit_conversion,
    benchmark_varying_file_sizes
);
criterion_main!(benches);
