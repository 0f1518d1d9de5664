// benches/assemble.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::{Duration, NaiveDate};

use nhsn_archive::config::ReportOptions;
use nhsn_archive::progress::NullProgress;
use nhsn_archive::report::assemble::{build_figure, build_figures};
use nhsn_archive::report::ArchiveTable;
use nhsn_archive::snapshot::{SnapshotRow, SnapshotTable};
use nhsn_archive::specs::nhsn::Disease;

/// ~55 jurisdictions × 20 weekly as-of snapshots × 2 years of report weeks.
fn synthetic_archive() -> ArchiveTable {
    let fields: Vec<String> = Disease::ALL.iter().map(|d| format!("totalconf{}newadm", d.code())).collect();
    let jurisdictions: Vec<String> = (0..55).map(|i| format!("J{i:02}")).collect();
    let first_as_of = NaiveDate::from_ymd_opt(2024, 12, 4).unwrap_or_default();

    let mut table = ArchiveTable::new();
    for k in 0..20i64 {
        let as_of = first_as_of + Duration::weeks(k);
        let mut rows = Vec::new();
        for w in 0..104i64 {
            let report_date = as_of - Duration::weeks(104 - w);
            for (j, jur) in jurisdictions.iter().enumerate() {
                let base = (w as usize * 7 + j * 13 + k as usize) % 500;
                rows.push(SnapshotRow {
                    report_date,
                    jurisdiction: jur.clone(),
                    cells: vec![base.to_string(), (base / 2).to_string(), String::new()],
                });
            }
        }
        if let Ok(snapshot) = SnapshotTable::new(fields.clone(), rows) {
            table.insert(as_of, snapshot);
        }
    }
    table
}

fn bench_assemble(c: &mut Criterion) {
    let table = synthetic_archive();
    let opts = ReportOptions::default();

    c.bench_function("series_regroup", |b| {
        b.iter(|| black_box(table.series(black_box("totalconfflunewadm"))).len())
    });

    c.bench_function("figure_one_disease", |b| {
        b.iter(|| {
            let fig = build_figure(black_box(&table), Disease::Flu, &opts, &mut NullProgress);
            black_box(fig.data.len())
        })
    });

    c.bench_function("figures_and_html", |b| {
        b.iter(|| {
            let figs = build_figures(black_box(&table), &opts, &mut NullProgress);
            let bytes: usize = figs
                .iter()
                .filter_map(|(d, f)| f.to_html_snippet(d.code()).ok())
                .map(|html| html.len())
                .sum();
            black_box(bytes)
        })
    });
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
