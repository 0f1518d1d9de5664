// src/report/assemble.rs
//
// Archive table → one figure per disease.
//
// Traces run jurisdiction-major (lexicographic), as-of ascending within each
// jurisdiction. `zorder` is the as-of index, so later revisions draw on top.
// Each selector button shows exactly its own jurisdiction's traces; the
// default jurisdiction's button comes first and its traces start visible.
// Without the default in a figure, every trace starts hidden.

use chrono::Duration;

use crate::config::ReportOptions;
use crate::progress::Progress;
use crate::specs::nhsn::Disease;

use super::figure::{Button, Figure, Layout, Restyle, Text, Trace, UpdateMenu};
use super::table::{ArchiveTable, SeriesIndex};

const PROGRESS_EVERY: usize = 10;

/// The default jurisdiction, if this figure has a series for it.
fn initial_jurisdiction<'a>(series: &SeriesIndex, wanted: &'a str, disease: Disease) -> Option<&'a str> {
    if series.contains_key(wanted) {
        return Some(wanted);
    }
    if !series.is_empty() {
        logw!("{disease}: default jurisdiction {wanted} has no data; all traces start hidden");
    }
    None
}

pub fn build_figure(
    table: &ArchiveTable,
    disease: Disease,
    opts: &ReportOptions,
    progress: &mut dyn Progress,
) -> Figure {
    let column = opts.count_column(disease);
    let series = table.series(&column);
    let shown = initial_jurisdiction(&series, &opts.default_jurisdiction, disease);

    let mut traces: Vec<Trace> = Vec::new();
    for (i_jur, (jur, by_as_of)) in series.iter().enumerate() {
        if i_jur % PROGRESS_EVERY == 0 {
            progress.log(&format!(
                "{disease}: jurisdiction {jur} ({i_jur} / {})",
                series.len()
            ));
        }
        for (i_as_of, (as_of, points)) in by_as_of.iter().enumerate() {
            let mut trace = Trace::scatter(jur, *as_of, points);
            trace.visible = Some(jur.as_str()) == shown;
            trace.zorder = i32::try_from(i_as_of).unwrap_or(i32::MAX);
            traces.push(trace);
        }
    }

    // Buttons: default first, the rest in key order.
    let mut buttons: Vec<Button> = Vec::with_capacity(series.len());
    for jur in series.keys() {
        let button = Button {
            label: jur.clone(),
            method: "update",
            args: (Restyle { visible: traces.iter().map(|t| &t.jurisdiction == jur).collect() },),
        };
        if Some(jur.as_str()) == shown {
            buttons.insert(0, button);
        } else {
            buttons.push(button);
        }
    }

    let mut layout = Layout::new(format!("{} weekly hospital admissions", disease.name()));
    layout.xaxis.range = table
        .max_report_date()
        .map(|max| [max - Duration::weeks(i64::from(opts.window_weeks)), max]);
    layout.yaxis.title = Some(Text { text: s!("Admissions") });
    layout.updatemenus.push(UpdateMenu {
        name: "Jurisdiction",
        kind: "dropdown",
        active: 0,
        showactive: true,
        buttons,
    });

    logd!("{disease}: {} traces", traces.len());
    Figure { data: traces, layout }
}

/// One figure per configured disease, in configuration order.
pub fn build_figures(
    table: &ArchiveTable,
    opts: &ReportOptions,
    progress: &mut dyn Progress,
) -> Vec<(Disease, Figure)> {
    progress.begin(opts.diseases.len());
    let figures = opts
        .diseases
        .iter()
        .map(|&disease| {
            let fig = build_figure(table, disease, opts, progress);
            progress.item_done(disease.name());
            (disease, fig)
        })
        .collect();
    progress.finish();
    figures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use crate::snapshot::{SnapshotRow, SnapshotTable};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

    fn table_with(jurs: &[&str]) -> ArchiveTable {
        let rows = jurs
            .iter()
            .map(|j| SnapshotRow { report_date: d("2024-12-01"), jurisdiction: s!(*j), cells: vec![s!("1")] })
            .collect();
        let mut t = ArchiveTable::new();
        t.insert(d("2025-01-01"), SnapshotTable::new(vec![s!("totalconfrsvnewadm")], rows).unwrap());
        t
    }

    #[test]
    fn missing_default_leaves_everything_hidden() {
        let fig = build_figure(&table_with(&["NY", "CA"]), Disease::Rsv, &ReportOptions::default(), &mut NullProgress);
        let labels: Vec<&str> = fig.layout.updatemenus[0].buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["CA", "NY"]);
        assert!(fig.data.iter().all(|t| !t.visible));
    }

    #[test]
    fn default_is_judged_per_disease() {
        // USA only appears in a snapshot without an RSV column
        let mut t = table_with(&["CA"]);
        let flu_only = SnapshotRow { report_date: d("2024-12-08"), jurisdiction: s!("USA"), cells: vec![s!("5")] };
        t.insert(d("2025-01-08"), SnapshotTable::new(vec![s!("totalconfflunewadm")], vec![flu_only]).unwrap());

        let rsv = build_figure(&t, Disease::Rsv, &ReportOptions::default(), &mut NullProgress);
        assert_eq!(rsv.layout.updatemenus[0].buttons.len(), 1);
        assert_eq!(rsv.layout.updatemenus[0].buttons[0].label, "CA");
        assert!(!rsv.data[0].visible);

        let flu = build_figure(&t, Disease::Flu, &ReportOptions::default(), &mut NullProgress);
        assert_eq!(flu.layout.updatemenus[0].buttons[0].label, "USA");
        assert!(flu.data[0].visible);
    }

    #[test]
    fn window_counts_back_from_latest_report_date() {
        let opts = ReportOptions { window_weeks: 2, ..ReportOptions::default() };
        let fig = build_figure(&table_with(&["USA"]), Disease::Rsv, &opts, &mut NullProgress);
        assert_eq!(fig.layout.xaxis.range, Some([d("2024-11-17"), d("2024-12-01")]));
        assert_eq!(fig.layout.title.text, "RSV weekly hospital admissions");
    }
}
