// src/report/table.rs
//! The unified archive table: every loaded snapshot keyed by its calendar
//! as-of date. Grouping is explicit nested maps, so iteration order is the
//! key order (dates ascending, jurisdictions lexicographic).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::snapshot::SnapshotTable;

/// One trace worth of points: (report date, count), report dates ascending.
pub type Series = Vec<(NaiveDate, Option<f64>)>;

/// jurisdiction → as-of date → series.
pub type SeriesIndex = BTreeMap<String, BTreeMap<NaiveDate, Series>>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArchiveTable {
    snapshots: BTreeMap<NaiveDate, SnapshotTable>,
}

impl ArchiveTable {
    pub fn new() -> Self { Self::default() }

    /// Adds a snapshot unless its as-of date is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, as_of: NaiveDate, table: SnapshotTable) -> bool {
        if self.snapshots.contains_key(&as_of) {
            return false;
        }
        self.snapshots.insert(as_of, table);
        true
    }

    pub fn contains(&self, as_of: NaiveDate) -> bool { self.snapshots.contains_key(&as_of) }
    pub fn len(&self) -> usize { self.snapshots.len() }
    pub fn is_empty(&self) -> bool { self.snapshots.is_empty() }

    pub fn get(&self, as_of: NaiveDate) -> Option<&SnapshotTable> {
        self.snapshots.get(&as_of)
    }

    pub fn as_of_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.snapshots.keys().copied()
    }

    pub fn latest_as_of(&self) -> Option<NaiveDate> {
        self.snapshots.keys().next_back().copied()
    }

    /// Latest report date in any snapshot.
    pub fn max_report_date(&self) -> Option<NaiveDate> {
        self.snapshots.values().filter_map(SnapshotTable::max_report_date).max()
    }

    /// Regroup one count column as jurisdiction → as-of → series.
    /// Snapshots that lack the column contribute nothing.
    pub fn series(&self, column: &str) -> SeriesIndex {
        let mut out = SeriesIndex::new();
        for (&as_of, table) in &self.snapshots {
            let Some(idx) = table.field_index(column) else {
                logd!("Snapshot {as_of} has no `{column}` column");
                continue;
            };
            // rows are sorted by report date, so each series comes out ascending
            for row in table.rows() {
                out.entry(row.jurisdiction.clone())
                    .or_default()
                    .entry(as_of)
                    .or_default()
                    .push((row.report_date, row.count(idx)));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotRow;

    fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

    fn snapshot(rows: &[(&str, &str, &str)]) -> SnapshotTable {
        SnapshotTable::new(
            vec![s!("totalconfflunewadm")],
            rows.iter()
                .map(|(date, jur, v)| SnapshotRow {
                    report_date: d(date),
                    jurisdiction: s!(*jur),
                    cells: vec![s!(*v)],
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn series_groups_by_jurisdiction_then_as_of() {
        let mut table = ArchiveTable::new();
        assert!(table.insert(d("2025-01-08"), snapshot(&[("2024-12-08", "USA", "5"), ("2024-12-01", "USA", "4")])));
        assert!(table.insert(d("2025-01-01"), snapshot(&[("2024-12-01", "CA", ""), ("2024-12-01", "USA", "3")])));
        assert!(!table.insert(d("2025-01-01"), snapshot(&[])));

        let series = table.series("totalconfflunewadm");
        assert_eq!(series.keys().collect::<Vec<_>>(), ["CA", "USA"]);
        let usa: Vec<_> = series["USA"].keys().copied().collect();
        assert_eq!(usa, [d("2025-01-01"), d("2025-01-08")]);
        assert_eq!(series["USA"][&d("2025-01-08")], vec![(d("2024-12-01"), Some(4.0)), (d("2024-12-08"), Some(5.0))]);
        assert_eq!(series["CA"][&d("2025-01-01")], vec![(d("2024-12-01"), None)]);

        assert_eq!(table.latest_as_of(), Some(d("2025-01-08")));
        assert_eq!(table.max_report_date(), Some(d("2024-12-08")));
        assert!(table.series("totalconfrsvnewadm").is_empty());
    }
}
