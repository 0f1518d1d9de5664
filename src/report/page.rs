// src/report/page.rs
//! Page context and the `{{ name }}` placeholder renderer.
//!
//! Every placeholder must name a field of [`PageContext`]; anything else is
//! an error, so a renamed field fails the build instead of leaving a hole in
//! the page. `<code>_plot` is known for every disease: one left out of the
//! report renders as nothing, so one template serves any disease selection.

use chrono::NaiveDate;

use crate::specs::nhsn::Disease;

#[derive(Clone, Debug, PartialEq)]
pub struct PageContext {
    /// Build date.
    pub report_date: NaiveDate,
    /// Most recent as-of date in the report.
    pub latest_as_of: NaiveDate,
    pub snapshot_count: usize,
    /// Rendered figure per configured disease, filled as `{{ <code>_plot }}`.
    pub plots: Vec<(Disease, String)>,
}

impl PageContext {
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "report_date" => Some(self.report_date.format("%Y-%m-%d").to_string()),
            "latest_as_of" => Some(self.latest_as_of.format("%Y-%m-%d").to_string()),
            "snapshot_count" => Some(self.snapshot_count.to_string()),
            _ => {
                let disease: Disease = key.strip_suffix("_plot")?.parse().ok()?;
                let html = self.plots.iter().find(|(d, _)| *d == disease).map(|(_, html)| html.clone());
                Some(html.unwrap_or_default())
            }
        }
    }
}

/// Substitute every `{{ name }}` in `template`.
pub fn render(template: &str, ctx: &PageContext) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after.find("}}").ok_or_else(|| {
            let line = template[..template.len() - rest.len() + open].matches('\n').count() + 1;
            format!("unterminated placeholder on line {line}")
        })?;
        let key = after[..close].trim();
        let value = ctx
            .lookup(key)
            .ok_or_else(|| format!("unknown placeholder `{{{{ {key} }}}}`"))?;
        out.push_str(&value);
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}
