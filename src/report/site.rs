// src/report/site.rs
//
// Static site export: template + assets → out_dir/{index.html, assets…}.
// Everything that can fail without touching the disk (template, render, asset
// lookup) runs before the output directory is cleared.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::consts::INDEX_FILENAME;
use crate::config::ReportOptions;
use crate::error::{Error, Result};
use crate::file::{clear_directory, copy_atomic, ensure_directory, is_empty_dir, write_atomic};

use super::page::{render, PageContext};

/// `inner` is `outer` itself or lies somewhere below it. Paths that do not
/// exist yet can contain nothing.
fn is_within(inner: &Path, outer: &Path) -> bool {
    match (inner.canonicalize(), outer.canonicalize()) {
        (Ok(inner), Ok(outer)) => inner.starts_with(outer),
        _ => false,
    }
}

/// The output directory is cleared on every build, so it must not hold the
/// archive or the templates.
fn check_out_dir(opts: &ReportOptions) -> Result<()> {
    let guarded = [("dataset", &opts.dataset_dir), ("templates", &opts.templates_dir)];
    for (what, dir) in guarded {
        if is_within(dir, &opts.out_dir) {
            return Err(Error::Config(format!(
                "output directory {} contains the {what} directory {}",
                opts.out_dir.display(),
                dir.display()
            )));
        }
    }
    Ok(())
}

/// Render the page and write the site. Returns the path of `index.html`.
pub fn export_site(opts: &ReportOptions, ctx: &PageContext) -> Result<PathBuf> {
    let template_path = opts.template_path();
    logi!("Filling template {}", template_path.display());
    let template = fs::read_to_string(&template_path).map_err(|e| Error::Template {
        path: template_path.clone(),
        reason: e.to_string(),
    })?;
    let page = render(&template, ctx).map_err(|reason| Error::Template {
        path: template_path.clone(),
        reason,
    })?;

    let assets: Vec<(PathBuf, String)> = opts
        .assets
        .iter()
        .map(|name| (opts.templates_dir.join(name), name.clone()))
        .collect();
    if let Some((missing, _)) = assets.iter().find(|(src, _)| !src.is_file()) {
        return Err(Error::MissingAsset(missing.clone()));
    }

    check_out_dir(opts)?;
    let out_dir = &opts.out_dir;

    logi!("Exporting site files to {}", out_dir.display());
    if is_empty_dir(out_dir)? {
        logd!("Export directory is empty: {}", out_dir.display());
    } else {
        logw!("Export directory is not empty; clearing {}", out_dir.display());
        let removed = clear_directory(out_dir)?;
        logd!("Removed {removed} entries");
    }
    ensure_directory(out_dir)?;

    for (src, name) in &assets {
        copy_atomic(src, &out_dir.join(name))?;
    }
    let index = out_dir.join(INDEX_FILENAME);
    write_atomic(&index, page)?;
    Ok(index)
}
