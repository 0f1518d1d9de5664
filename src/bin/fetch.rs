// src/bin/fetch.rs
use nhsn_archive::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run_fetch()
}
