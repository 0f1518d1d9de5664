// src/bin/target.rs
use nhsn_archive::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run_target()
}
