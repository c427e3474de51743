use std::{env, fs, io::Write, path::Path};

use anyhow::Context;
use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;

/// Logs to stderr as `HH:MM:SS LEVEL message`.
///
/// `RUST_LOG` takes precedence, then `verbose` (Debug), then Info.
pub fn init_logger(verbose: bool) {
    let mut builder = Builder::new();

    builder.format(|formatter, record| {
        writeln!(
            formatter,
            "{} {:>5} {}",
            Local::now().format("%H:%M:%S"),
            record.level(),
            record.args()
        )
    });

    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(level(verbose)),
    };

    builder.init();
}

fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Creates the directory `path` is written into, if it doesn't exist yet.
///
/// # Errors
///
/// If the directory can't be created.
pub fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    Ok(())
}
