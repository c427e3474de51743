//! File level conversions, picked by the input file's extension.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use log::info;

use crate::{
    assembler,
    document::Document,
    report::Report,
    store::Database,
    utils::create_parent_dir,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// JSON document to tournament store.
    Import,
    /// Tournament store to JSON document.
    Export,
}

impl Direction {
    /// # Errors
    ///
    /// If the extension is neither `.json` nor a tournament store's.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Import),
            Some("papi" | "mdb" | "ron") => Ok(Self::Export),
            _ => bail!(
                "unsupported input file: {} (expected .json, .papi, .mdb or .ron)",
                path.display()
            ),
        }
    }

    /// Where the output goes when none is given: next to the input, with the
    /// other format's extension.
    #[must_use]
    pub fn default_output(self, input: &Path) -> PathBuf {
        match self {
            Self::Import => input.with_extension("papi"),
            Self::Export => input.with_extension("json"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import => write!(f, "JSON -> PAPI"),
            Self::Export => write!(f, "PAPI -> JSON"),
        }
    }
}

/// Imports the JSON document `input` into a new store at `output`.
///
/// The store starts as a copy of `template`, or of the built-in empty
/// tournament. Nothing is written if the import fails.
///
/// # Errors
///
/// If a file can't be read or written, or the import fails.
pub fn json_to_papi(input: &Path, output: &Path, template: Option<&Path>) -> anyhow::Result<Report> {
    let string = fs::read_to_string(input)
        .with_context(|| format!("failed to read document: {}", input.display()))?;
    let document = Document::from_json(&string)
        .with_context(|| format!("invalid document: {}", input.display()))?;

    let mut database = match template {
        Some(template) => Database::load(template)?,
        None => assembler::template()?,
    };

    let report = assembler::import(&document, &mut database)
        .with_context(|| format!("failed to import {}", input.display()))?;

    create_parent_dir(output)?;
    database.save(output)?;

    Ok(report)
}

/// Exports the store `input` to the JSON document `output`.
///
/// # Errors
///
/// If a file can't be read or written, or the export fails.
pub fn papi_to_json(input: &Path, output: &Path) -> anyhow::Result<Report> {
    let database = Database::load(input)?;
    let (document, report) = assembler::export(&database)
        .with_context(|| format!("failed to export {}", input.display()))?;

    let string = document.to_json_pretty()?;
    create_parent_dir(output)?;
    fs::write(output, string)
        .with_context(|| format!("failed to write document: {}", output.display()))?;

    Ok(report)
}

/// Converts `input` in the direction its extension calls for.
///
/// Returns where the output was written.
///
/// # Errors
///
/// If the input's extension is unsupported or the conversion fails.
pub fn convert(
    input: &Path,
    output: Option<&Path>,
    template: Option<&Path>,
) -> anyhow::Result<(PathBuf, Report)> {
    let direction = Direction::from_path(input)?;
    let output = output.map_or_else(|| direction.default_output(input), Path::to_path_buf);

    info!(
        "{direction}: {} -> {}",
        input.display(),
        output.display()
    );

    let report = match direction {
        Direction::Import => json_to_papi(input, &output, template)?,
        Direction::Export => papi_to_json(input, &output)?,
    };

    Ok((output, report))
}
