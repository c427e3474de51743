// This file is part of papi-converter.
//
// papi-converter is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// papi-converter is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{io::Write as _, path::PathBuf};

use clap::{CommandFactory, Parser};
use papi_converter::{COPYRIGHT, LONG_VERSION};

/// PAPI Converter
///
/// Converts a chess tournament between a JSON document and a PAPI tournament
/// store. The direction follows the input's extension: `.json` is imported into
/// a store, `.papi`, `.mdb` and `.ron` are exported to JSON.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "PAPI Converter")]
pub(crate) struct Args {
    /// The file to convert
    #[arg(required_unless_present = "man")]
    pub input: Option<PathBuf>,

    /// Where to write the result, next to the input by default
    pub output: Option<PathBuf>,

    /// The store to import into instead of an empty tournament
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Whether to log on the debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,
}

/// Where `--man` writes the page.
pub(crate) const MAN_PAGE: &str = "papi-converter.1";

impl Args {
    /// Renders the manual page, copyright section included.
    pub(crate) fn man_page() -> anyhow::Result<Vec<u8>> {
        let mut page = Vec::new();
        let cmd = Self::command().name("papi-converter").long_version(None);

        clap_mangen::Man::new(cmd)
            .date("2026-10-17")
            .render(&mut page)?;
        write!(page, "{COPYRIGHT}")?;

        Ok(page)
    }
}
