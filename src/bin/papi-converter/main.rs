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

#![deny(clippy::expect_used)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use clap::Parser;
use log::{info, warn};
use papi_converter::{convert::convert, utils};

use crate::command_line::{Args, MAN_PAGE};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    utils::init_logger(args.verbose);

    if args.man {
        std::fs::write(MAN_PAGE, Args::man_page()?)?;
        info!("wrote {MAN_PAGE}");
        return Ok(());
    }

    let Some(input) = args.input else {
        anyhow::bail!("no input file given");
    };

    let (output, report) = convert(&input, args.output.as_deref(), args.template.as_deref())?;

    if !report.warnings.is_empty() {
        warn!("{} warnings, see above", report.warnings.len());
    }
    info!(
        "wrote {} ({} variables, {} players)",
        output.display(),
        report.variables,
        report.players
    );

    Ok(())
}
