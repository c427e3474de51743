//! Convert chess tournaments between JSON documents and PAPI tournament stores.
//!
//! A tournament store holds two tables: `INFO`, a list of `Variable`/`Value`
//! settings, and `JOUEUR`, one fixed-width row per player with 24 rounds of
//! color, opponent and result columns. The JSON document holds the same data as
//! a `variables` object and a `players` array.
//!
//! ## Conventions
//!
//! * Player references in the store start at 2. Reference 1 is the `EXEMPT`
//!   player every bye is paired against, and it never shows up in a document.
//! * Players in a document refer to each other by their zero based position in
//!   the `players` array.
//! * Rounds that hold only default values are left out of the document.
//!
//! See [`assembler::import`] and [`assembler::export`] for the two directions
//! and [`convert`] for the file level entry points.

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

#![deny(clippy::panic)]

pub mod assembler;
pub mod convert;
pub mod document;
pub mod error;
pub mod player;
pub mod reference;
pub mod report;
pub mod round;
pub mod store;
pub mod utils;
pub mod variables;

/// Birth dates are exchanged as `DD/MM/YYYY`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2025-2026 Developers of the papi-converter project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2025-2026 Developers of the papi-converter project
Licensed under the AGPLv3"
);
