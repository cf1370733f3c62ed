// SPDX-License-Identifier: AGPL-3.0-or-later
//! Text I/O: parameter-row ingestion and result writers.

pub mod params;
pub mod table;
