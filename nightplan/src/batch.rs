/*
 * Copyright © 2025, the nightplan authors. All rights reserved.
 *
 * The “nightplan” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! materialize a ticket file per schedule row and relocate them into per-night folders

use std::fs;
use std::path::{Path,PathBuf};
use chrono::{Days,NaiveDate,Timelike};
use chrono_tz::Tz;
use nightplan_common::{info, warn, datetime::Clock, fs::{ensure_dir, ensure_writable_dir, filename_of_path}};
use crate::NightplanConfig;
use crate::ephemeris::EphemerisCatalog;
use crate::errors::{NightplanError, Result};
use crate::resolve::resolve;
use crate::satcat::SatelliteCatalog;
use crate::schedule::{ScheduleRow, ScheduleTable};
use crate::ticket::{build, TicketFlags};

/// a materialized, archived ticket file
#[derive(Debug,Clone)]
pub struct TicketFile {
    pub path: PathBuf,
    pub night_folder: PathBuf,
}

/// one isolated per-row failure - the rest of the batch proceeds
#[derive(Debug)]
pub struct RowFailure {
    pub row_index: usize,
    pub target: String,
    pub error: NightplanError,
}

pub struct BatchOutcome {
    pub files: Vec<TicketFile>,
    pub failures: Vec<RowFailure>,
    pub night_dir: PathBuf,

    /// pass-through convenience for the caller to surface (e.g. clipboard)
    pub run_cmd: String,
}

/// name of tonight's folder (local YYYYMMDD). Before local noon the observing night
/// still belongs to yesterday's date. This is evaluated once per batch, not per ticket
pub fn night_folder_name (clock: &dyn Clock, tz: Tz)->String {
    let local = clock.now().with_timezone( &tz);

    let date = if local.hour() >= 12 {
        local.date_naive()
    } else {
        local.date_naive() - Days::new(1)
    };

    date.format("%Y%m%d").to_string()
}

/// move a freshly created ticket file into the night folder. First write wins: a
/// same-named file already archived there stays canonical and the duplicate is discarded
fn archive_ticket (path: &Path, night_dir: &Path)->Result<PathBuf> {
    let filename = filename_of_path( path)?;
    let dest = night_dir.join( &filename);

    if dest.exists() {
        fs::remove_file( path)?;
        info!("{} already archived, discarding duplicate", filename);
    } else {
        fs::rename( path, &dest)?;
    }

    Ok(dest)
}

fn materialize_row (row: &ScheduleRow, ephemeris: &EphemerisCatalog, satellites: &SatelliteCatalog,
                    flags: &TicketFlags, cfg: &NightplanConfig, clock: &dyn Clock)->Result<PathBuf> {
    let resolved = resolve( row, ephemeris, &cfg.catalog_prefixes)?;
    let ticket = build( &resolved, flags, satellites, clock, cfg.observatory_tz)?;
    ticket.save_in_dir( &cfg.ticket_dir)
}

/// drive resolve+build across every upcoming schedule row, then relocate the ticket
/// files into tonight's folder. A failing row - during materialization or relocation -
/// is reported in the outcome and does not abort the remaining rows
pub fn materialize_all (table: &ScheduleTable, today: NaiveDate, ephemeris: &EphemerisCatalog,
                        satellites: &SatelliteCatalog, flags: &TicketFlags,
                        cfg: &NightplanConfig, clock: &dyn Clock)->Result<BatchOutcome> {
    ensure_writable_dir( &cfg.ticket_dir)?;

    let night_dir = cfg.ticket_dir.join( night_folder_name( clock, cfg.observatory_tz));
    ensure_dir( &night_dir)?;

    //--- phase 1: one ticket file per row at the ticket root
    let mut created: Vec<(usize,String,PathBuf)> = Vec::new();
    let mut failures: Vec<RowFailure> = Vec::new();

    for row in table.upcoming( today) {
        match materialize_row( row, ephemeris, satellites, flags, cfg, clock) {
            Ok(path) => {
                info!("materialized row {} -> {:?}", row.row_index, path);
                created.push( (row.row_index, row.target.clone(), path));
            }
            Err(error) => {
                warn!("row {} ({}) failed: {}", row.row_index, row.target, error);
                failures.push( RowFailure { row_index: row.row_index, target: row.target.clone(), error });
            }
        }
    }

    //--- phase 2: relocate into the night folder
    let mut files: Vec<TicketFile> = Vec::new();
    for (row_index,target,path) in &created {
        match archive_ticket( path, &night_dir) {
            Ok(archived) => {
                files.push( TicketFile { path: archived, night_folder: night_dir.clone() });
            }
            Err(error) => {
                warn!("relocating ticket of row {} ({}) failed: {}", row_index, target, error);
                failures.push( RowFailure { row_index: *row_index, target: target.clone(), error });
            }
        }
    }

    let run_cmd = cfg.run_cmd_pattern.replace( "${dir}", night_dir.to_string_lossy().as_ref());

    Ok( BatchOutcome { files, failures, night_dir, run_cmd } )
}
