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

//! in-memory view of the shared schedule sheet

use std::path::Path;
use chrono::NaiveDate;
use serde::{Serialize,Deserialize};
use nightplan_common::warn;
use crate::errors::{NightplanError, Result};

/// raw sheet row - used for easy parsing of the CSV snapshot. The optional columns
/// (Camera, Satellite Tracking, Tracking Mode) might be missing from the sheet entirely
#[derive(Serialize,Deserialize,Debug,Clone)]
struct RawRow {
    #[serde(rename="NoD", default)] nod: String,
    #[serde(rename="Target", default)] target: String,
    #[serde(rename="Start", default)] start: String,
    #[serde(rename="End", default)] end: String,
    #[serde(rename="Filter", default)] filter: String,
    #[serde(rename="Exp", default)] exp: String,
    #[serde(rename="Camera", default)] camera: String,
    #[serde(rename="Satellite Tracking", default)] satellite_tracking: String,
    #[serde(rename="Tracking Mode", default)] tracking_mode: String,
}

/// one validated schedule row. Immutable once read from the sheet for a given fetch cycle
#[derive(Debug,Clone)]
pub struct ScheduleRow {
    /// position within the sheet (0-based data row index)
    pub row_index: usize,

    pub target: String,
    pub night_of_date: NaiveDate,

    /// local 24h clock strings ("HH:MM") - resolved to absolute dates by the target resolver
    pub start: String,
    pub end: String,

    pub filter: String,
    pub exp: String,

    pub camera: String,
    pub satellite_tracking: bool,
    pub tracking_mode: u8,
}

impl ScheduleRow {
    pub fn display_name (&self, prefixes: &[String])->String {
        display_name( &self.target, prefixes)
    }

    pub fn lookup_id (&self, prefixes: &[String])->Option<String> {
        lookup_id( &self.target, prefixes)
    }
}

/// the loaded schedule sheet, in natural (sheet) row order
pub struct ScheduleTable {
    rows: Vec<ScheduleRow>
}

impl ScheduleTable {
    /// parse the cached sheet snapshot. Rows without a target identifier or a
    /// parsable night-of-date are not schedulable and dropped here
    pub fn from_csv_path (path: impl AsRef<Path>)->Result<Self> {
        let mut reader = csv::Reader::from_path( path.as_ref())?;
        let mut rows: Vec<ScheduleRow> = Vec::new();

        for (row_index,record) in reader.deserialize().enumerate() {
            let raw: RawRow = record?;

            let target = raw.target.trim().to_string();
            let nod = raw.nod.trim();
            if target.is_empty() || nod.is_empty() { continue }

            let night_of_date = match NaiveDate::parse_from_str( nod, "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    warn!("row {} ({}): unparsable night-of-date {:?}, skipping", row_index, target, nod);
                    continue
                }
            };

            let camera = if raw.camera.trim().is_empty() { "CCD".to_string() } else { raw.camera.trim().to_string() };
            let satellite_tracking = raw.satellite_tracking.trim() == "1";
            let tracking_mode: u8 = raw.tracking_mode.trim().parse().unwrap_or(0);

            rows.push( ScheduleRow {
                row_index,
                target,
                night_of_date,
                start: raw.start.trim().to_string(),
                end: raw.end.trim().to_string(),
                filter: raw.filter.trim().to_string(),
                exp: raw.exp.trim().to_string(),
                camera,
                satellite_tracking,
                tracking_mode,
            });
        }

        Ok( ScheduleTable { rows } )
    }

    /// rows whose observing night is today or later, in sheet order (not re-sorted)
    pub fn upcoming (&self, today: NaiveDate)->impl Iterator<Item=&ScheduleRow> {
        self.rows.iter().filter( move |row| row.night_of_date >= today)
    }

    /// lookup by sheet row index
    pub fn row (&self, index: usize)->Result<&ScheduleRow> {
        self.rows.iter().find( |row| row.row_index == index)
            .ok_or( NightplanError::RowNotFound(index))
    }

    pub fn rows (&self)->&[ScheduleRow] { &self.rows }

    pub fn len (&self)->usize { self.rows.len() }

    pub fn is_empty (&self)->bool { self.rows.is_empty() }
}

/* #region target identifier normalization ************************************************************/

fn catalog_prefix_of<'a> (target: &str, prefixes: &'a [String])->Option<&'a str> {
    for p in prefixes {
        // get() instead of slicing - the prefix length might fall inside a multi-byte char
        if let Some(head) = target.get( ..p.len()) {
            if target.len() > p.len() && head.eq_ignore_ascii_case( p) {
                return Some( p.as_str())
            }
        }
    }
    None
}

/// the filename/display form: internal whitespace removed and periods replaced by
/// hyphens for recognized catalog identifiers ("TOI 1234.01" -> "TOI1234-01"),
/// the trimmed identifier otherwise
pub fn display_name (target: &str, prefixes: &[String])->String {
    let target = target.trim();

    if catalog_prefix_of( target, prefixes).is_some() {
        target.chars()
            .filter( |c| !c.is_whitespace())
            .map( |c| if c == '.' {'-'} else {c})
            .collect()
    } else {
        target.to_string()
    }
}

/// the ephemeris lookup form: catalog prefix stripped and whitespace removed
/// ("TOI 1234.01" -> "1234.01"). None for targets without a recognized prefix
pub fn lookup_id (target: &str, prefixes: &[String])->Option<String> {
    let target = target.trim();

    catalog_prefix_of( target, prefixes).map( |p| {
        target[p.len()..].chars().filter( |c| !c.is_whitespace()).collect()
    })
}

/* #endregion target identifier normalization */
