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

//! reconcile a chosen schedule row with the ephemeris catalog and resolve the
//! absolute observation start/end timestamps

use chrono::{Days,NaiveDate,NaiveDateTime,NaiveTime,Timelike};
use crate::ephemeris::EphemerisCatalog;
use crate::errors::{time_parse_error, NightplanError, Result};
use crate::schedule::{display_name, lookup_id, ScheduleRow};

/// a fully resolved schedule row. Never persisted directly - only as part of a ticket
#[derive(Debug,Clone)]
pub struct ResolvedTarget {
    pub name: String,

    /// unset if the target has no ephemeris entry - ticket creation still proceeds
    pub ra: Option<String>,
    pub dec: Option<String>,

    pub start: NaiveDateTime,
    pub end: NaiveDateTime,

    pub filter: String,
    pub exp: String,
    pub camera: String,
    pub satellite_tracking: bool,
    pub tracking_mode: u8,
}

/// the day-rollover rule: a clock hour <= 12 is a post-midnight observation and belongs
/// to the calendar day after the night-of-date, a clock hour > 12 to the night-of-date itself
pub fn rollover_date (night_of_date: NaiveDate, clock: NaiveTime)->NaiveDate {
    if clock.hour() <= 12 {
        night_of_date + Days::new(1)
    } else {
        night_of_date
    }
}

fn parse_clock (row_name: &str, value: &str)->Result<NaiveTime> {
    NaiveTime::parse_from_str( value.trim(), "%H:%M")
        .map_err(|_| time_parse_error!( row_name, value))
}

/// map a schedule row to a ResolvedTarget. A missing ephemeris entry leaves the
/// coordinates unset; a malformed clock string fails with a TimeParse error naming the row
pub fn resolve (row: &ScheduleRow, ephemeris: &EphemerisCatalog, prefixes: &[String])->Result<ResolvedTarget> {
    let name = display_name( &row.target, prefixes);

    let (ra,dec) = match row.lookup_id( prefixes).and_then( |id| ephemeris.lookup( &id)) {
        Some(entry) => (Some(entry.ra.clone()), Some(entry.dec.clone())),
        None => (None, None)
    };

    let start_clock = parse_clock( &name, &row.start)?;
    let end_clock = parse_clock( &name, &row.end)?;

    // rollover is applied independently to start and end since an observation may span midnight
    let start = rollover_date( row.night_of_date, start_clock).and_time( start_clock);
    let end = rollover_date( row.night_of_date, end_clock).and_time( end_clock);

    Ok( ResolvedTarget {
        name,
        ra, dec,
        start, end,
        filter: row.filter.clone(),
        exp: row.exp.clone(),
        camera: row.camera.clone(),
        satellite_tracking: row.satellite_tracking,
        tracking_mode: row.tracking_mode,
    })
}
