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

//! assemble, validate and serialize observation tickets

use std::path::{Path,PathBuf};
use chrono::Offset;
use chrono_tz::Tz;
use serde::{Serialize,Deserialize};
use nightplan_common::{datetime::Clock, fs::store_file_contents_in_dir};
use crate::errors::{op_failed, NightplanError, Result};
use crate::resolve::ResolvedTarget;
use crate::satcat::SatelliteCatalog;

/// a single comma-separated spec value collapses to a scalar in the serialized ticket,
/// multiple values stay an ordered list
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>)
}

fn collapse<T> (mut values: Vec<T>)->OneOrMany<T> {
    if values.len() == 1 {
        OneOrMany::One( values.remove(0))
    } else {
        OneOrMany::Many( values)
    }
}

/// the `details` part of the serialized ticket - field names are the downstream
/// pipeline's wire format
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct TicketDetails {
    pub name: String,
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub filter: OneOrMany<String>,
    pub num: u32,
    pub exp_time: OneOrMany<f64>,
    pub camera: String,
    pub self_guide: bool,
    pub guide: bool,
    pub cycle_filter: bool,
    pub initial_focus: bool,
    pub satellite_tracking: bool,
    pub satellite_tracking_mode: u8,
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct ObservationTicket {
    #[serde(rename="type")]
    pub ticket_type: String,
    pub details: TicketDetails,
}

impl ObservationTicket {
    /// the downstream consumer expects 4-space indented UTF-8 JSON
    pub fn to_json_pretty (&self)->Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter( &mut buf, formatter);
        self.serialize( &mut serializer)?;

        String::from_utf8( buf).map_err(|e| op_failed(e))
    }

    /// write the ticket file `<name>.json` into the given directory
    pub fn save_in_dir (&self, dir: impl AsRef<Path>)->Result<PathBuf> {
        let filename = format!("{}.json", self.details.name);
        let mut contents = self.to_json_pretty()?;
        contents.push('\n');

        Ok( store_file_contents_in_dir( &dir.as_ref(), &filename, contents.as_bytes())? )
    }
}

/// caller/user supplied flag values - everything that is not on the schedule sheet
#[derive(Debug,Clone)]
pub struct TicketFlags {
    /// total number of exposures (not a sheet column)
    pub num: u32,
    pub self_guide: bool,
    pub guide: bool,
    pub cycle_filter: bool,
    pub initial_focus: bool,

    /// overrides for the sheet's satellite tracking values (None keeps the row's)
    pub satellite_tracking: Option<bool>,
    pub tracking_mode: Option<u8>,
}

impl Default for TicketFlags {
    fn default() -> Self {
        Self { num: 1, self_guide: false, guide: false, cycle_filter: false, initial_focus: false,
               satellite_tracking: None, tracking_mode: None }
    }
}

/* #region spec field parsing ************************************************************************/

fn normalize_filter (token: &str)->String {
    // the literal token "Ha" is kept verbatim, everything else is lowercased
    if token == "Ha" { token.to_string() } else { token.to_lowercase() }
}

/// parse the comma-separated free-text filter spec, preserving input order
pub fn parse_filter_spec (spec: &str)->Result<OneOrMany<String>> {
    let values: Vec<String> = spec.split(',')
        .map( |s| s.trim())
        .filter( |s| !s.is_empty())
        .map( |s| normalize_filter(s))
        .collect();

    if values.is_empty() {
        return Err( op_failed( format!("empty filter spec {spec:?}")))
    }
    Ok( collapse( values))
}

/// parse the comma-separated exposure spec. Values are numeric with an optional
/// trailing unit suffix ("30s" -> 30.0)
pub fn parse_exp_spec (spec: &str)->Result<OneOrMany<f64>> {
    let mut values: Vec<f64> = Vec::new();

    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() { continue }

        let number = token.trim_end_matches( |c: char| c.is_ascii_alphabetic());
        let value: f64 = number.parse().map_err(|_| op_failed( format!("invalid exposure value {token:?}")))?;
        values.push( value);
    }

    if values.is_empty() {
        return Err( op_failed( format!("empty exposure spec {spec:?}")))
    }
    Ok( collapse( values))
}

/* #endregion spec field parsing */

/// the serialized local UTC offset of the observatory zone at the given instant -
/// "-04:00" under daylight saving for the default zone, "-05:00" otherwise.
/// This is evaluated once per build call, not stored per sheet row
pub fn utc_offset_suffix (clock: &dyn Clock, tz: Tz)->String {
    let local = clock.now().with_timezone( &tz);
    let offset_secs = local.offset().fix().local_minus_utc();

    let sign = if offset_secs < 0 {'-'} else {'+'};
    let secs = offset_secs.abs();
    format!("{}{:02}:{:02}", sign, secs/3600, (secs%3600)/60)
}

/// assemble a complete ticket from a resolved target plus caller flags. If satellite
/// tracking is requested the (normalized) name must be a member of the satellite
/// catalog - a mismatch is the recoverable SatelliteNotFound condition and leaves no
/// partially built state behind
pub fn build (resolved: &ResolvedTarget, flags: &TicketFlags, satellites: &SatelliteCatalog,
              clock: &dyn Clock, tz: Tz)->Result<ObservationTicket> {
    let satellite_tracking = flags.satellite_tracking.unwrap_or( resolved.satellite_tracking);
    let satellite_tracking_mode = flags.tracking_mode.unwrap_or( resolved.tracking_mode);

    if satellite_tracking && !satellites.contains( &resolved.name) {
        return Err( NightplanError::SatelliteNotFound( resolved.name.clone()))
    }

    let offset = utc_offset_suffix( clock, tz);
    let start_time = format!("{}{}", resolved.start.format("%Y-%m-%d %H:%M:%S"), offset);
    let end_time = format!("{}{}", resolved.end.format("%Y-%m-%d %H:%M:%S"), offset);

    let filter = parse_filter_spec( &resolved.filter)?;
    let exp_time = parse_exp_spec( &resolved.exp)?;

    Ok( ObservationTicket {
        ticket_type: "observation_ticket".to_string(),
        details: TicketDetails {
            name: resolved.name.clone(),
            ra: resolved.ra.clone(),
            dec: resolved.dec.clone(),
            start_time,
            end_time,
            filter,
            num: flags.num,
            exp_time,
            camera: resolved.camera.clone(),
            self_guide: flags.self_guide,
            guide: flags.guide,
            cycle_filter: flags.cycle_filter,
            initial_focus: flags.initial_focus,
            satellite_tracking,
            satellite_tracking_mode,
        }
    })
}
