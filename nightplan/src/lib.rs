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
#![allow(unused)]

//! turn a shared, remotely hosted observation schedule into validated observation-ticket
//! files for the downstream automation pipeline, with TTL-gated caching of the remote
//! catalogs and collision-safe per-night folder organization

use std::path::{Path,PathBuf};
use std::time::Duration;
use chrono_tz::Tz;
use serde::{Serialize,Deserialize};
use nightplan_common::{datetime::{secs,hours}, fs::filepath_contents_as_string};

mod errors;
pub use errors::*;

pub mod cache;
pub mod satcat;
pub mod ephemeris;
pub mod schedule;
pub mod resolve;
pub mod ticket;
pub mod batch;

use cache::{CacheSpec,CacheStore};
use ephemeris::EphemerisCatalog;
use satcat::SatelliteCatalog;
use schedule::ScheduleTable;

/// general server / cache / ticket-output parameters configuration
#[derive(Clone,Serialize,Deserialize,Debug)]
pub struct NightplanConfig {
    /// CSV export URL of the shared schedule sheet
    pub schedule_url: String,

    /// URL of the transiting-object ephemeris table (CSV)
    pub ephemeris_url: String,

    /// URL of the satellite catalog (TLE-formatted text feed)
    pub satellite_url: String,

    /// where the remote snapshots are kept
    pub cache_dir: PathBuf,

    /// where ticket files and night folders are created
    pub ticket_dir: PathBuf,

    /// target identifiers starting with one of these tokens get the
    /// catalog normalization (whitespace removal, ephemeris lookup form)
    pub catalog_prefixes: Vec<String>,

    /// header name of the object-identifier column in the ephemeris table
    pub ephemeris_id_column: String,

    /// timezone of the observatory, used for UTC-offset suffixes and night folder names
    pub observatory_tz: Tz,

    /// max age of a cached snapshot before a refetch is attempted
    pub cache_ttl: Duration,

    /// request timeout for the schedule sheet and the satellite feed
    pub catalog_timeout: Duration,

    /// request timeout for the (much larger) ephemeris table
    pub ephemeris_timeout: Duration,

    /// shell invocation handed back after batch materialization ("${dir}" expands to the night folder)
    pub run_cmd_pattern: String,
}

impl Default for NightplanConfig {
    fn default() -> Self {
        Self {
            schedule_url: "https://docs.google.com/spreadsheets/d/REPLACE_WITH_SHEET_ID/export?format=csv".to_string(),
            ephemeris_url: "https://exofop.ipac.caltech.edu/tess/download_toi.php?sort=toi&output=csv".to_string(),
            satellite_url: "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=tle".to_string(),

            cache_dir: PathBuf::from("cache"),
            ticket_dir: PathBuf::from("tickets"),

            catalog_prefixes: vec!["TOI".to_string()],
            ephemeris_id_column: "TOI".to_string(),
            observatory_tz: chrono_tz::US::Eastern,

            cache_ttl: hours(12),
            catalog_timeout: secs(30),
            ephemeris_timeout: secs(90),

            run_cmd_pattern: "observe --plan ${dir}".to_string(),
        }
    }
}

impl NightplanConfig {
    pub fn schedule_cache_spec (&self)->CacheSpec {
        CacheSpec::new( "schedule sheet", "schedule.csv", &self.schedule_url, self.cache_ttl, self.catalog_timeout)
    }

    pub fn ephemeris_cache_spec (&self)->CacheSpec {
        CacheSpec::new( "ephemeris table", "ephemeris.csv", &self.ephemeris_url, self.cache_ttl, self.ephemeris_timeout)
    }

    pub fn satellite_cache_spec (&self)->CacheSpec {
        CacheSpec::new( "satellite catalog", "satellites.tle", &self.satellite_url, self.cache_ttl, self.catalog_timeout)
    }
}

/// read a RON config file into a deserializable config struct
pub fn load_config<C> (path: impl AsRef<Path>) -> Result<C> where C: for <'a> serde::Deserialize<'a> {
    let contents = filepath_contents_as_string( &path.as_ref())?;
    ron::from_str( contents.as_str()).map_err(|e| config_error( format!("{:?}: {e}", path.as_ref())))
}

/// the three remote catalogs the core works from, loaded through the TTL-gated cache
pub struct Catalogs {
    pub schedule: ScheduleTable,
    pub ephemeris: EphemerisCatalog,
    pub satellites: SatelliteCatalog,
}

pub async fn load_catalogs (cfg: &NightplanConfig, store: &CacheStore) -> Result<Catalogs> {
    let schedule_path = store.fetch_with_progress( &cfg.schedule_cache_spec()).await?;
    let ephemeris_path = store.fetch_with_progress( &cfg.ephemeris_cache_spec()).await?;

    let schedule = ScheduleTable::from_csv_path( &schedule_path)?;
    let ephemeris = EphemerisCatalog::from_csv_path( &ephemeris_path, &cfg.ephemeris_id_column)?;
    let satellites = SatelliteCatalog::load( store, &cfg.satellite_cache_spec()).await?;

    Ok( Catalogs { schedule, ephemeris, satellites } )
}
