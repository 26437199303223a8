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

//! satellite-name catalog derived from a TLE-formatted text feed

use std::collections::HashSet;
use std::path::{Path,PathBuf};
use lazy_static::lazy_static;
use regex::Regex;
use nightplan_common::{info, fs::{filepath_contents_as_string, store_file_contents_in_dir}};
use crate::cache::{CacheSpec,CacheStore};
use crate::errors::Result;

lazy_static! {
    /// regex to split a parenthesized satellite name into its alias and parenthetical
    /// e.g. "ISS (ZARYA)" -> "ISS"
    static ref ALIAS_RE: Regex = Regex::new( r"^(.+?)\s*\(.+\)$").unwrap();
}

/// filename of the sorted one-name-per-line snapshot kept next to the raw feed
pub const NAMES_FILENAME: &'static str = "satellite_names.txt";

/// the set of normalized (uppercased) satellite names currently known.
/// Names carrying a parenthetical (e.g. "ISS (ZARYA)") are additionally indexed
/// under their parenthetical-stripped alias ("ISS")
pub struct SatelliteCatalog {
    names: HashSet<String>
}

impl SatelliteCatalog {
    /// every line of a TLE feed that is not an element line (starting with '1' or '2')
    /// is a satellite name
    pub fn from_tle_text (text: &str)->Self {
        let mut names: HashSet<String> = HashSet::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('1') || line.starts_with('2') { continue }

            let name = line.to_uppercase();
            if let Some(cap) = ALIAS_RE.captures( &name) {
                names.insert( cap[1].to_string());
            }
            names.insert( name);
        }

        SatelliteCatalog { names }
    }

    /// fetch the feed through the TTL-gated cache, parse it and persist the
    /// sorted name snapshot beside it
    pub async fn load (store: &CacheStore, spec: &CacheSpec)->Result<Self> {
        let path = store.fetch_with_progress( spec).await?;
        let text = filepath_contents_as_string( &path)?;

        let catalog = Self::from_tle_text( &text);
        catalog.save_names( store.dir())?;

        info!("satellite catalog has {} names", catalog.len());
        Ok(catalog)
    }

    pub fn save_names (&self, dir: &Path)->Result<PathBuf> {
        let mut sorted: Vec<&str> = self.names.iter().map(|s| s.as_str()).collect();
        sorted.sort();

        let mut contents = sorted.join("\n");
        contents.push('\n');

        Ok( store_file_contents_in_dir( &dir, NAMES_FILENAME, contents.as_bytes())? )
    }

    /// case-insensitive, exact membership check
    pub fn contains (&self, name: &str)->bool {
        self.names.contains( name.trim().to_uppercase().as_str())
    }

    pub fn len (&self)->usize { self.names.len() }

    pub fn is_empty (&self)->bool { self.names.is_empty() }
}
