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

//! coordinate lookup for transiting objects from the cached ephemeris table

use std::collections::HashMap;
use std::path::Path;
use crate::errors::{config_error, Result};

#[derive(Debug,Clone)]
pub struct EphemerisEntry {
    pub object_id: String,
    pub ra: String,
    pub dec: String,
}

/// the ephemeris/transit table, keyed by the normalized (catalog-prefix stripped)
/// object identifier
pub struct EphemerisCatalog {
    entries: HashMap<String,EphemerisEntry>
}

impl EphemerisCatalog {
    /// parse the cached CSV snapshot. Columns are located by header name - the table
    /// carries many more columns than we use
    pub fn from_csv_path (path: impl AsRef<Path>, id_column: &str)->Result<Self> {
        let mut reader = csv::Reader::from_path( path.as_ref())?;
        let headers = reader.headers()?.clone();

        let id_idx = column_index( &headers, id_column)
            .ok_or( config_error( format!("no {id_column:?} column in ephemeris table")))?;
        let ra_idx = column_index( &headers, "RA")
            .ok_or( config_error("no \"RA\" column in ephemeris table"))?;
        let dec_idx = column_index( &headers, "Dec")
            .ok_or( config_error("no \"Dec\" column in ephemeris table"))?;

        let mut entries: HashMap<String,EphemerisEntry> = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let object_id = record.get(id_idx).unwrap_or("").trim().to_string();
            if object_id.is_empty() { continue }

            let ra = record.get(ra_idx).unwrap_or("").trim().to_string();
            let dec = record.get(dec_idx).unwrap_or("").trim().to_string();

            entries.insert( object_id.clone(), EphemerisEntry { object_id, ra, dec });
        }

        Ok( EphemerisCatalog { entries } )
    }

    pub fn lookup (&self, object_id: &str)->Option<&EphemerisEntry> {
        self.entries.get( object_id.trim())
    }

    pub fn len (&self)->usize { self.entries.len() }

    pub fn is_empty (&self)->bool { self.entries.is_empty() }
}

fn column_index (headers: &csv::StringRecord, name: &str)->Option<usize> {
    headers.iter().position( |h| h.trim().eq_ignore_ascii_case( name))
}
