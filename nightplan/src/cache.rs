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

//! TTL-gated local cache for remote catalog resources

use std::io::Write;
use std::path::{Path,PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tokio::task::AbortHandle;
use nightplan_common::{info, datetime::secs, fs::{ensure_writable_dir,file_age}};
use crate::errors::{fetch_error, NightplanError, Result};

/// descriptor of one remote resource held in the cache.
/// note the snapshot is never deleted automatically - it is only overwritten once its TTL expired
#[derive(Debug,Clone)]
pub struct CacheSpec {
    /// resource name used in error reporting
    pub key: String,

    /// name of the local snapshot within the cache dir
    pub filename: String,

    pub url: String,
    pub ttl: Duration,
    pub timeout: Duration,
}

impl CacheSpec {
    pub fn new (key: &str, filename: &str, url: &str, ttl: Duration, timeout: Duration)->Self {
        CacheSpec { key: key.to_string(), filename: filename.to_string(), url: url.to_string(), ttl, timeout }
    }
}

/// seam for the HTTP transport so that tests can inject failing/canned downloads
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get (&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>,String>;
}

/// the production transport - a single bounded-timeout request, no retries
pub struct HttpTransport {
    client: Client
}

impl HttpTransport {
    pub fn new ()->Self {
        HttpTransport { client: Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get (&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>,String> {
        let response = self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err( format!("request failed with code {}", response.status().as_str()))
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok( bytes.to_vec() )
    }
}

/// local store for the remote catalog snapshots. Freshness is derived from the
/// snapshot file's modification time, which makes the TTL survive process restarts
pub struct CacheStore {
    dir: PathBuf,
    transport: Box<dyn Transport>,
}

impl CacheStore {
    pub fn new (dir: impl AsRef<Path>)->Result<Self> {
        Self::with_transport( dir, Box::new( HttpTransport::new()))
    }

    pub fn with_transport (dir: impl AsRef<Path>, transport: Box<dyn Transport>)->Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        ensure_writable_dir( &dir)?;
        Ok( CacheStore { dir, transport } )
    }

    pub fn dir (&self)->&Path { &self.dir }

    pub fn path_for (&self, spec: &CacheSpec)->PathBuf {
        self.dir.join( &spec.filename)
    }

    /// the main getter: a local snapshot younger than the TTL short-circuits without
    /// any network call, otherwise a single bounded-timeout request replaces it.
    /// At most one outstanding fetch per resource - overlapping calls for the same
    /// spec are a caller error
    pub async fn fetch (&self, spec: &CacheSpec)->Result<PathBuf> {
        let path = self.path_for( spec);

        if let Some(age) = file_age( &path) {
            if age < spec.ttl {
                info!("cached {} still fresh ({} min old)", spec.key, age.as_secs()/60);
                return Ok(path)
            }
        }

        info!("fetching {} from {}..", spec.key, spec.url);
        let data = self.transport.get( &spec.url, spec.timeout).await
            .map_err(|reason| fetch_error!( spec.key, "{reason}"))?;

        // don't write into the snapshot directly - a failed download must never
        // clobber the previous copy (write-then-publish)
        let mut file = tempfile::NamedTempFile::new_in( &self.dir)?;
        file.write_all( &data)?;
        file.persist( &path).map_err(|e| NightplanError::IOError(e.error))?;

        info!("{} bytes saved to {:?}", data.len(), path);
        Ok(path)
    }

    /// fetch with a detached "please wait" ticker running alongside. The ticker is
    /// pure presentation - it has no data dependency on the fetch and is aborted as
    /// soon as the fetch resolves either way
    pub async fn fetch_with_progress (&self, spec: &CacheSpec)->Result<PathBuf> {
        let ticker = spawn_progress_task( &spec.key, secs(5));
        let result = self.fetch( spec).await;
        ticker.abort();
        result
    }
}

/// spawn the cancelable progress-notification task for an outstanding fetch
pub fn spawn_progress_task (resource: &str, period: Duration)->AbortHandle {
    let resource = resource.to_string();
    let handle = tokio::spawn( async move {
        loop {
            tokio::time::sleep( period).await;
            info!("still fetching {}..", resource);
        }
    });
    handle.abort_handle()
}
