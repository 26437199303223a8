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

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize,Ordering};
use std::time::{Duration,SystemTime};
use async_trait::async_trait;
use nightplan::NightplanError;
use nightplan::cache::{CacheSpec,CacheStore,Transport};
use nightplan_common::datetime::{hours,secs};
use nightplan_common::fs::{filepath_contents_as_string,set_modified_timestamp};

const PAYLOAD: &'static str = "NoD,Target\n2024-06-01,TOI 1234.01\n";

struct CannedTransport {
    calls: Arc<AtomicUsize>,
    payload: &'static str,
}

#[async_trait]
impl Transport for CannedTransport {
    async fn get (&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>,String> {
        self.calls.fetch_add( 1, Ordering::SeqCst);
        Ok( self.payload.as_bytes().to_vec())
    }
}

struct TimeoutTransport {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Transport for TimeoutTransport {
    async fn get (&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>,String> {
        self.calls.fetch_add( 1, Ordering::SeqCst);
        Err( "request timed out".to_string())
    }
}

fn test_spec ()->CacheSpec {
    CacheSpec::new( "test resource", "test.csv", "https://example.org/test.csv", hours(12), secs(30))
}

#[tokio::test]
async fn test_ttl_gate () {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new( AtomicUsize::new(0));
    let transport = CannedTransport { calls: calls.clone(), payload: PAYLOAD };
    let store = CacheStore::with_transport( dir.path(), Box::new(transport)).unwrap();
    let spec = test_spec();

    let p1 = store.fetch( &spec).await.unwrap();
    let p2 = store.fetch( &spec).await.unwrap();

    assert_eq!( p1, p2);
    assert_eq!( calls.load(Ordering::SeqCst), 1); // second call within TTL hits the snapshot
    assert_eq!( filepath_contents_as_string(&p1).unwrap(), PAYLOAD);

    // age the snapshot past the TTL - the next fetch has to go out again
    set_modified_timestamp( &p1, SystemTime::now() - hours(13)).unwrap();
    store.fetch( &spec).await.unwrap();
    assert_eq!( calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_fetch_keeps_prior_snapshot () {
    let dir = tempfile::tempdir().unwrap();
    let spec = test_spec();

    let calls = Arc::new( AtomicUsize::new(0));
    let transport = CannedTransport { calls: calls.clone(), payload: PAYLOAD };
    let store = CacheStore::with_transport( dir.path(), Box::new(transport)).unwrap();
    let path = store.fetch( &spec).await.unwrap();

    // same cache dir, but every request now times out
    let timeouts = Arc::new( AtomicUsize::new(0));
    let store = CacheStore::with_transport( dir.path(), Box::new( TimeoutTransport { calls: timeouts.clone() })).unwrap();
    set_modified_timestamp( &path, SystemTime::now() - hours(13)).unwrap();

    let result = store.fetch( &spec).await;
    match result {
        Err(NightplanError::FetchError{ resource, .. }) => assert_eq!( resource, "test resource"),
        other => panic!("expected FetchError, got {other:?}")
    }
    assert_eq!( timeouts.load(Ordering::SeqCst), 1); // exactly one attempt, no retry

    // the stale snapshot is untouched and still readable
    assert_eq!( filepath_contents_as_string(&path).unwrap(), PAYLOAD);
}

#[tokio::test]
async fn test_fresh_snapshot_without_any_network_call () {
    let dir = tempfile::tempdir().unwrap();
    let spec = test_spec();

    std::fs::write( dir.path().join(&spec.filename), PAYLOAD).unwrap();

    let calls = Arc::new( AtomicUsize::new(0));
    let store = CacheStore::with_transport( dir.path(), Box::new( TimeoutTransport { calls: calls.clone() })).unwrap();

    let path = store.fetch( &spec).await.unwrap();
    assert_eq!( calls.load(Ordering::SeqCst), 0);
    assert_eq!( filepath_contents_as_string(&path).unwrap(), PAYLOAD);
}
