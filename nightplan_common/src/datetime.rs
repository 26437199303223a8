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

use chrono::{DateTime,NaiveDate,NaiveDateTime,NaiveTime,Utc};
use std::time::Duration;

// as of Rust 1.87 the min,hour,day Duration ctors are experimental and require multiple crate attributes.
// for simple use cases that do not require to handle leap seconds and the like we therefore provide our own wrappers
// to reduce nightly/crate attr dependencies
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }
#[inline] pub fn days (n: u64)->Duration { Duration::from_secs(n * 86400) }

/// get a DateTime<Utc> from a NaiveDate that is supposed to be in Utc
pub fn naive_utc_date_to_utc_datetime (nd: NaiveDate) -> DateTime<Utc> {
    let nt = NaiveTime::from_hms_opt(0, 0, 0).unwrap(); // 00:00:00 can't fail
    let ndt = NaiveDateTime::new(nd,nt);

    DateTime::from_naive_utc_and_offset(ndt,Utc)
}

/* #region clock capability ****************************************************************************/

/// explicit source of "now" - everything that bases decisions on the current instant
/// (cache freshness, UTC offsets, night folder names) takes a &dyn Clock so that
/// tests can fix the instant instead of depending on the wall clock
pub trait Clock: Send + Sync {
    fn now (&self)->DateTime<Utc>;
}

/// the normal production clock
pub struct WallClock;

impl Clock for WallClock {
    fn now (&self)->DateTime<Utc> { Utc::now() }
}

/// a clock pinned to a fixed instant
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at (dt: DateTime<Utc>)->Self { FixedClock(dt) }
}

impl Clock for FixedClock {
    fn now (&self)->DateTime<Utc> { self.0 }
}

/* #endregion clock capability */
