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

use std::time::SystemTime;
use nightplan_common::datetime::hours;
use nightplan_common::fs::{ensure_writable_dir, file_age, filepath_contents_as_string,
                           set_modified_timestamp, store_file_contents_in_dir};

// run with "cargo test test_xx -- --nocapture"

#[test]
fn test_store_and_read_back () {
    let dir = tempfile::tempdir().unwrap();
    let path = store_file_contents_in_dir( &dir.path(), "snapshot.csv", b"a,b\n1,2\n").unwrap();

    assert!( path.is_file());
    assert_eq!( filepath_contents_as_string( &path).unwrap(), "a,b\n1,2\n");
}

#[test]
fn test_file_age_tracks_mtime () {
    let dir = tempfile::tempdir().unwrap();
    let path = store_file_contents_in_dir( &dir.path(), "snapshot.csv", b"x").unwrap();

    assert!( file_age( &path).unwrap() < hours(1));

    set_modified_timestamp( &path, SystemTime::now() - hours(13)).unwrap();
    assert!( file_age( &path).unwrap() > hours(12));
}

#[test]
fn test_ensure_writable_dir_creates () {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    assert!( ensure_writable_dir( &nested).is_ok());
    assert!( nested.is_dir());
}
