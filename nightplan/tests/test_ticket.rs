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

use chrono::{TimeZone,Utc};
use nightplan::NightplanError;
use nightplan::resolve::ResolvedTarget;
use nightplan::satcat::SatelliteCatalog;
use nightplan::ticket::{build, parse_exp_spec, parse_filter_spec, utc_offset_suffix, OneOrMany, TicketFlags};
use nightplan_common::datetime::FixedClock;

const TLE_FEED: &'static str = "\
ISS (ZARYA)
1 25544U 98067A   24153.54791667  .00016717  00000-0  10270-3 0  9994
2 25544  51.6400 208.9163 0006317  69.9862 290.2117 15.49560532453473
NOAA 19
1 33591U 09005A   24153.51782528  .00000223  00000-0  14532-3 0  9998
2 33591  99.0981 195.4959 0013872 238.2397 121.7450 14.12800428788056
";

fn summer_clock ()->FixedClock {
    // 2024-06-01 22:00 US/Eastern (daylight saving active)
    FixedClock( Utc.with_ymd_and_hms(2024,6,2,2,0,0).unwrap())
}

fn winter_clock ()->FixedClock {
    FixedClock( Utc.with_ymd_and_hms(2024,1,15,18,0,0).unwrap())
}

fn resolved ()->ResolvedTarget {
    ResolvedTarget {
        name: "TOI1234-01".to_string(),
        ra: Some("10:00:00".to_string()),
        dec: Some("+20:00:00".to_string()),
        start: chrono::NaiveDate::from_ymd_opt(2024,6,1).unwrap().and_hms_opt(23,0,0).unwrap(),
        end: chrono::NaiveDate::from_ymd_opt(2024,6,2).unwrap().and_hms_opt(5,0,0).unwrap(),
        filter: "v,Ha".to_string(),
        exp: "30s,60s".to_string(),
        camera: "CCD".to_string(),
        satellite_tracking: false,
        tracking_mode: 0,
    }
}

#[test]
fn test_filter_spec_parsing () {
    // input order preserved, "Ha" kept verbatim, everything else lowercased
    assert_eq!( parse_filter_spec("Ha, v, R").unwrap(),
                OneOrMany::Many( vec!["Ha".to_string(),"v".to_string(),"r".to_string()]));

    // a single value collapses to a scalar, not a one-element list
    assert_eq!( parse_filter_spec("v").unwrap(), OneOrMany::One("v".to_string()));

    // a blank spec is a sheet error, same as a blank exposure spec
    assert!( parse_filter_spec("").is_err());
    assert!( parse_filter_spec(" , ").is_err());
}

#[test]
fn test_exp_spec_parsing () {
    assert_eq!( parse_exp_spec("30s,60s").unwrap(), OneOrMany::Many( vec![30.0,60.0]));
    assert_eq!( parse_exp_spec("10").unwrap(), OneOrMany::One(10.0));
    assert!( parse_exp_spec("ten seconds").is_err());
}

#[test]
fn test_satellite_catalog_membership () {
    let catalog = SatelliteCatalog::from_tle_text( TLE_FEED);

    // case-insensitive, with the parenthetical alias indexed separately
    assert!( catalog.contains("ISS (ZARYA)"));
    assert!( catalog.contains("iss (zarya)"));
    assert!( catalog.contains("iss"));
    assert!( catalog.contains("noaa 19"));
    assert!( !catalog.contains("HUBBLE"));
}

#[test]
fn test_utc_offset_follows_daylight_saving () {
    let tz = chrono_tz::US::Eastern;
    assert_eq!( utc_offset_suffix( &summer_clock(), tz), "-04:00");
    assert_eq!( utc_offset_suffix( &winter_clock(), tz), "-05:00");
}

#[test]
fn test_build_ticket () {
    let catalog = SatelliteCatalog::from_tle_text( TLE_FEED);
    let ticket = build( &resolved(), &TicketFlags::default(), &catalog,
                        &summer_clock(), chrono_tz::US::Eastern).unwrap();

    assert_eq!( ticket.ticket_type, "observation_ticket");
    assert_eq!( ticket.details.name, "TOI1234-01");
    assert_eq!( ticket.details.start_time, "2024-06-01 23:00:00-04:00");
    assert_eq!( ticket.details.end_time, "2024-06-02 05:00:00-04:00");
    assert_eq!( ticket.details.filter, OneOrMany::Many( vec!["v".to_string(),"Ha".to_string()]));
    assert_eq!( ticket.details.exp_time, OneOrMany::Many( vec![30.0,60.0]));
    assert_eq!( ticket.details.num, 1);
    assert_eq!( ticket.details.camera, "CCD");
    assert_eq!( ticket.details.satellite_tracking, false);
}

#[test]
fn test_serialized_shape () {
    let catalog = SatelliteCatalog::from_tle_text( TLE_FEED);
    let ticket = build( &resolved(), &TicketFlags::default(), &catalog,
                        &summer_clock(), chrono_tz::US::Eastern).unwrap();

    let json = ticket.to_json_pretty().unwrap();
    assert!( json.starts_with("{\n    \"type\": \"observation_ticket\""));
    assert!( json.contains("\n    \"details\": {"));
    assert!( json.contains("\n        \"name\": \"TOI1234-01\"")); // 4-space indent

    let value: serde_json::Value = serde_json::from_str( &json).unwrap();
    assert_eq!( value["details"]["filter"], serde_json::json!(["v","Ha"]));
    assert_eq!( value["details"]["ra"], serde_json::json!("10:00:00"));
}

#[test]
fn test_null_coordinates_serialize () {
    let mut target = resolved();
    target.ra = None;
    target.dec = None;

    let catalog = SatelliteCatalog::from_tle_text( TLE_FEED);
    let ticket = build( &target, &TicketFlags::default(), &catalog,
                        &summer_clock(), chrono_tz::US::Eastern).unwrap();

    let value: serde_json::Value = serde_json::from_str( &ticket.to_json_pretty().unwrap()).unwrap();
    assert!( value["details"]["ra"].is_null());
    assert!( value["details"]["dec"].is_null());
}

#[test]
fn test_satellite_mismatch_is_recoverable () {
    let mut target = resolved();
    target.name = "HST".to_string();
    target.satellite_tracking = true;
    target.tracking_mode = 1;

    let catalog = SatelliteCatalog::from_tle_text( TLE_FEED);
    let err = build( &target, &TicketFlags::default(), &catalog,
                     &summer_clock(), chrono_tz::US::Eastern).unwrap_err();
    match &err {
        NightplanError::SatelliteNotFound(name) => assert_eq!( name, "HST"),
        other => panic!("expected SatelliteNotFound, got {other:?}")
    }
    assert!( err.is_recoverable());

    // a corrected name succeeds against the same already-loaded catalog
    target.name = "ISS".to_string();
    let ticket = build( &target, &TicketFlags::default(), &catalog,
                        &summer_clock(), chrono_tz::US::Eastern).unwrap();
    assert_eq!( ticket.details.satellite_tracking, true);
    assert_eq!( ticket.details.satellite_tracking_mode, 1);
}
