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

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use nightplan::{load_catalogs, load_config, NightplanConfig};
use nightplan::batch::materialize_all;
use nightplan::cache::CacheStore;
use nightplan::ticket::TicketFlags;
use nightplan_common::datetime::{Clock,WallClock};

#[derive(Parser)]
#[command(about="fetch the remote catalogs and materialize a ticket file for every upcoming schedule row")]
struct Args {
    #[arg(short,long,help="filename of nightplan config (RON), built-in defaults otherwise")]
    config: Option<String>,

    #[arg(long,default_value_t=1,help="total number of exposures per ticket")]
    num: u32,

    #[arg(long,help="enable self guiding")]
    self_guide: bool,

    #[arg(long,help="enable external guiding")]
    guide: bool,

    #[arg(long,help="cycle the filter wheel between exposures")]
    cycle_filter: bool,

    #[arg(long,help="run initial focusing before the first exposure")]
    initial_focus: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg: NightplanConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => NightplanConfig::default()
    };

    let store = CacheStore::new( &cfg.cache_dir)?;
    let catalogs = load_catalogs( &cfg, &store).await?;

    let clock = WallClock;
    let today = clock.now().with_timezone( &cfg.observatory_tz).date_naive();

    let flags = TicketFlags {
        num: args.num,
        self_guide: args.self_guide,
        guide: args.guide,
        cycle_filter: args.cycle_filter,
        initial_focus: args.initial_focus,
        ..TicketFlags::default()
    };

    let outcome = materialize_all( &catalogs.schedule, today, &catalogs.ephemeris, &catalogs.satellites,
                                   &flags, &cfg, &clock)?;

    println!("{} tickets archived in {:?}", outcome.files.len(), outcome.night_dir);
    for failure in &outcome.failures {
        eprintln!("row {} ({}) failed: {}", failure.row_index, failure.target, failure.error);
    }
    println!("{}", outcome.run_cmd);

    Ok(())
}
