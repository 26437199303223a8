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
use nightplan::{load_config, NightplanConfig};
use nightplan::cache::CacheStore;
use nightplan::schedule::ScheduleTable;
use nightplan_common::datetime::{Clock,WallClock};

#[derive(Parser)]
#[command(about="list the upcoming rows of the shared observation schedule")]
struct Args {
    #[arg(short,long,help="filename of nightplan config (RON), built-in defaults otherwise")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let cfg: NightplanConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => NightplanConfig::default()
    };

    let store = CacheStore::new( &cfg.cache_dir)?;
    let path = store.fetch_with_progress( &cfg.schedule_cache_spec()).await?;
    let table = ScheduleTable::from_csv_path( &path)?;

    let today = WallClock.now().with_timezone( &cfg.observatory_tz).date_naive();

    println!("{:>4} {:<20} {:<12} {:>6} {:>6}  {:<12} {}", "row", "target", "night of", "start", "end", "filter", "exp");
    for row in table.upcoming( today) {
        println!("{:>4} {:<20} {:<12} {:>6} {:>6}  {:<12} {}",
                 row.row_index, row.display_name( &cfg.catalog_prefixes), row.night_of_date,
                 row.start, row.end, row.filter, row.exp);
    }

    Ok(())
}
