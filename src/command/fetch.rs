use anyhow::Result;

use myuplink::{Config, UplinkClient};

use crate::argsets::FetchArgs;

const ROWS_TO_SHOW: usize = 5;

pub fn fetch(args: FetchArgs) -> Result<()> {
    let client = UplinkClient::connect(Config::from_env()?)?;
    let group = client.get_current_group()?;
    let device = client.get_first_device(&group)?;
    log::info!("Group ID: {group}; device ID: {device}");

    let table = client.fetch_table(args.series, &device, args.days)?;
    println!("{}: {} rows", args.series, table.len());
    for row in table.rows().iter().rev().take(ROWS_TO_SHOW).rev() {
        println!("{}\t{}\t{}", row.timestamp.to_rfc3339(), row.value, row.unit);
    }
    Ok(())
}
