use anyhow::Result;

use myuplink::{Config, UplinkClient};

pub fn categories() -> Result<()> {
    let client = UplinkClient::connect(Config::from_env()?)?;
    let group = client.get_current_group()?;
    log::info!("Group ID: {group}");

    for (name, id) in client.get_categories(&group)? {
        println!("{id}\t{name}");
    }
    Ok(())
}
