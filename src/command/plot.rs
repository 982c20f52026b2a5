use anyhow::{anyhow, Result};

use myuplink::plot::{render, PlotOptions};
use myuplink::{Config, Table, UplinkClient};

use crate::argsets::PlotArgs;

pub fn plot(args: PlotArgs) -> Result<()> {
    if args.series.is_empty() {
        return Err(anyhow!("At least one series must be given"));
    }

    let client = UplinkClient::connect(Config::from_env()?)?;
    let group = client.get_current_group()?;
    let device = client.get_first_device(&group)?;

    let tables = args
        .series
        .iter()
        .map(|s| client.fetch_table(*s, &device, args.days))
        .collect::<Result<Vec<Table>, _>>()?;
    let names: Vec<String> = args.series.iter().map(ToString::to_string).collect();
    let labelled: Vec<(&str, &Table)> = names.iter().map(String::as_str).zip(tables.iter()).collect();

    let mut options = PlotOptions::default();
    if let Some(output) = args.output {
        options.output = output;
    }
    let title = args.title.unwrap_or_else(|| names.join(", "));

    render(&labelled, &title, None, &options)?;
    println!("{}", options.output.display());
    Ok(())
}
