mod argsets;
mod command;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use myuplink::constants::defaults;
use myuplink::{helpers, Series};

const CMD_SERIES: &str = "series";
const CMD_CATEGORIES: &str = "categories";
const CMD_FETCH: &str = "fetch";
const CMD_PLOT: &str = "plot";

fn main() -> Result<()> {
    let env_file = helpers::load_dotenv();
    helpers::init_logging();
    match env_file {
        Ok(Some(path)) => log::debug!("Loaded {}", path.display()),
        Ok(None) => {}
        Err(e) => log::warn!("Could not load .env: {}", e),
    }

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_SERIES) => command::series(),
        Some(CMD_CATEGORIES) => command::categories(),
        Some(CMD_FETCH) => command::fetch(argsets::FetchArgs {
            days: args.opt_value_from_str("--days")?.unwrap_or(defaults::FETCH_DAYS),
            series: args.free_from_str()?,
        }),
        Some(CMD_PLOT) => {
            let days = args.opt_value_from_str("--days")?.unwrap_or(defaults::FETCH_DAYS);
            let title: Option<String> = args.opt_value_from_str("--title")?;
            let output: Option<PathBuf> = args.opt_value_from_str("--output")?;
            let series = args
                .finish()
                .into_iter()
                .map(|s| {
                    s.to_str()
                        .ok_or_else(|| anyhow!("Series name is not valid UTF-8: {:?}", s))?
                        .parse::<Series>()
                        .map_err(Into::into)
                })
                .collect::<Result<Vec<_>>>()?;
            command::plot(argsets::PlotArgs {
                series,
                days,
                title,
                output,
            })
        }
        _ => Err(anyhow!(
            "Subcommand must be one of 'series', 'categories', 'fetch', 'plot'"
        )),
    }
}
