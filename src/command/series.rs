use anyhow::Result;

use myuplink::Series;

pub fn series() -> Result<()> {
    for series in Series::ALL {
        println!("{}\t{}\t{}", series.name(), series.parameter_id(), series.cache_key());
    }
    Ok(())
}
