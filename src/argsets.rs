use std::path::PathBuf;

use myuplink::Series;

pub struct FetchArgs {
    pub series: Series,
    pub days: u32,
}

pub struct PlotArgs {
    pub series: Vec<Series>,
    pub days: u32,
    pub title: Option<String>,
    pub output: Option<PathBuf>,
}
