mod categories;
mod fetch;
mod plot;
mod series;

pub use categories::categories;
pub use fetch::fetch;
pub use plot::plot;
pub use series::series;
