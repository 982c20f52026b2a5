pub mod cache;
pub mod models;
pub mod series;

pub use cache::{DuplicatePolicy, SeriesCache};
pub use models::{DeviceId, GroupId, Identifier, ParameterId, Point, Row, Table};
pub use series::Series;
