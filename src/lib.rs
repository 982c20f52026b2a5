//! Client for the myUplink heat-pump telemetry API.
//!
//! [`UplinkClient::connect`] authenticates once with the credentials in [`Config`];
//! the resource calls then resolve the account's group and device and fetch parameter
//! history. Named series are merged into a per-series history on disk by
//! [`SeriesCache`], and [`plot::render`] draws any number of tables on one chart.

pub mod config;
pub mod constants;
pub mod data_mgmt;
pub mod error;
pub mod helpers;
pub mod interfaces;
pub mod plot;

pub use config::{Config, Credentials};
pub use data_mgmt::{DeviceId, DuplicatePolicy, GroupId, ParameterId, Point, Row, Series, SeriesCache, Table};
pub use error::UplinkError;
pub use interfaces::{BearerToken, UplinkClient};
