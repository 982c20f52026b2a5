use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, UplinkError};

/// Opaque group/device identifier; the API returns these as strings or integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier(s)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => Identifier(s),
            Raw::Int(i) => Identifier(i.to_string()),
        })
    }
}

pub type GroupId = Identifier;
pub type DeviceId = Identifier;
pub type ParameterId = Identifier;

/// Time-series point as returned by the points endpoint, and as stored in cache files.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Point {
    pub timestamp: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub timestamp: DateTime<Tz>,
    pub value: f64,
    pub unit: String,
}

impl Row {
    pub fn from_point(point: &Point, timezone: Tz) -> Result<Self> {
        Ok(Row {
            timestamp: parse_timestamp(&point.timestamp)?.with_timezone(&timezone),
            value: point.value,
            unit: point.unit.clone(),
        })
    }

    pub fn to_point(&self) -> Point {
        Point {
            timestamp: self.timestamp.to_rfc3339(),
            value: self.value,
            unit: self.unit.clone(),
        }
    }
}

/// Timestamp-keyed table of readings for a single parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Table { rows }
    }

    /// Normalize raw points into the given zone, keeping their order.
    pub fn from_points(points: &[Point], timezone: Tz) -> Result<Self> {
        points
            .iter()
            .map(|p| Row::from_point(p, timezone))
            .collect::<Result<Vec<_>>>()
            .map(Table::new)
    }

    pub fn to_points(&self) -> Vec<Point> {
        self.rows.iter().map(Row::to_point).collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn unit(&self) -> Option<&str> {
        self.rows.first().map(|r| r.unit.as_str())
    }

    pub fn get(&self, timestamp: &DateTime<Tz>) -> Option<&Row> {
        self.rows.iter().find(|r| &r.timestamp == timestamp)
    }
}

/// Parse an API timestamp. Naive timestamps are taken to be UTC.
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| UplinkError::Parse(format!("invalid timestamp '{timestamp}': {e}")))
}
