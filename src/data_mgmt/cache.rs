use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::DateTime;
use chrono_tz::Tz;
use tempfile::NamedTempFile;

use crate::error::{Result, UplinkError};

use super::models::{Point, Row, Table};

const CACHE_FILE_EXT: &str = "json";

/// How rows that appear both in the cached history and in a fresh fetch are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Plain concatenation; repeated fetches grow the table.
    KeepAll,
    /// Drop rows identical in timestamp, value and unit to an earlier row.
    #[default]
    DropExactDuplicates,
    /// One row per instant; the later row's reading replaces the earlier one in place.
    LatestPerTimestamp,
}

impl FromStr for DuplicatePolicy {
    type Err = UplinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "keep" => Ok(DuplicatePolicy::KeepAll),
            "drop-exact" => Ok(DuplicatePolicy::DropExactDuplicates),
            "latest" => Ok(DuplicatePolicy::LatestPerTimestamp),
            other => Err(UplinkError::Config(format!(
                "unknown duplicate policy '{other}'; expected one of 'keep', 'drop-exact', 'latest'"
            ))),
        }
    }
}

/// Combine prior and fresh rows, prior first, then apply the duplicate policy.
pub fn merge(prior: Table, fresh: Table, policy: DuplicatePolicy) -> Table {
    let mut combined = prior.into_rows();
    combined.extend(fresh.into_rows());

    match policy {
        DuplicatePolicy::KeepAll => Table::new(combined),
        DuplicatePolicy::DropExactDuplicates => {
            let mut seen: HashSet<(DateTime<Tz>, u64, String)> = HashSet::with_capacity(combined.len());
            let kept = combined
                .into_iter()
                .filter(|row| seen.insert((row.timestamp, row.value.to_bits(), row.unit.clone())))
                .collect();
            Table::new(kept)
        }
        DuplicatePolicy::LatestPerTimestamp => {
            let mut slots: HashMap<DateTime<Tz>, usize> = HashMap::with_capacity(combined.len());
            let mut kept: Vec<Row> = Vec::with_capacity(combined.len());
            for row in combined {
                match slots.get(&row.timestamp) {
                    Some(&idx) => kept[idx] = row,
                    None => {
                        slots.insert(row.timestamp, kept.len());
                        kept.push(row);
                    }
                }
            }
            Table::new(kept)
        }
    }
}

/// Disk-backed history of fetched series, one file per cache key.
///
/// Every fetch is merged into the file for its key so repeated fetches add to the
/// history instead of replacing it. Files are replaced atomically, but nothing guards
/// against two processes updating the same key at once.
#[derive(Clone, Debug)]
pub struct SeriesCache {
    dir: PathBuf,
    policy: DuplicatePolicy,
    timezone: Tz,
}

impl SeriesCache {
    pub fn new(dir: impl Into<PathBuf>, policy: DuplicatePolicy, timezone: Tz) -> Self {
        SeriesCache {
            dir: dir.into(),
            policy,
            timezone,
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{CACHE_FILE_EXT}"))
    }

    pub fn load(&self, key: &str) -> Result<Option<Table>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        log::info!("Loading data from cache: {}", path.display());
        let reader = BufReader::new(fs::File::open(&path)?);
        let points: Vec<Point> = serde_json::from_reader(reader)
            .map_err(|e| UplinkError::Parse(format!("corrupt cache file {}: {e}", path.display())))?;
        Table::from_points(&points, self.timezone).map(Some)
    }

    pub fn merge(&self, prior: Table, fresh: Table) -> Table {
        merge(prior, fresh, self.policy)
    }

    /// Write the table for `key`, replacing any previous file in one rename.
    pub fn persist(&self, key: &str, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &table.to_points())?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| UplinkError::Io(e.error))?;

        log::debug!("Persisted {} rows to {}", table.len(), path.display());
        Ok(())
    }

    /// Fetch fresh points, fold them into the cached history for `key` and persist the result.
    pub fn get_cached_or_fetch<F>(&self, key: &str, fetch: F) -> Result<Table>
    where
        F: FnOnce() -> Result<Vec<Point>>,
    {
        let fresh = Table::from_points(&fetch()?, self.timezone)?;

        match self.load(key)? {
            Some(prior) => {
                log::info!("Old data: {} rows", prior.len());
                log::info!("New data: {} rows", fresh.len());
                let combined = self.merge(prior, fresh);
                log::info!("Combined data: {} rows", combined.len());
                self.persist(key, &combined)?;
                Ok(combined)
            }
            None => {
                log::info!("Saving data to cache: {}", self.path_for(key).display());
                self.persist(key, &fresh)?;
                Ok(fresh)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone, Utc};
    use chrono_tz::Europe::Helsinki;

    fn point(ts: &str, value: f64) -> Point {
        Point {
            timestamp: ts.to_string(),
            value,
            unit: "°C".to_string(),
        }
    }

    fn table(points: &[Point]) -> Table {
        Table::from_points(points, Helsinki).unwrap()
    }

    fn values(table: &Table) -> Vec<f64> {
        table.rows().iter().map(|r| r.value).collect()
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("keep".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::KeepAll);
        assert_eq!(
            "drop-exact".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::DropExactDuplicates
        );
        assert_eq!(
            "latest".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::LatestPerTimestamp
        );
        assert!("never".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_merge_keep_all_concatenates_prior_first() {
        let prior = table(&[point("2024-01-01T00:00:00Z", 1.0), point("2024-01-01T01:00:00Z", 2.0)]);
        let fresh = table(&[point("2024-01-01T01:00:00Z", 2.0), point("2024-01-01T02:00:00Z", 3.0)]);

        let merged = merge(prior, fresh, DuplicatePolicy::KeepAll);
        assert_eq!(values(&merged), vec![1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_merge_drop_exact_keeps_differing_readings() {
        let prior = table(&[point("2024-01-01T00:00:00Z", 1.0), point("2024-01-01T01:00:00Z", 2.0)]);
        let fresh = table(&[
            point("2024-01-01T01:00:00Z", 2.0),
            point("2024-01-01T01:00:00Z", 2.5),
            point("2024-01-01T02:00:00Z", 3.0),
        ]);

        let merged = merge(prior, fresh, DuplicatePolicy::DropExactDuplicates);
        assert_eq!(values(&merged), vec![1.0, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_merge_drop_exact_also_drops_repeats_within_fetch() {
        let fresh = table(&[point("2024-01-01T00:00:00Z", 1.0), point("2024-01-01T00:00:00Z", 1.0)]);
        let merged = merge(Table::default(), fresh, DuplicatePolicy::DropExactDuplicates);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_latest_per_timestamp() {
        let prior = table(&[point("2024-01-01T00:00:00Z", 1.0), point("2024-01-01T01:00:00Z", 2.0)]);
        let fresh = table(&[point("2024-01-01T01:00:00Z", 2.5), point("2024-01-01T02:00:00Z", 3.0)]);

        let merged = merge(prior, fresh, DuplicatePolicy::LatestPerTimestamp);
        assert_eq!(values(&merged), vec![1.0, 2.5, 3.0]);
    }

    fn hourly_points(start_hour: i64, count: i64) -> Vec<Point> {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (start_hour..start_hour + count)
            .map(|h| point(&(origin + Duration::hours(h)).to_rfc3339(), (h % 40) as f64 - 20.0))
            .collect()
    }

    #[test]
    fn test_merge_large_history() {
        // 50k rows of history, 50k fresh rows of which half overlap
        let prior = table(&hourly_points(0, 50_000));
        let fresh = table(&hourly_points(25_000, 50_000));

        let kept = merge(prior.clone(), fresh.clone(), DuplicatePolicy::KeepAll);
        assert_eq!(kept.len(), 100_000);

        let deduped = merge(prior.clone(), fresh.clone(), DuplicatePolicy::DropExactDuplicates);
        assert_eq!(deduped.len(), 75_000);
        assert_eq!(deduped.rows()[..50_000], prior.rows()[..]);
        assert_eq!(deduped.rows()[50_000..], fresh.rows()[25_000..]);

        let mut changed = fresh.into_rows();
        changed.iter_mut().for_each(|r| r.value += 0.5);
        let latest = merge(prior.clone(), Table::new(changed), DuplicatePolicy::LatestPerTimestamp);
        assert_eq!(latest.len(), 75_000);
        assert_eq!(latest.rows()[0], prior.rows()[0]);
        assert_eq!(latest.rows()[25_000].timestamp, prior.rows()[25_000].timestamp);
        assert_eq!(latest.rows()[25_000].value, prior.rows()[25_000].value + 0.5);
    }

    #[test]
    fn test_persist_replaces_existing_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path(), DuplicatePolicy::default(), Helsinki);
        let old = table(&hourly_points(0, 1_000));
        let new = table(&[point("2024-06-01T00:00:00Z", 12.0)]);

        cache.persist("brine_out_temp", &old).unwrap();
        cache.persist("brine_out_temp", &new).unwrap();

        let entries: Vec<String> = fs::read_dir(tempdir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["brine_out_temp.json".to_string()]);
        assert_eq!(cache.load("brine_out_temp").unwrap().unwrap(), new);
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path().join("cache"), DuplicatePolicy::default(), Helsinki);
        let original = table(&[
            point("2024-03-31T00:30:00Z", -0.1),
            point("2024-03-31T01:30:00Z", 0.30000000000000004),
            point("2024-07-01T12:00:00Z", 23.7),
        ]);

        cache.persist("outdoor_temp", &original).unwrap();
        let loaded = cache.load("outdoor_temp").unwrap().unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.rows()[0].timestamp.to_rfc3339(), "2024-03-31T02:30:00+02:00");
        assert_eq!(loaded.rows()[1].timestamp.to_rfc3339(), "2024-03-31T04:30:00+03:00");
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path(), DuplicatePolicy::default(), Helsinki);
        assert!(cache.load("brine_in_temp").unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path(), DuplicatePolicy::default(), Helsinki);
        fs::write(cache.path_for("hot_water_top"), b"[{\"timestamp\": ").unwrap();
        assert!(matches!(cache.load("hot_water_top"), Err(UplinkError::Parse(_))));
    }

    #[test]
    fn test_get_cached_or_fetch_is_idempotent_with_drop_exact() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path(), DuplicatePolicy::DropExactDuplicates, Helsinki);
        let points = vec![point("2024-01-01T00:00:00Z", 1.0), point("2024-01-02T00:00:00Z", 2.0)];

        let first = cache.get_cached_or_fetch("outdoor_temp", || Ok(points.clone())).unwrap();
        let second = cache.get_cached_or_fetch("outdoor_temp", || Ok(points.clone())).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second, first);
        assert_eq!(cache.load("outdoor_temp").unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_get_cached_or_fetch_accumulates_new_rows() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path(), DuplicatePolicy::KeepAll, Helsinki);

        cache
            .get_cached_or_fetch("supply-line-temp", || Ok(vec![point("2024-01-01T00:00:00Z", 30.0)]))
            .unwrap();
        let combined = cache
            .get_cached_or_fetch("supply-line-temp", || Ok(vec![point("2024-01-01T00:00:00Z", 30.0)]))
            .unwrap();

        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn test_failed_fetch_leaves_cache_untouched() {
        let tempdir = tempfile::tempdir().unwrap();
        let cache = SeriesCache::new(tempdir.path(), DuplicatePolicy::default(), Helsinki);
        cache.persist("return-line-temp", &table(&[point("2024-01-01T00:00:00Z", 25.0)])).unwrap();

        let res = cache.get_cached_or_fetch("return-line-temp", || {
            Err(UplinkError::Transport("connection refused".into()))
        });

        assert!(matches!(res, Err(UplinkError::Transport(_))));
        assert_eq!(cache.load("return-line-temp").unwrap().unwrap().len(), 1);
    }
}
