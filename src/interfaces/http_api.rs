use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::config::{Config, Credentials};
use crate::constants::{defaults, endpoints};
use crate::data_mgmt::{DeviceId, GroupId, Identifier, ParameterId, Point, Series, SeriesCache, Table};
use crate::error::{Result, UplinkError};

use super::session::{Session, AUTHORIZATION};

const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Entity {
    id: Identifier,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Category {
    parameter_name: String,
    parameter_id: ParameterId,
}

#[derive(Debug, Deserialize)]
struct CategoryListing {
    parameters: Vec<Category>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Exchange credentials for a bearer token and install it in the session's shared headers.
pub fn authenticate(session: &mut Session, credentials: &Credentials) -> Result<BearerToken> {
    let url = session.url(endpoints::OAUTH_TOKEN)?;
    let form = [
        ("grant_type", defaults::OAUTH_GRANT_TYPE),
        ("username", credentials.username()),
        ("password", credentials.password()),
        ("client_id", defaults::OAUTH_CLIENT_ID),
    ];
    let resp: TokenResponse = session
        .post_form(&url, &form)
        .map_err(|e| UplinkError::Auth(e.to_string()))?;

    session.set_header(AUTHORIZATION, format!("Bearer {}", resp.access_token));
    log::info!("Authenticated as {}", credentials.username());
    Ok(BearerToken(resp.access_token))
}

/// Take the first candidate, failing if the API returned none.
pub fn pick_first<T>(candidates: Vec<T>, what: &str) -> Result<T> {
    if candidates.len() > 1 {
        log::debug!("{} {}s returned; using the first", candidates.len(), what);
    }
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| UplinkError::EmptyResult(format!("no {what} returned by the API")))
}

/// Start and end of the points window, `days` before `now` up to `now`.
pub fn points_window(now: NaiveDateTime, days: u32) -> Result<(String, String)> {
    let start = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| UplinkError::Config(format!("window of {days} days is out of range")))?;
    Ok((
        start.format(WINDOW_FORMAT).to_string(),
        now.format(WINDOW_FORMAT).to_string(),
    ))
}

/// Authenticated client for the myUplink API.
///
/// Authentication happens once in [`UplinkClient::connect`]; the token stays in the
/// session headers for the lifetime of the client. When a [`SeriesCache`] is attached,
/// the named series fetches merge into the on-disk history.
pub struct UplinkClient {
    session: Session,
    timezone: Tz,
    cache: Option<SeriesCache>,
}

impl UplinkClient {
    pub fn connect(config: Config) -> Result<Self> {
        let mut session = Session::new(&config.api_base_url, config.request_timeout)?;
        authenticate(&mut session, &config.credentials)?;
        let cache = SeriesCache::new(config.cache_dir, config.duplicate_policy, config.timezone);

        Ok(UplinkClient {
            session,
            timezone: config.timezone,
            cache: Some(cache),
        })
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn get_current_group(&self) -> Result<GroupId> {
        let groups: Vec<Entity> = self.session.get_json(&self.session.url(endpoints::GROUPS_ME)?)?;
        pick_first(groups, "group").map(|g| g.id)
    }

    pub fn get_first_device(&self, group: &GroupId) -> Result<DeviceId> {
        let url = self.session.url(&endpoints::group_devices(group.as_str()))?;
        let devices: Vec<Entity> = self.session.get_json(&url)?;
        pick_first(devices, "device").map(|d| d.id)
    }

    pub fn get_categories(&self, group: &GroupId) -> Result<BTreeMap<String, ParameterId>> {
        let url = self.session.url(&endpoints::group_categories(group.as_str()))?;
        let listing: CategoryListing = self.session.get_json(&url)?;
        Ok(listing
            .parameters
            .into_iter()
            .map(|c| (c.parameter_name, c.parameter_id))
            .collect())
    }

    /// Raw averaged points for one parameter over the last `days` days.
    pub fn fetch_series(&self, device: &DeviceId, parameter: &str, days: u32) -> Result<Vec<Point>> {
        let (start, end) = points_window(Local::now().naive_local(), days)?;
        let url = self.session.url_from_segments(&endpoints::device_points(
            device.as_str(),
            parameter,
            &start,
            &end,
        ))?;
        let points: Vec<Point> = self.session.get_json(&url)?;
        log::debug!("Fetched {} points for parameter {} of device {}", points.len(), parameter, device);
        Ok(points)
    }

    /// Fetch a named series as a table, merged with its cached history when caching is on.
    pub fn fetch_table(&self, series: Series, device: &DeviceId, days: u32) -> Result<Table> {
        let parameter = series.parameter_id().to_string();
        let fetch = || self.fetch_series(device, &parameter, days);
        match &self.cache {
            Some(cache) => cache.get_cached_or_fetch(series.cache_key(), fetch),
            None => Table::from_points(&fetch()?, self.timezone),
        }
    }

    pub fn fetch_outdoor_temp(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::OutdoorTemp, device, days)
    }

    pub fn fetch_brine_in_temp(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::BrineInTemp, device, days)
    }

    pub fn fetch_brine_out_temp(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::BrineOutTemp, device, days)
    }

    pub fn fetch_hot_water_charging(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::HotWaterCharging, device, days)
    }

    pub fn fetch_hot_water_top(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::HotWaterTop, device, days)
    }

    pub fn fetch_return_line_temp(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::ReturnLineTemp, device, days)
    }

    pub fn fetch_supply_line_temp(&self, device: &DeviceId, days: u32) -> Result<Table> {
        self.fetch_table(Series::SupplyLineTemp, device, days)
    }
}
