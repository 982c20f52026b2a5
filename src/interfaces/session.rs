use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::tls::{TlsConfig, TlsProvider};
use url::Url;

use crate::error::{Result, UplinkError};

pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";

/// Blocking HTTP session against the API root, carrying a header set shared by every request.
pub struct Session {
    agent: ureq::Agent,
    base_url: Url,
    headers: BTreeMap<String, String>,
}

impl Session {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = BTreeMap::new();
        headers.insert(ACCEPT.to_string(), "application/json".to_string());

        Ok(Session {
            agent: get_ureq_agent(timeout),
            base_url: parse_base_url(base_url)?,
            headers,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_string(), value.into());
    }

    /// Resolve a path (optionally with a query) relative to the API root.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| UplinkError::Config(format!("invalid request path '{path}': {e}")))
    }

    /// Build a URL from raw path segments, percent-encoding each one.
    pub fn url_from_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UplinkError::Config(format!("cannot-be-a-base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        log::debug!("GET {}", url);
        let mut request = self.agent.get(url.as_str());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let mut response = request.call()?;
        Ok(response.body_mut().read_json::<T>()?)
    }

    pub fn post_form<T: DeserializeOwned>(&self, url: &Url, fields: &[(&str, &str)]) -> Result<T> {
        log::debug!("POST {}", url);
        let mut request = self.agent.post(url.as_str());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let mut response = request.send_form(fields.iter().copied())?;
        Ok(response.body_mut().read_json::<T>()?)
    }
}

fn get_ureq_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .tls_config(TlsConfig::builder().provider(TlsProvider::NativeTls).build())
        .build();
    ureq::Agent::new_with_config(config)
}

// Url::join drops the last path segment unless the base ends in a slash
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| UplinkError::Config(format!("invalid API base URL '{base_url}': {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
