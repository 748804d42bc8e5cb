//! Best-effort client for the upstream content/ephemeris API.
//!
//! Every fetch degrades to [`Fetched::Absent`] on network failure, non-2xx
//! status, or a body that fails to decode. A reading is optional and an
//! ephemeris with no positions is acceptable, so absence is propagated as a
//! default downstream, never as an error. No retries: one failed attempt is
//! permanent for the request.

use serde::de::DeserializeOwned;

use crate::ephemeris::{ArchiveEntry, EphemerisSnapshot, ReadingSummary};
use crate::foundation::error::{VoidwireError, VoidwireResult};

/// Outcome of one upstream call: data present, or recoverably absent.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<T> {
    Present(T),
    Absent,
}

impl<T> Fetched<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Present(v) => Some(v),
            Fetched::Absent => None,
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Fetched::Present(v) => v,
            Fetched::Absent => T::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> VoidwireResult<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(VoidwireError::validation("upstream base URL is empty"));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("voidwire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VoidwireError::validation(format!("build http client: {e}")))?;
        Ok(Self {
            base_url: trimmed,
            http,
        })
    }

    /// `GET /v1/reading/:date`
    pub async fn fetch_reading(&self, date: &str) -> Fetched<ReadingSummary> {
        self.fetch_json(&format!("/v1/reading/{date}")).await
    }

    /// `GET /v1/ephemeris/:date`
    pub async fn fetch_ephemeris(&self, date: &str) -> Fetched<EphemerisSnapshot> {
        self.fetch_json(&format!("/v1/ephemeris/{date}")).await
    }

    /// `GET /v1/archive?per_page=N`
    pub async fn fetch_archive(&self, per_page: usize) -> Fetched<Vec<ArchiveEntry>> {
        self.fetch_json(&format!("/v1/archive?per_page={per_page}"))
            .await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Fetched<T> {
        let url = format!("{}{path}", self.base_url);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%url, error = %e, "upstream request failed");
                return Fetched::Absent;
            }
        };
        let response = match response.error_for_status() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(%url, error = %e, "upstream returned non-success status");
                return Fetched::Absent;
            }
        };
        match response.json::<T>().await {
            Ok(v) => Fetched::Present(v),
            Err(e) => {
                tracing::warn!(%url, error = %e, "upstream body failed to decode");
                Fetched::Absent
            }
        }
    }
}
