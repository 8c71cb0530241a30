//! Fetch Gateway – the only code that talks to the backend for live state.
//!
//! [`Backend`] is the seam the service is generic over; [`HttpGateway`] is
//! the reqwest implementation used in production.

use crate::error::{DashboardError, Result};
use crate::protocol::{decode_room_states, routes, HazardSnapshot, OverrideRequest, RoomStateMap};
use crate::types::DashboardConfig;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Source of hazard/plan snapshots and room states.
pub trait Backend: Send + Sync + 'static {
    /// Read the current snapshot, or – when `override_hazards` is given –
    /// submit it as the authoritative hazard list and return the snapshot
    /// the backend computed from it.
    fn fetch_plan(
        &self,
        override_hazards: Option<&[String]>,
    ) -> impl Future<Output = Result<HazardSnapshot>> + Send;

    /// Current room states, or `None` on any failure.
    fn fetch_room_states(&self) -> impl Future<Output = Option<RoomStateMap>> + Send;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Check the status, then decode the body as `T`.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    route: &str,
    response: reqwest::Response,
) -> Result<T> {
    decode_response_with(route, response, |body| serde_json::from_slice(body)).await
}

/// Check the status, then decode the body with `decode`.
pub(crate) async fn decode_response_with<T>(
    route: &str,
    response: reqwest::Response,
    decode: impl FnOnce(&[u8]) -> serde_json::Result<T>,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(DashboardError::Status {
            route: route.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await?;
    Ok(decode(&body)?)
}

impl Backend for HttpGateway {
    async fn fetch_plan(&self, override_hazards: Option<&[String]>) -> Result<HazardSnapshot> {
        let url = self.url(routes::HAZARDS);
        let request = match override_hazards {
            Some(hazards) => {
                debug!("POST {} hazards={:?}", routes::HAZARDS, hazards);
                self.http.post(&url).json(&OverrideRequest {
                    hazards: hazards.to_vec(),
                })
            }
            None => self.http.get(&url),
        };
        let response = request.send().await?;
        decode_response(routes::HAZARDS, response).await
    }

    async fn fetch_room_states(&self) -> Option<RoomStateMap> {
        let result: Result<RoomStateMap> = async {
            let response = self.http.get(self.url(routes::ROOM_STATES)).send().await?;
            decode_response_with(routes::ROOM_STATES, response, decode_room_states).await
        }
        .await;

        match result {
            Ok(states) => Some(states),
            Err(e) => {
                warn!("Room state fetch failed: {}", e);
                None
            }
        }
    }
}
