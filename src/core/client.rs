//! HTTP client for the routing backend
//!
//! Two calls: a fire-and-forget coordinate report and the route query.
//! Neither retries; callers decide what a failure means.

use std::time::Duration;

use log::debug;
use reqwest::{Client, ClientBuilder};

use crate::core::config::ClientConfig;
use crate::core::error::{Error, Result};
use crate::core::model::{CoordinateReport, Point, Route, RouteQuery, RouteResponse};

/// Backend client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("route-picker/{}", env!("ROUTE_PICKER_VERSION")))
            .build()
            .map_err(|e| Error::InvalidInput(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one clicked coordinate to `/coordinates`.
    ///
    /// The response body is read but not interpreted.
    pub async fn report_coordinates(&self, point: Point) -> Result<()> {
        let url = self.config.endpoint("coordinates");
        let response = self
            .http
            .post(&url)
            .json(&CoordinateReport::from(point))
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        debug!("Coordinate report {point} acknowledged ({} bytes)", body.len());
        Ok(())
    }

    /// Query `/routes` for alternatives between two points.
    ///
    /// `Ok` only for a decodable body whose status is `"success"`; a missing
    /// route list decodes as empty.
    pub async fn fetch_routes(&self, query: RouteQuery) -> Result<Vec<Route>> {
        let url = self.config.endpoint("routes");
        let response = self
            .http
            .post(&url)
            .json(&query)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let decoded: RouteResponse = serde_json::from_slice(&body)?;
        decoded.into_routes()
    }
}
