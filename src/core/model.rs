//! Route data model and backend wire bodies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;

/// A geographic coordinate, serialized as `[lat, lng]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Construct a point, rejecting values outside WGS84 bounds
    pub fn checked(lat: f64, lng: f64) -> Result<Self, Error> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidInput(format!("latitude out of range: {lat}")));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::InvalidInput(format!("longitude out of range: {lng}")));
        }
        Ok(Self { lat, lng })
    }
}

impl From<[f64; 2]> for Point {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.lat, point.lng]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"` (whitespace around either number is allowed)
impl FromStr for Point {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| Error::InvalidInput(format!("expected 'lat,lng', got '{s}'")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("invalid latitude '{}'", lat.trim())))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidInput(format!("invalid longitude '{}'", lng.trim())))?;
        Point::checked(lat, lng)
    }
}

/// Traffic classification attached to a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrafficLevel {
    Congested,
    Slow,
    Normal,
}

impl From<String> for TrafficLevel {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "congested" => TrafficLevel::Congested,
            "slow" => TrafficLevel::Slow,
            _ => TrafficLevel::Normal,
        }
    }
}

impl From<TrafficLevel> for String {
    fn from(level: TrafficLevel) -> Self {
        match level {
            TrafficLevel::Congested => "congested",
            TrafficLevel::Slow => "slow",
            TrafficLevel::Normal => "normal",
        }
        .to_string()
    }
}

/// A drawable sub-path of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub polyline: Vec<Point>,

    #[serde(rename = "color", default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<TrafficLevel>,
}

/// One alternative route between the current endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub duration: String,
    pub distance: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Body of `POST /coordinates`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateReport {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Point> for CoordinateReport {
    fn from(point: Point) -> Self {
        Self {
            latitude: point.lat,
            longitude: point.lng,
        }
    }
}

/// Body of `POST /routes`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteQuery {
    pub origin: Point,
    pub destination: Point,
}

/// Response of `POST /routes`
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Option<Vec<Route>>,
}

impl RouteResponse {
    pub const SUCCESS: &'static str = "success";

    /// Routes of a successful response, empty when none were provided
    pub fn into_routes(self) -> Result<Vec<Route>, Error> {
        if self.status == Self::SUCCESS {
            Ok(self.routes.unwrap_or_default())
        } else {
            Err(Error::Unsuccessful {
                status: self.status,
            })
        }
    }
}
