//! Draw-plan derivation for route sets
//!
//! Turns a route set into the ordered list of polylines a map surface should
//! draw. Nothing here touches a map; hosts replay the strokes in order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::model::{Point, Route, TrafficLevel};

/// Colors, widths and opacities used for route strokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    /// Per-route colors, indexed by received order
    pub palette: Vec<String>,
    /// Used when a route index runs past the palette
    pub default_color: String,
    pub congested_color: String,
    pub slow_color: String,
    pub path_weight: f32,
    pub path_opacity: f32,
    pub halo_weight: f32,
    pub halo_opacity: f32,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            palette: vec![
                "#1a73e8".to_string(),
                "#34a853".to_string(),
                "#9c27b0".to_string(),
            ],
            default_color: "#757575".to_string(),
            congested_color: "#d93025".to_string(),
            slow_color: "#f9ab00".to_string(),
            path_weight: 4.0,
            path_opacity: 0.9,
            halo_weight: 12.0,
            halo_opacity: 0.25,
        }
    }
}

impl RouteStyle {
    /// Load a style from a JSON file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Color of one segment of the route at `route_index`
    pub fn segment_color(&self, route_index: usize, traffic: Option<TrafficLevel>) -> &str {
        match traffic {
            Some(TrafficLevel::Congested) => &self.congested_color,
            Some(TrafficLevel::Slow) => &self.slow_color,
            _ => self
                .palette
                .get(route_index)
                .unwrap_or(&self.default_color),
        }
    }
}

/// Which of the two strokes drawn per segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLayer {
    /// Wide, faint line under the path; widens the hit target
    Halo,
    /// Slim, opaque line showing the route
    Path,
}

/// One polyline draw instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke<'a> {
    /// Index of the route in received order
    pub route_index: usize,
    pub segment_index: usize,
    pub layer: StrokeLayer,
    pub color: &'a str,
    pub weight: f32,
    pub opacity: f32,
    pub points: &'a [Point],
}

/// Derive the ordered draw plan for a route set.
///
/// Routes are emitted last-to-first so the primary route ends up on top.
/// Each segment produces its halo followed by its path.
pub fn draw_plan<'a>(routes: &'a [Route], style: &'a RouteStyle) -> Vec<Stroke<'a>> {
    let mut strokes = Vec::new();

    for (route_index, route) in routes.iter().enumerate().rev() {
        for (segment_index, segment) in route.segments.iter().enumerate() {
            let color = style.segment_color(route_index, segment.traffic);

            strokes.push(Stroke {
                route_index,
                segment_index,
                layer: StrokeLayer::Halo,
                color,
                weight: style.halo_weight,
                opacity: style.halo_opacity,
                points: &segment.polyline,
            });
            strokes.push(Stroke {
                route_index,
                segment_index,
                layer: StrokeLayer::Path,
                color,
                weight: style.path_weight,
                opacity: style.path_opacity,
                points: &segment.polyline,
            });
        }
    }

    strokes
}
