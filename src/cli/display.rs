//! Terminal rendering of session state and route sets

use std::fmt::Write;

use route_picker::{draw_plan, MapView, Phase, RouteStyle, Session, StrokeLayer};

/// Summary of endpoints, pending click and loading state
pub fn format_status(session: &Session) -> String {
    let show = |p: Option<route_picker::Point>| p.map_or_else(|| "-".to_string(), |p| p.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "phase:   {}", phase_label(session.phase()));
    let _ = writeln!(out, "start:   {}", show(session.start()));
    let _ = writeln!(out, "end:     {}", show(session.end()));
    let _ = write!(out, "pending: {}", show(session.pending()));
    if let Some(offer) = session.offered() {
        let _ = write!(out, " (confirm as {offer})");
    }
    let _ = writeln!(out);
    let _ = write!(out, "routes:  {}", session.routes().len());
    if session.is_loading() {
        let _ = write!(out, " (loading, {} in flight)", session.in_flight());
    }
    out
}

/// Routes in received order followed by the draw plan
pub fn format_routes(session: &Session, style: &RouteStyle) -> String {
    let routes = session.routes();
    if routes.is_empty() {
        return "No routes loaded".to_string();
    }

    let mut out = String::new();
    for (index, route) in routes.iter().enumerate() {
        let _ = writeln!(
            out,
            "Route {}: {}, {} ({} segments)",
            index + 1,
            route.duration,
            route.distance,
            route.segments.len()
        );
    }

    let _ = writeln!(out, "Draw order:");
    for stroke in draw_plan(routes, style)
        .iter()
        .filter(|s| s.layer == StrokeLayer::Path)
    {
        let _ = writeln!(
            out,
            "  route {} segment {}: {} ({} points)",
            stroke.route_index + 1,
            stroke.segment_index + 1,
            stroke.color,
            stroke.points.len()
        );
    }
    out.trim_end().to_string()
}

pub fn format_map_view(view: &MapView, api_url: &str) -> String {
    format!(
        "Map centered at {:.4}, {:.4} (zoom {}), tiles {} {}\nBackend: {api_url}",
        view.center.0, view.center.1, view.zoom, view.tile_url, view.attribution
    )
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::StartPending => "start pending",
        Phase::StartSet => "start set",
        Phase::EndPending => "end pending",
        Phase::EndSet => "end set",
        Phase::BothSet => "both set",
    }
}
