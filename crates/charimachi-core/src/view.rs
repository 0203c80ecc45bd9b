//! View state consumed by the map and summary panel.

use crate::comfort::{classify, ComfortBucket, ComfortLevel};
use crate::geometry::{build_route_geometry, warning_locations};
use crate::metrics::{format_distance, format_duration, DisplayMetric};
use crate::models::{GeoPoint, ModeFlags, RouteResponse, SearchResult};
use crate::planner::{Fetch, LocationState, Planner};
use crate::viewport::{compute_viewport, Viewport};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Placeholder rows shown while a search is in flight.
pub const SUGGESTION_PLACEHOLDERS: usize = 3;

/// Text shown in place of a metric whose request failed.
pub const RETRIEVAL_FAILED: &str = "retrieval failed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SuggestionPanel {
    Closed,
    Loading { placeholders: usize },
    NotFound,
    /// Results that have a display name, plus how many the service returned.
    Results {
        items: Vec<SearchResult>,
        raw_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SummaryField {
    Loading,
    Value(DisplayMetric),
    Failed,
    Empty,
}

impl fmt::Display for SummaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryField::Loading => f.write_str("loading"),
            SummaryField::Value(metric) => write!(f, "{metric}"),
            SummaryField::Failed => f.write_str(RETRIEVAL_FAILED),
            SummaryField::Empty => Ok(()),
        }
    }
}

/// Comfort score slot of the summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ScoreField {
    Loading,
    Badge(ComfortBadge),
    Failed,
    /// No route yet, or the service sent no usable score.
    Empty,
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreField::Loading => f.write_str("loading"),
            ScoreField::Badge(badge) => write!(
                f,
                "{} ({}, {})",
                badge.score,
                badge.level.as_str(),
                badge.bucket.color_key
            ),
            ScoreField::Failed => f.write_str(RETRIEVAL_FAILED),
            ScoreField::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryPanel {
    pub distance: SummaryField,
    pub duration: SummaryField,
    pub score: ScoreField,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComfortBadge {
    pub score: f64,
    pub level: ComfortLevel,
    pub bucket: ComfortBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Start,
    Goal,
    Warning,
}

impl MarkerKind {
    pub fn color(&self) -> &'static str {
        match self {
            MarkerKind::Start => "green",
            MarkerKind::Goal => "blue",
            MarkerKind::Warning => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub point: GeoPoint,
    pub title: String,
    pub description: Option<String>,
}

/// Everything the rendering surface needs, derived from planner state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub origin: Option<GeoPoint>,
    /// True until the location provider yields a point.
    pub locating: bool,
    pub keyword: String,
    pub suggestions: SuggestionPanel,
    pub search_loading: bool,
    pub destination: Option<SearchResult>,
    pub modes: ModeFlags,
    /// Mode toggles are disabled while the origin or a route is loading.
    pub modes_locked: bool,
    /// Hidden until a destination is chosen.
    pub summary: Option<SummaryPanel>,
    pub comfort: Option<ComfortBadge>,
    pub route_path: Vec<GeoPoint>,
    /// Raw travel time of the current route, for arrival estimates.
    pub route_duration_seconds: Option<f64>,
    pub route_loading: bool,
    pub route_error: bool,
    pub markers: Vec<Marker>,
    pub viewport: Option<Viewport>,
}

impl Default for ViewState {
    fn default() -> Self {
        Planner::default().view()
    }
}

/// Derive the view state from the planner.
pub fn aggregate(planner: &Planner) -> ViewState {
    let origin = planner.origin();
    let locating = !matches!(planner.location(), LocationState::Located(_));
    let route = planner.route();
    let response = route.ready();
    let destination = planner.destination().cloned();
    let destination_point = planner.destination_point();
    let comfort = response.and_then(comfort_badge);

    ViewState {
        origin,
        locating,
        keyword: planner.keyword().to_string(),
        suggestions: suggestion_panel(planner),
        search_loading: planner.search().is_loading(),
        summary: destination
            .as_ref()
            .map(|_| summary_panel(route, comfort, locating)),
        destination,
        modes: planner.modes(),
        modes_locked: locating || route.is_loading(),
        comfort,
        route_path: origin
            .map(|origin| build_route_geometry(origin, response))
            .unwrap_or_default(),
        route_duration_seconds: response
            .and_then(|response| response.duration_seconds)
            .filter(|seconds| seconds.is_finite() && *seconds > 0.0),
        route_loading: route.is_loading(),
        route_error: planner.destination().is_some() && route.is_failed(),
        markers: markers(origin, planner.destination(), destination_point, response),
        viewport: origin.map(|origin| compute_viewport(origin, destination_point)),
    }
}

fn suggestion_panel(planner: &Planner) -> SuggestionPanel {
    if !planner.suggestions_open() {
        return SuggestionPanel::Closed;
    }
    match planner.search() {
        Fetch::Loading => SuggestionPanel::Loading {
            placeholders: SUGGESTION_PLACEHOLDERS,
        },
        Fetch::Ready(results) if !results.is_empty() => SuggestionPanel::Results {
            items: results
                .iter()
                .filter(|result| result.display_label().is_some())
                .cloned()
                .collect(),
            raw_count: results.len(),
        },
        _ => SuggestionPanel::NotFound,
    }
}

fn summary_panel(
    route: &Fetch<RouteResponse>,
    comfort: Option<ComfortBadge>,
    locating: bool,
) -> SummaryPanel {
    if locating || route.is_loading() {
        return SummaryPanel {
            distance: SummaryField::Loading,
            duration: SummaryField::Loading,
            score: ScoreField::Loading,
        };
    }
    match route {
        Fetch::Ready(response) => SummaryPanel {
            distance: metric_field(response.distance_meters, format_distance),
            duration: metric_field(response.duration_seconds, format_duration),
            score: comfort.map_or(ScoreField::Empty, ScoreField::Badge),
        },
        Fetch::Failed(_) => SummaryPanel {
            distance: SummaryField::Failed,
            duration: SummaryField::Failed,
            score: ScoreField::Failed,
        },
        _ => SummaryPanel {
            distance: SummaryField::Empty,
            duration: SummaryField::Value(DisplayMetric::DURATION_FALLBACK),
            score: ScoreField::Empty,
        },
    }
}

fn metric_field(raw: Option<f64>, format: fn(f64) -> DisplayMetric) -> SummaryField {
    match raw {
        Some(value) if value.is_finite() && value > 0.0 => SummaryField::Value(format(value)),
        _ => SummaryField::Failed,
    }
}

fn comfort_badge(response: &RouteResponse) -> Option<ComfortBadge> {
    let score = response.comfort_score?;
    match classify(score) {
        Ok(level) => Some(ComfortBadge {
            score,
            level,
            bucket: level.bucket(),
        }),
        Err(err) => {
            warn!(error = %err, "ignoring comfort score");
            None
        }
    }
}

fn markers(
    origin: Option<GeoPoint>,
    destination: Option<&SearchResult>,
    destination_point: Option<GeoPoint>,
    response: Option<&RouteResponse>,
) -> Vec<Marker> {
    let mut markers = Vec::new();

    if let Some(origin) = origin {
        markers.push(Marker {
            kind: MarkerKind::Start,
            point: origin,
            title: "Current location".to_string(),
            description: None,
        });
    }

    if let (Some(label), Some(point)) = (
        destination.and_then(SearchResult::display_label),
        destination_point,
    ) {
        markers.push(Marker {
            kind: MarkerKind::Goal,
            point,
            title: label.to_string(),
            description: Some("Destination".to_string()),
        });
    }

    if let Some(response) = response {
        markers.extend(
            warning_locations(&response.warning_points)
                .into_iter()
                .map(|(point, warning)| Marker {
                    kind: MarkerKind::Warning,
                    point,
                    title: warning.name.clone(),
                    description: Some(warning.message.clone()).filter(|m| !m.is_empty()),
                }),
        );
    }

    markers
}
