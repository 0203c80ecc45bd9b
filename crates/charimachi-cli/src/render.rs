//! Plain-text rendering of the planner view.

use charimachi_core::{
    estimated_arrival, ComfortLevel, MarkerKind, ScoreField, SuggestionPanel, SummaryField,
    ViewState,
};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

/// Numbered list of selectable suggestions.
pub fn render_suggestions(view: &ViewState) -> String {
    match &view.suggestions {
        SuggestionPanel::Closed => String::new(),
        SuggestionPanel::Loading { .. } => "Searching...".to_string(),
        SuggestionPanel::NotFound => "No destinations found.".to_string(),
        SuggestionPanel::Results { items, .. } => {
            let mut out = String::new();
            for (index, item) in items.iter().enumerate() {
                let label = item.display_label().unwrap_or_default();
                let _ = writeln!(out, "[{}] {}", index, label);
            }
            out
        }
    }
}

/// Route summary panel, comfort badge and warnings.
pub fn render_summary<Tz>(view: &ViewState, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let Some(summary) = view.summary else {
        return out;
    };

    if let Some(destination) = view.destination.as_ref().and_then(|d| d.display_label()) {
        let _ = writeln!(out, "Destination:    {}", destination);
    }
    let _ = writeln!(out, "Distance:       {}", summary.distance);
    let _ = writeln!(out, "Duration:       {}", summary.duration);

    if let (SummaryField::Value(_), Some(arrival)) = (
        summary.duration,
        view.route_duration_seconds
            .and_then(|seconds| estimated_arrival(now, seconds)),
    ) {
        let _ = writeln!(out, "Arrival:        {}", arrival.format("%H:%M"));
    }

    if summary.score != ScoreField::Empty {
        let _ = writeln!(out, "Comfort:        {}", summary.score);
    }

    let modes: Vec<&str> = view.modes.enabled().map(|mode| mode.label()).collect();
    if !modes.is_empty() {
        let _ = writeln!(out, "Modes:          {}", modes.join(", "));
    }

    for marker in view
        .markers
        .iter()
        .filter(|marker| marker.kind == MarkerKind::Warning)
    {
        let _ = writeln!(
            out,
            "Warning:        {} - {}",
            marker.title,
            marker.description.as_deref().unwrap_or_default()
        );
    }
    let _ = writeln!(out, "Path points:    {}", view.route_path.len());
    out
}

/// Score legend for the comfort badge.
pub fn render_comfort_legend() -> String {
    ComfortLevel::ASCENDING
        .iter()
        .map(|level| {
            let bucket = level.bucket();
            format!(
                "{:>3} - {:>3}: {} ({})",
                bucket.min_inclusive,
                bucket.max_inclusive,
                level.as_str(),
                bucket.color_key
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use charimachi_core::{
        Effect, GeoPoint, Planner, PlannerEvent, RouteResponse, SearchResult, WarningPoint,
    };
    use chrono::Utc;

    fn routed_view() -> ViewState {
        let mut planner = Planner::default();
        planner.apply(PlannerEvent::LocationResolved(GeoPoint::new(35.68, 139.76)));
        let effects = planner.apply(PlannerEvent::DestinationSelected(SearchResult {
            place_id: "1".to_string(),
            display_name: Some("Ueno Park".to_string()),
            lat: "35.7148".to_string(),
            lon: "139.7734".to_string(),
            ..Default::default()
        }));
        let [Effect::FetchRoute { seq, .. }] = effects.as_slice() else {
            panic!("expected route fetch");
        };
        planner.apply(PlannerEvent::RouteCompleted {
            seq: *seq,
            outcome: Ok(RouteResponse {
                coordinates: vec![vec![Some(139.7734), Some(35.7148)]],
                distance_meters: Some(4380.0),
                duration_seconds: Some(1500.0),
                comfort_score: Some(45.0),
                warning_points: vec![WarningPoint {
                    name: "Steep slope".to_string(),
                    coordinate: vec![Some(139.77), Some(35.70)],
                    message: "Dismount recommended".to_string(),
                    ..Default::default()
                }],
            }),
        });
        planner.view()
    }

    #[test]
    fn summary_lists_metrics_arrival_and_warnings() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let text = render_summary(&routed_view(), now);

        assert!(text.contains("Destination:    Ueno Park"));
        assert!(text.contains("Distance:       4.4 km"));
        assert!(text.contains("Duration:       25 minutes"));
        assert!(text.contains("Arrival:        08:25"));
        assert!(text.contains("Comfort:        45 (uncomfortable, red)"));
        assert!(text.contains("Warning:        Steep slope - Dismount recommended"));
        assert!(text.contains("Path points:    2"));
    }

    #[test]
    fn failed_route_marks_every_field_failed() {
        let mut planner = Planner::default();
        planner.apply(PlannerEvent::LocationResolved(GeoPoint::new(35.68, 139.76)));
        let effects = planner.apply(PlannerEvent::DestinationSelected(SearchResult {
            place_id: "2".to_string(),
            display_name: Some("Tokyo Tower".to_string()),
            lat: "35.6586".to_string(),
            lon: "139.7454".to_string(),
            ..Default::default()
        }));
        let [Effect::FetchRoute { seq, .. }] = effects.as_slice() else {
            panic!("expected route fetch");
        };
        planner.apply(PlannerEvent::RouteCompleted {
            seq: *seq,
            outcome: Err("502 Bad Gateway".to_string()),
        });

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let text = render_summary(&planner.view(), now);
        assert!(text.contains("Distance:       retrieval failed"));
        assert!(text.contains("Duration:       retrieval failed"));
        assert!(text.contains("Comfort:        retrieval failed"));
        assert!(!text.contains("Arrival:"));
    }

    #[test]
    fn no_destination_renders_nothing() {
        let view = ViewState::default();
        assert!(render_summary(&view, Utc::now()).is_empty());
        assert!(render_suggestions(&view).is_empty());
    }

    #[test]
    fn legend_covers_all_levels() {
        let legend = render_comfort_legend();
        assert_eq!(legend.lines().count(), 4);
        assert!(legend.starts_with("  0 -  49: uncomfortable (red)"));
        assert!(legend.ends_with(" 90 - 100: comfortable (blue)"));
    }
}
