//! Map viewport framing.

use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};

/// Span shown around the origin when there is no destination.
pub const ORIGIN_DELTA_DEG: f64 = 0.05;
/// Margin factor applied to the origin-destination span.
pub const SPAN_MARGIN: f64 = 1.5;
/// Smallest span per axis when framing two points.
pub const MIN_DELTA_DEG: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// Frame the origin, or the origin and destination together.
pub fn compute_viewport(origin: GeoPoint, destination: Option<GeoPoint>) -> Viewport {
    let Some(destination) = destination else {
        return Viewport {
            center: origin,
            latitude_delta: ORIGIN_DELTA_DEG,
            longitude_delta: ORIGIN_DELTA_DEG,
        };
    };

    let min_lat = origin.latitude.min(destination.latitude);
    let max_lat = origin.latitude.max(destination.latitude);
    let min_lon = origin.longitude.min(destination.longitude);
    let max_lon = origin.longitude.max(destination.longitude);

    Viewport {
        center: GeoPoint::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0),
        latitude_delta: ((max_lat - min_lat) * SPAN_MARGIN).max(MIN_DELTA_DEG),
        longitude_delta: ((max_lon - min_lon) * SPAN_MARGIN).max(MIN_DELTA_DEG),
    }
}
