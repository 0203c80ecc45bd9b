//! Route polyline construction.

use crate::models::{GeoPoint, RawPosition, RouteResponse, WarningPoint};

/// Build the displayable route path.
///
/// Positions arrive as `[lon, lat]`; pairs with a missing or non-finite
/// component are dropped. The origin is always the first point once a
/// response exists. Without a response the path is empty.
pub fn build_route_geometry(origin: GeoPoint, response: Option<&RouteResponse>) -> Vec<GeoPoint> {
    let Some(response) = response else {
        return Vec::new();
    };

    std::iter::once(origin)
        .chain(valid_points(&response.coordinates))
        .collect()
}

/// Convert raw positions, silently skipping malformed ones.
pub fn valid_points(positions: &[RawPosition]) -> impl Iterator<Item = GeoPoint> + '_ {
    positions
        .iter()
        .filter_map(|position| GeoPoint::from_position(position))
}

/// Warning points that carry a usable coordinate.
pub fn warning_locations(warnings: &[WarningPoint]) -> Vec<(GeoPoint, &WarningPoint)> {
    warnings
        .iter()
        .filter_map(|warning| {
            GeoPoint::from_position(&warning.coordinate).map(|point| (point, warning))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(coordinates: Vec<RawPosition>) -> RouteResponse {
        RouteResponse {
            coordinates,
            ..Default::default()
        }
    }

    #[test]
    fn drops_non_finite_pairs_and_swaps_axis_order() {
        let response = response_with(vec![
            vec![Some(1.0), Some(2.0)],
            vec![Some(f64::NAN), Some(3.0)],
            vec![Some(4.0), Some(5.0)],
        ]);
        let path = build_route_geometry(GeoPoint::new(0.0, 0.0), Some(&response));
        assert_eq!(
            path,
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(2.0, 1.0),
                GeoPoint::new(5.0, 4.0),
            ]
        );
    }

    #[test]
    fn drops_missing_and_short_positions() {
        let response = response_with(vec![
            vec![None, Some(3.0)],
            vec![Some(1.0)],
            vec![],
            vec![Some(f64::INFINITY), Some(1.0)],
        ]);
        let origin = GeoPoint::new(35.0, 139.0);
        assert_eq!(build_route_geometry(origin, Some(&response)), vec![origin]);
    }

    #[test]
    fn no_response_means_no_path() {
        assert!(build_route_geometry(GeoPoint::new(1.0, 1.0), None).is_empty());
    }

    #[test]
    fn warnings_without_coordinates_are_skipped() {
        let warnings = vec![
            WarningPoint {
                name: "ok".to_string(),
                coordinate: vec![Some(139.5), Some(35.5)],
                ..Default::default()
            },
            WarningPoint {
                name: "broken".to_string(),
                coordinate: vec![None, Some(35.5)],
                ..Default::default()
            },
        ];
        let located = warning_locations(&warnings);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].0, GeoPoint::new(35.5, 139.5));
        assert_eq!(located[0].1.name, "ok");
    }
}
