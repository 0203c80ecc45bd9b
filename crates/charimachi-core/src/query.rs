//! Routing request assembly and request sequencing.

use crate::models::{GeoPoint, Mode, ModeFlags, RouteQuery};
use serde::{Deserialize, Serialize};

/// Build a query when both endpoints are known and finite.
pub fn build_route_query(
    origin: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    modes: ModeFlags,
) -> Option<RouteQuery> {
    let origin = origin.filter(GeoPoint::is_finite)?;
    let destination = destination.filter(GeoPoint::is_finite)?;
    Some(RouteQuery {
        origin,
        destination,
        modes,
    })
}

impl RouteQuery {
    /// Query-string parameters for `/directions/bicycle`. Points are encoded
    /// as `lon,lat`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start", lon_lat(&self.origin)),
            ("end", lon_lat(&self.destination)),
        ];
        pairs.extend(
            Mode::ALL
                .iter()
                .map(|mode| (mode.as_str(), self.modes.contains(*mode).to_string())),
        );
        pairs
    }
}

fn lon_lat(point: &GeoPoint) -> String {
    format!("{},{}", point.longitude, point.latitude)
}

/// Tag attached to an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestSeq(pub u64);

/// Issues monotonically increasing request tags and remembers the latest.
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    latest: u64,
}

impl SequenceCounter {
    pub fn issue(&mut self) -> RequestSeq {
        self.latest += 1;
        RequestSeq(self.latest)
    }

    /// Make every issued tag stale without issuing a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, seq: RequestSeq) -> bool {
        seq.0 == self.latest
    }
}
