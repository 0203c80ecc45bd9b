//! Core data models for the route planner.

use crate::error::CoreError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point from a `[lon, lat]` position, rejecting missing or
    /// non-finite components.
    pub fn from_position(position: &[Option<f64>]) -> Option<Self> {
        match position {
            [Some(lon), Some(lat), ..] if lon.is_finite() && lat.is_finite() => {
                Some(Self::new(*lat, *lon))
            }
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A routing preference sent to the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    ViaBikeParking,
    AvoidBusStops,
    AvoidTrafficLights,
}

impl Mode {
    pub const ALL: [Mode; 3] = [
        Mode::ViaBikeParking,
        Mode::AvoidBusStops,
        Mode::AvoidTrafficLights,
    ];

    /// Query parameter name used by the directions endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ViaBikeParking => "via_bike_parking",
            Mode::AvoidBusStops => "avoid_bus_stops",
            Mode::AvoidTrafficLights => "avoid_traffic_lights",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::ViaBikeParking => "Via bike parking",
            Mode::AvoidBusStops => "Avoid bus stops",
            Mode::AvoidTrafficLights => "Avoid traffic lights",
        }
    }
}

/// The set of routing preferences the user has switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    pub via_bike_parking: bool,
    pub avoid_bus_stops: bool,
    pub avoid_traffic_lights: bool,
}

impl ModeFlags {
    pub fn contains(&self, mode: Mode) -> bool {
        match mode {
            Mode::ViaBikeParking => self.via_bike_parking,
            Mode::AvoidBusStops => self.avoid_bus_stops,
            Mode::AvoidTrafficLights => self.avoid_traffic_lights,
        }
    }

    /// Set a single flag. Returns true if the value changed.
    pub fn set(&mut self, mode: Mode, enabled: bool) -> bool {
        let slot = match mode {
            Mode::ViaBikeParking => &mut self.via_bike_parking,
            Mode::AvoidBusStops => &mut self.avoid_bus_stops,
            Mode::AvoidTrafficLights => &mut self.avoid_traffic_lights,
        };
        let changed = *slot != enabled;
        *slot = enabled;
        changed
    }

    pub fn toggle(&mut self, mode: Mode) {
        let enabled = !self.contains(mode);
        self.set(mode, enabled);
    }

    /// Enabled modes in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL.into_iter().filter(|mode| self.contains(*mode))
    }
}

impl FromIterator<Mode> for ModeFlags {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        let mut flags = ModeFlags::default();
        for mode in iter {
            flags.set(mode, true);
        }
        flags
    }
}

/// A destination candidate returned by `/search` (Nominatim passthrough).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "string_or_number")]
    pub place_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lat: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub boundingbox: Option<Vec<String>>,
}

impl SearchResult {
    /// The label shown in the suggestion list, if the result has one.
    pub fn display_label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Parse the result's coordinates into a point.
    pub fn point(&self) -> Result<GeoPoint, CoreError> {
        let latitude = self.parse_axis("lat", &self.lat)?;
        let longitude = self.parse_axis("lon", &self.lon)?;
        Ok(GeoPoint::new(latitude, longitude))
    }

    fn parse_axis(&self, axis: &'static str, raw: &str) -> Result<f64, CoreError> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| CoreError::InvalidCoordinate {
                place_id: self.place_id.clone(),
                axis,
                value: raw.to_string(),
            })
    }
}

/// A fully-resolved routing request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub modes: ModeFlags,
}

/// A `[lon, lat]` position as sent by the routing service. Components that
/// are missing or not numbers decode to `None`.
pub type RawPosition = Vec<Option<f64>>;

/// Raw `/directions/bicycle` payload (GeoJSON plus extensions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub features: Vec<RouteFeature>,
    #[serde(default)]
    pub warning_points: Option<Vec<WarningPoint>>,
    #[serde(default)]
    pub comfort_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteFeature {
    #[serde(default)]
    pub geometry: FeatureGeometry,
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureGeometry {
    #[serde(default, deserialize_with = "lenient_positions")]
    pub coordinates: Vec<RawPosition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub summary: Option<RouteSummary>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RouteSummary {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// A hazard along the route flagged by the routing service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningPoint {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_position")]
    pub coordinate: RawPosition,
    #[serde(default)]
    pub message: String,
}

/// The part of a directions payload the planner consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub coordinates: Vec<RawPosition>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub comfort_score: Option<f64>,
    pub warning_points: Vec<WarningPoint>,
}

impl From<DirectionsResponse> for RouteResponse {
    fn from(response: DirectionsResponse) -> Self {
        let feature = response.features.into_iter().next();
        let summary = feature
            .as_ref()
            .and_then(|feature| feature.properties.summary)
            .unwrap_or_default();

        Self {
            coordinates: feature
                .map(|feature| feature.geometry.coordinates)
                .unwrap_or_default(),
            distance_meters: summary.distance,
            duration_seconds: summary.duration,
            comfort_score: response.comfort_score,
            warning_points: response.warning_points.unwrap_or_default(),
        }
    }
}

/// `/health` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn lenient_position<'de, D>(deserializer: D) -> Result<RawPosition, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_position(Value::deserialize(deserializer)?))
}

fn lenient_positions<'de, D>(deserializer: D) -> Result<Vec<RawPosition>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().map(to_position).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(D::Error::custom(format!(
            "expected coordinate array, got {other}"
        ))),
    }
}

fn to_position(value: Value) -> RawPosition {
    match value {
        Value::Array(components) => components.iter().map(Value::as_f64).collect(),
        _ => Vec::new(),
    }
}
