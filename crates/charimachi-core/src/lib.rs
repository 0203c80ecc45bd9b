//! Charimachi core - route planning state for the bicycle map screen.
//!
//! Pure, synchronous logic: the planner state container, keyword
//! debouncing, route query assembly, metric formatting, comfort
//! classification and view derivation. Network and timer side effects are
//! performed by the host (see the `charimachi-sdk` crate).

pub mod comfort;
pub mod debounce;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod models;
pub mod planner;
pub mod query;
pub mod view;
pub mod viewport;

pub use comfort::{classify, ComfortBucket, ComfortLevel};
pub use debounce::{SearchDebouncer, TimerRequest, TimerTicket, DEFAULT_QUIET_PERIOD};
pub use error::CoreError;
pub use geometry::build_route_geometry;
pub use metrics::{
    duration_or_fallback, estimated_arrival, format_distance, format_duration, DisplayMetric,
    MetricUnit,
};
pub use models::{
    DirectionsResponse, GeoPoint, HealthStatus, Mode, ModeFlags, RawPosition, RouteQuery,
    RouteResponse, SearchResult, WarningPoint,
};
pub use planner::{Effect, Fetch, LocationState, Planner, PlannerEvent};
pub use query::{build_route_query, RequestSeq, SequenceCounter};
pub use view::{
    ComfortBadge, Marker, MarkerKind, ScoreField, SuggestionPanel, SummaryField, SummaryPanel,
    ViewState,
};
pub use viewport::{compute_viewport, Viewport};
