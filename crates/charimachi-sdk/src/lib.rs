//! Charimachi SDK - routing-service client and planner session.
//!
//! Connects the pure planner in `charimachi-core` to the outside world:
//! HTTP calls to the routing service, the device location provider and
//! debounce timers.

pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod session;
pub mod timer;

pub use client::CharimachiClient;
pub use config::ClientConfig;
pub use error::{ClientError, LocationError, SessionError};
pub use service::{FixedLocation, LocationProvider, NoLocation, RoutingService};
pub use session::{spawn_session, SessionHandle};
pub use timer::DebounceTimer;
