//! Collaborator seams used by the planner session.

use crate::client::CharimachiClient;
use crate::error::{ClientError, LocationError};
use charimachi_core::{GeoPoint, RouteQuery, RouteResponse, SearchResult};
use std::future::Future;

/// The backend search and routing service.
pub trait RoutingService: Send + Sync + 'static {
    fn search(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, ClientError>> + Send;

    fn directions(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<RouteResponse, ClientError>> + Send;
}

impl RoutingService for CharimachiClient {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, ClientError> {
        CharimachiClient::search(self, keyword).await
    }

    async fn directions(&self, query: &RouteQuery) -> Result<RouteResponse, ClientError> {
        CharimachiClient::directions(self, query).await
    }
}

/// The device location sensor.
pub trait LocationProvider: Send + Sync + 'static {
    fn current_location(&self) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send;
}

/// A provider that always reports the same point.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

/// A provider that never yields a fix.
#[derive(Debug, Clone)]
pub struct NoLocation(pub LocationError);

impl LocationProvider for NoLocation {
    async fn current_location(&self) -> Result<GeoPoint, LocationError> {
        Err(self.0.clone())
    }
}
