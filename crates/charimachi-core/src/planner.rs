//! Planner state container.
//!
//! All inputs arrive as [`PlannerEvent`]s and are applied one at a time by
//! [`Planner::apply`], which returns the [`Effect`]s the host must perform
//! (arm a timer, run a search, fetch a route). Results come back as further
//! events tagged with the sequence number they were issued under; anything
//! not tagged with the latest number is discarded.

use crate::debounce::{SearchDebouncer, TimerRequest, TimerTicket};
use crate::models::{GeoPoint, Mode, ModeFlags, RouteQuery, RouteResponse, SearchResult};
use crate::query::{build_route_query, RequestSeq, SequenceCounter};
use crate::view::{aggregate, ViewState};
use std::time::Duration;
use tracing::{debug, warn};

/// Progress of one asynchronous source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fetch<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetch::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetch::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationState {
    #[default]
    Locating,
    Located(GeoPoint),
    /// The provider failed; the screen keeps waiting for a fix.
    Unavailable,
}

impl LocationState {
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            LocationState::Located(point) => Some(*point),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    LocationResolved(GeoPoint),
    LocationUnavailable(String),
    KeywordChanged(String),
    DebounceElapsed(TimerTicket),
    SearchCompleted {
        seq: RequestSeq,
        outcome: Result<Vec<SearchResult>, String>,
    },
    DestinationSelected(SearchResult),
    ModeChanged {
        mode: Mode,
        enabled: bool,
    },
    ModesReplaced(ModeFlags),
    RouteCompleted {
        seq: RequestSeq,
        outcome: Result<RouteResponse, String>,
    },
}

/// Work the host must perform on the planner's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ArmDebounce(TimerRequest),
    Search { seq: RequestSeq, keyword: String },
    FetchRoute { seq: RequestSeq, query: RouteQuery },
}

#[derive(Debug, Clone)]
pub struct Planner {
    debouncer: SearchDebouncer,
    location: LocationState,
    keyword: String,
    committed_keyword: Option<String>,
    suggestions_open: bool,
    search: Fetch<Vec<SearchResult>>,
    search_seq: SequenceCounter,
    destination: Option<SearchResult>,
    modes: ModeFlags,
    route: Fetch<RouteResponse>,
    route_seq: SequenceCounter,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(crate::debounce::DEFAULT_QUIET_PERIOD)
    }
}

impl Planner {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            debouncer: SearchDebouncer::new(quiet_period),
            location: LocationState::Locating,
            keyword: String::new(),
            committed_keyword: None,
            suggestions_open: false,
            search: Fetch::Idle,
            search_seq: SequenceCounter::default(),
            destination: None,
            modes: ModeFlags::default(),
            route: Fetch::Idle,
            route_seq: SequenceCounter::default(),
        }
    }

    pub fn apply(&mut self, event: PlannerEvent) -> Vec<Effect> {
        match event {
            PlannerEvent::LocationResolved(point) => {
                if self.location == LocationState::Located(point) {
                    return Vec::new();
                }
                debug!(lat = point.latitude, lon = point.longitude, "origin updated");
                self.location = LocationState::Located(point);
                self.evaluate_route()
            }
            PlannerEvent::LocationUnavailable(reason) => {
                warn!(%reason, "location unavailable");
                self.location = LocationState::Unavailable;
                self.evaluate_route()
            }
            PlannerEvent::KeywordChanged(keyword) => {
                self.keyword = keyword.clone();
                vec![Effect::ArmDebounce(self.debouncer.input(keyword))]
            }
            PlannerEvent::DebounceElapsed(ticket) => match self.debouncer.fire(ticket) {
                Some(keyword) => self.commit_keyword(keyword),
                None => {
                    debug!(ticket = ticket.0, "superseded debounce timer ignored");
                    Vec::new()
                }
            },
            PlannerEvent::SearchCompleted { seq, outcome } => {
                if !self.search_seq.is_current(seq) {
                    debug!(seq = seq.0, "discarding stale search response");
                    return Vec::new();
                }
                self.search = match outcome {
                    Ok(results) => Fetch::Ready(results),
                    Err(message) => {
                        warn!(%message, "search failed");
                        Fetch::Failed(message)
                    }
                };
                Vec::new()
            }
            PlannerEvent::DestinationSelected(result) => {
                if let Err(err) = result.point() {
                    warn!(error = %err, "selected destination has no usable coordinates");
                }
                self.destination = Some(result);
                self.suggestions_open = false;
                self.evaluate_route()
            }
            PlannerEvent::ModeChanged { mode, enabled } => {
                if !self.modes.set(mode, enabled) {
                    return Vec::new();
                }
                self.evaluate_route()
            }
            PlannerEvent::ModesReplaced(modes) => {
                if self.modes == modes {
                    return Vec::new();
                }
                self.modes = modes;
                self.evaluate_route()
            }
            PlannerEvent::RouteCompleted { seq, outcome } => {
                if !self.route_seq.is_current(seq) {
                    debug!(seq = seq.0, "discarding stale route response");
                    return Vec::new();
                }
                self.route = match outcome {
                    Ok(response) => Fetch::Ready(response),
                    Err(message) => {
                        warn!(%message, "route request failed");
                        Fetch::Failed(message)
                    }
                };
                Vec::new()
            }
        }
    }

    fn commit_keyword(&mut self, keyword: String) -> Vec<Effect> {
        let query = keyword.trim().to_string();
        if query.is_empty() {
            debug!("empty keyword committed");
            self.committed_keyword = Some(keyword);
            self.suggestions_open = false;
            self.search_seq.invalidate();
            self.search = Fetch::Idle;
            return Vec::new();
        }

        self.suggestions_open = true;
        let unchanged = self.committed_keyword.as_deref() == Some(keyword.as_str());
        self.committed_keyword = Some(keyword);
        if unchanged && self.search.ready().is_some() {
            debug!(%query, "keyword unchanged, reusing results");
            return Vec::new();
        }

        let seq = self.search_seq.issue();
        self.search = Fetch::Loading;
        vec![Effect::Search {
            seq,
            keyword: query,
        }]
    }

    fn evaluate_route(&mut self) -> Vec<Effect> {
        match build_route_query(self.origin(), self.destination_point(), self.modes) {
            Some(query) => {
                let seq = self.route_seq.issue();
                self.route = Fetch::Loading;
                vec![Effect::FetchRoute { seq, query }]
            }
            None => {
                self.route_seq.invalidate();
                self.route = Fetch::Idle;
                Vec::new()
            }
        }
    }

    pub fn view(&self) -> ViewState {
        aggregate(self)
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.location.point()
    }

    pub fn location(&self) -> LocationState {
        self.location
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn committed_keyword(&self) -> Option<&str> {
        self.committed_keyword.as_deref()
    }

    pub fn suggestions_open(&self) -> bool {
        self.suggestions_open
    }

    pub fn search(&self) -> &Fetch<Vec<SearchResult>> {
        &self.search
    }

    pub fn destination(&self) -> Option<&SearchResult> {
        self.destination.as_ref()
    }

    pub fn destination_point(&self) -> Option<GeoPoint> {
        self.destination
            .as_ref()
            .and_then(|destination| destination.point().ok())
    }

    pub fn modes(&self) -> ModeFlags {
        self.modes
    }

    pub fn route(&self) -> &Fetch<RouteResponse> {
        &self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo_tower() -> SearchResult {
        SearchResult {
            place_id: "1".to_string(),
            display_name: Some("Tokyo Tower".to_string()),
            lat: "35.6585805".to_string(),
            lon: "139.7454329".to_string(),
            ..Default::default()
        }
    }

    fn located_planner() -> Planner {
        let mut planner = Planner::default();
        planner.apply(PlannerEvent::LocationResolved(GeoPoint::new(35.68, 139.76)));
        planner
    }

    fn route_seq(effects: &[Effect]) -> RequestSeq {
        match effects {
            [Effect::FetchRoute { seq, .. }] => *seq,
            other => panic!("expected one route fetch, got {other:?}"),
        }
    }

    #[test]
    fn committed_keyword_opens_suggestions_and_searches() {
        let mut planner = Planner::default();
        let effects = planner.apply(PlannerEvent::KeywordChanged("tokyo".to_string()));
        let [Effect::ArmDebounce(request)] = effects.as_slice() else {
            panic!("expected debounce, got {effects:?}");
        };
        assert!(!planner.suggestions_open());

        let effects = planner.apply(PlannerEvent::DebounceElapsed(request.ticket));
        assert!(matches!(
            effects.as_slice(),
            [Effect::Search { keyword, .. }] if keyword == "tokyo"
        ));
        assert!(planner.suggestions_open());
        assert!(planner.search().is_loading());
    }

    #[test]
    fn empty_commit_keeps_panel_closed() {
        let mut planner = Planner::default();
        for keyword in ["", "   "] {
            let effects = planner.apply(PlannerEvent::KeywordChanged(keyword.to_string()));
            let [Effect::ArmDebounce(request)] = effects.as_slice() else {
                panic!("expected debounce");
            };
            let effects = planner.apply(PlannerEvent::DebounceElapsed(request.ticket));
            assert!(effects.is_empty());
            assert!(!planner.suggestions_open());
        }
    }

    #[test]
    fn superseded_timer_does_not_commit() {
        let mut planner = Planner::default();
        let first = planner.apply(PlannerEvent::KeywordChanged("a".to_string()));
        planner.apply(PlannerEvent::KeywordChanged("ab".to_string()));
        let [Effect::ArmDebounce(stale)] = first.as_slice() else {
            panic!("expected debounce");
        };
        assert!(planner
            .apply(PlannerEvent::DebounceElapsed(stale.ticket))
            .is_empty());
        assert_eq!(planner.committed_keyword(), None);
    }

    #[test]
    fn stale_search_response_is_discarded() {
        let mut planner = Planner::default();
        let mut seqs = Vec::new();
        for keyword in ["shibuya", "shinjuku"] {
            let effects = planner.apply(PlannerEvent::KeywordChanged(keyword.to_string()));
            let [Effect::ArmDebounce(request)] = effects.as_slice() else {
                panic!("expected debounce");
            };
            let effects = planner.apply(PlannerEvent::DebounceElapsed(request.ticket));
            let [Effect::Search { seq, .. }] = effects.as_slice() else {
                panic!("expected search");
            };
            seqs.push(*seq);
        }

        planner.apply(PlannerEvent::SearchCompleted {
            seq: seqs[1],
            outcome: Ok(vec![tokyo_tower()]),
        });
        planner.apply(PlannerEvent::SearchCompleted {
            seq: seqs[0],
            outcome: Ok(Vec::new()),
        });
        assert_eq!(planner.search().ready().map(Vec::len), Some(1));
    }

    #[test]
    fn selecting_destination_requests_route_and_closes_panel() {
        let mut planner = located_planner();
        let effects = planner.apply(PlannerEvent::KeywordChanged("tower".to_string()));
        let [Effect::ArmDebounce(request)] = effects.as_slice() else {
            panic!("expected debounce");
        };
        planner.apply(PlannerEvent::DebounceElapsed(request.ticket));
        assert!(planner.suggestions_open());

        let effects = planner.apply(PlannerEvent::DestinationSelected(tokyo_tower()));
        let [Effect::FetchRoute { query, .. }] = effects.as_slice() else {
            panic!("expected route fetch, got {effects:?}");
        };
        assert!(!planner.suggestions_open());
        assert_eq!(query.origin, GeoPoint::new(35.68, 139.76));
        assert!((query.destination.longitude - 139.7454329).abs() < 1e-9);
        assert!(planner.route().is_loading());
    }

    #[test]
    fn no_route_without_origin() {
        let mut planner = Planner::default();
        assert!(planner
            .apply(PlannerEvent::DestinationSelected(tokyo_tower()))
            .is_empty());

        let effects = planner.apply(PlannerEvent::LocationResolved(GeoPoint::new(35.0, 139.0)));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn mode_change_refetches_only_when_flag_changes() {
        let mut planner = located_planner();
        planner.apply(PlannerEvent::DestinationSelected(tokyo_tower()));

        let effects = planner.apply(PlannerEvent::ModeChanged {
            mode: Mode::AvoidTrafficLights,
            enabled: true,
        });
        let [Effect::FetchRoute { query, .. }] = effects.as_slice() else {
            panic!("expected route fetch");
        };
        assert!(query.modes.avoid_traffic_lights);

        assert!(planner
            .apply(PlannerEvent::ModeChanged {
                mode: Mode::AvoidTrafficLights,
                enabled: true,
            })
            .is_empty());
    }

    #[test]
    fn stale_route_response_cannot_overwrite_fresh_one() {
        let mut planner = located_planner();
        let first = route_seq(&planner.apply(PlannerEvent::DestinationSelected(tokyo_tower())));
        let second = route_seq(&planner.apply(PlannerEvent::ModeChanged {
            mode: Mode::ViaBikeParking,
            enabled: true,
        }));

        let fresh = RouteResponse {
            distance_meters: Some(2500.0),
            ..Default::default()
        };
        planner.apply(PlannerEvent::RouteCompleted {
            seq: second,
            outcome: Ok(fresh.clone()),
        });
        planner.apply(PlannerEvent::RouteCompleted {
            seq: first,
            outcome: Err("timeout".to_string()),
        });

        assert_eq!(planner.route().ready(), Some(&fresh));
    }

    #[test]
    fn losing_location_drops_pending_route() {
        let mut planner = located_planner();
        let seq = route_seq(&planner.apply(PlannerEvent::DestinationSelected(tokyo_tower())));
        planner.apply(PlannerEvent::LocationUnavailable("denied".to_string()));
        planner.apply(PlannerEvent::RouteCompleted {
            seq,
            outcome: Ok(RouteResponse::default()),
        });
        assert_eq!(planner.route(), &Fetch::Idle);
        assert_eq!(planner.origin(), None);
    }

    #[test]
    fn recommitting_same_keyword_reuses_results() {
        let mut planner = Planner::default();
        let commit = |planner: &mut Planner, keyword: &str| {
            let effects = planner.apply(PlannerEvent::KeywordChanged(keyword.to_string()));
            let [Effect::ArmDebounce(request)] = effects.as_slice() else {
                panic!("expected debounce");
            };
            planner.apply(PlannerEvent::DebounceElapsed(request.ticket))
        };

        let effects = commit(&mut planner, "ueno");
        let [Effect::Search { seq, .. }] = effects.as_slice() else {
            panic!("expected search");
        };
        planner.apply(PlannerEvent::SearchCompleted {
            seq: *seq,
            outcome: Ok(vec![tokyo_tower()]),
        });
        planner.apply(PlannerEvent::DestinationSelected(tokyo_tower()));
        assert!(!planner.suggestions_open());

        assert!(commit(&mut planner, "ueno").is_empty());
        assert!(planner.suggestions_open());
    }
}
