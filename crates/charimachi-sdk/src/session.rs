//! Planner session: runs the planner on the tokio runtime.
//!
//! Events are applied one at a time on a single task. Effects become
//! spawned requests or armed timers whose completions are fed back as
//! events, and every applied event publishes a fresh [`ViewState`].

use crate::error::SessionError;
use crate::service::{LocationProvider, RoutingService};
use crate::timer::DebounceTimer;
use charimachi_core::{
    Effect, GeoPoint, Mode, ModeFlags, Planner, PlannerEvent, SearchResult, ViewState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Cloneable handle used to feed user input to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<PlannerEvent>,
    view: watch::Receiver<ViewState>,
}

impl SessionHandle {
    pub fn set_keyword(&self, keyword: impl Into<String>) -> Result<(), SessionError> {
        self.send(PlannerEvent::KeywordChanged(keyword.into()))
    }

    pub fn select_destination(&self, destination: SearchResult) -> Result<(), SessionError> {
        self.send(PlannerEvent::DestinationSelected(destination))
    }

    pub fn set_mode(&self, mode: Mode, enabled: bool) -> Result<(), SessionError> {
        self.send(PlannerEvent::ModeChanged { mode, enabled })
    }

    pub fn set_modes(&self, modes: ModeFlags) -> Result<(), SessionError> {
        self.send(PlannerEvent::ModesReplaced(modes))
    }

    /// Push a location update from the device sensor.
    pub fn update_location(&self, point: GeoPoint) -> Result<(), SessionError> {
        self.send(PlannerEvent::LocationResolved(point))
    }

    /// Latest published view.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    /// Wait until the published view satisfies `predicate`.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Result<ViewState, SessionError>
    where
        F: FnMut(&ViewState) -> bool,
    {
        let mut view = self.view.clone();
        let state = view
            .wait_for(|state| predicate(state))
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(state.clone())
    }

    fn send(&self, event: PlannerEvent) -> Result<(), SessionError> {
        self.events.send(event).map_err(|_| SessionError::Closed)
    }
}

/// Start a session. It runs until every [`SessionHandle`] (and subscriber)
/// has been dropped.
pub fn spawn_session<S, L>(service: Arc<S>, location: Arc<L>, quiet_period: Duration) -> SessionHandle
where
    S: RoutingService,
    L: LocationProvider,
{
    let planner = Planner::new(quiet_period);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(planner.view());

    let locate_events = events_tx.clone();
    tokio::spawn(async move {
        let event = match location.current_location().await {
            Ok(point) => PlannerEvent::LocationResolved(point),
            Err(err) => PlannerEvent::LocationUnavailable(err.to_string()),
        };
        let _ = locate_events.send(event);
    });

    let session = Session {
        planner,
        service,
        timer: DebounceTimer::new(),
        events_tx: events_tx.clone(),
        view_tx,
    };
    tokio::spawn(session.run(events_rx));

    SessionHandle {
        events: events_tx,
        view: view_rx,
    }
}

struct Session<S> {
    planner: Planner,
    service: Arc<S>,
    timer: DebounceTimer,
    events_tx: mpsc::UnboundedSender<PlannerEvent>,
    view_tx: watch::Sender<ViewState>,
}

impl<S: RoutingService> Session<S> {
    async fn run(mut self, mut events_rx: mpsc::UnboundedReceiver<PlannerEvent>) {
        info!("planner session started");
        loop {
            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = self.view_tx.closed() => break,
            }
        }
        self.timer.cancel();
        info!("planner session stopped");
    }

    fn handle(&mut self, event: PlannerEvent) {
        for effect in self.planner.apply(event) {
            self.execute(effect);
        }
        self.view_tx.send_replace(self.planner.view());
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ArmDebounce(request) => {
                let events = self.events_tx.clone();
                self.timer.arm(request, move |ticket| {
                    let _ = events.send(PlannerEvent::DebounceElapsed(ticket));
                });
            }
            Effect::Search { seq, keyword } => {
                debug!(seq = seq.0, %keyword, "dispatching search");
                let service = Arc::clone(&self.service);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = service
                        .search(&keyword)
                        .await
                        .map_err(|err| err.to_string());
                    let _ = events.send(PlannerEvent::SearchCompleted { seq, outcome });
                });
            }
            Effect::FetchRoute { seq, query } => {
                debug!(seq = seq.0, "dispatching route request");
                let service = Arc::clone(&self.service);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = service
                        .directions(&query)
                        .await
                        .map_err(|err| err.to_string());
                    let _ = events.send(PlannerEvent::RouteCompleted { seq, outcome });
                });
            }
        }
    }
}
