//! Cancellable one-shot timers for keyword debouncing.

use charimachi_core::{TimerRequest, TimerTicket};
use tokio::task::JoinHandle;
use tracing::trace;

/// Holds at most one armed timer. Arming a new one aborts the previous, so
/// only the latest timer can fire.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    armed: Option<(TimerTicket, JoinHandle<()>)>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `on_fire` after `request.delay` unless re-armed or cancelled first.
    pub fn arm<F>(&mut self, request: TimerRequest, on_fire: F)
    where
        F: FnOnce(TimerTicket) + Send + 'static,
    {
        self.cancel();
        let ticket = request.ticket;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(request.delay).await;
            on_fire(ticket);
        });
        self.armed = Some((ticket, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((ticket, handle)) = self.armed.take() {
            if !handle.is_finished() {
                trace!(ticket = ticket.0, "cancelling debounce timer");
            }
            handle.abort();
        }
    }

    pub fn armed_ticket(&self) -> Option<TimerTicket> {
        self.armed
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(ticket, _)| *ticket)
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn only_latest_timer_fires() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut timer = DebounceTimer::new();

        for id in 1..=3 {
            let fired = Arc::clone(&fired);
            timer.arm(
                TimerRequest {
                    ticket: TimerTicket(id),
                    delay: Duration::from_millis(1000),
                },
                move |ticket| fired.lock().unwrap().push(ticket),
            );
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        assert_eq!(timer.armed_ticket(), Some(TimerTicket(3)));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(*fired.lock().unwrap(), vec![TimerTicket(3)]);
        assert_eq!(timer.armed_ticket(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(Mutex::new(false));
        let mut timer = DebounceTimer::new();
        let flag = Arc::clone(&fired);
        timer.arm(
            TimerRequest {
                ticket: TimerTicket(1),
                delay: Duration::from_millis(50),
            },
            move |_| *flag.lock().unwrap() = true,
        );
        timer.cancel();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!*fired.lock().unwrap());
    }
}
