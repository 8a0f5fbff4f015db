//! Async driver for a route selection session
//!
//! [`RouteBuilder`] owns the [`Session`] and executes the effects it emits:
//! coordinate reports are spawned and forgotten, route fetches are spawned
//! and their outcomes queued until [`RouteBuilder::settle_next`] feeds them
//! back. New events can be handled while fetches are still running.

use log::warn;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::core::client::ApiClient;
use crate::core::error::{Error, Result};
use crate::core::model::Route;
use crate::core::session::{Effect, Event, Session, Ticket};

type Settled = (Ticket, Result<Vec<Route>>);

/// Delivers exactly one outcome for a ticket.
///
/// If the fetch task is aborted or panics before [`SettleGuard::send`], the
/// ticket settles as a network error on drop so it never stays in flight.
struct SettleGuard {
    ticket: Ticket,
    tx: Option<mpsc::UnboundedSender<Settled>>,
}

impl SettleGuard {
    fn new(ticket: Ticket, tx: mpsc::UnboundedSender<Settled>) -> Self {
        Self { ticket, tx: Some(tx) }
    }

    fn send(mut self, outcome: Result<Vec<Route>>) {
        if let Some(tx) = self.tx.take() {
            // Receiver lives as long as the builder
            let _ = tx.send((self.ticket, outcome));
        }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let lost = Error::Network(format!("route fetch {} ended without a result", self.ticket));
            let _ = tx.send((self.ticket, Err(lost)));
        }
    }
}

pub struct RouteBuilder {
    session: Session,
    client: ApiClient,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    reports: TaskTracker,
}

impl RouteBuilder {
    pub fn new(client: ApiClient) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            client,
            settled_tx,
            settled_rx,
            reports: TaskTracker::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Dispatch a user event and start whatever network call it asks for.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        if let Some(effect) = self.session.dispatch(event)? {
            self.run(effect);
        }
        Ok(())
    }

    fn run(&self, effect: Effect) {
        match effect {
            Effect::ReportCoordinates(point) => {
                let client = self.client.clone();
                self.reports.spawn(async move {
                    if let Err(e) = client.report_coordinates(point).await {
                        warn!("Failed to report coordinates {point}: {e}");
                    }
                });
            }
            Effect::FetchRoutes { ticket, query } => {
                let client = self.client.clone();
                let guard = SettleGuard::new(ticket, self.settled_tx.clone());
                tokio::spawn(async move {
                    let outcome = client.fetch_routes(query).await;
                    guard.send(outcome);
                });
            }
        }
    }

    /// Wait for the next route fetch to finish and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<Ticket> {
        if !self.session.is_loading() {
            return None;
        }
        let (ticket, outcome) = self.settled_rx.recv().await?;
        self.apply(ticket, outcome);
        Some(ticket)
    }

    /// Apply every fetch outcome that has already arrived, without waiting
    pub fn settle_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((ticket, outcome)) = self.settled_rx.try_recv() {
            self.apply(ticket, outcome);
            applied += 1;
        }
        applied
    }

    /// Wait until no route fetch is in flight
    pub async fn wait_idle(&mut self) {
        while self.settle_next().await.is_some() {}
    }

    /// Wait for every coordinate report spawned so far to finish
    pub async fn flush_reports(&self) {
        self.reports.close();
        self.reports.wait().await;
        self.reports.reopen();
    }

    fn apply(&mut self, ticket: Ticket, outcome: Result<Vec<Route>>) {
        // Settling never fails a transition
        let _ = self.session.dispatch(Event::RoutesSettled { ticket, outcome });
    }
}
