//! Route selection session
//!
//! [`Session`] is the whole interaction state of one map: the start and end
//! points, the pending context click, the loaded route set and the fetches
//! in flight. Every change goes through [`Session::dispatch`]; side effects
//! (HTTP calls) are returned as [`Effect`]s for the caller to execute, and
//! their outcomes come back in as [`Event::RoutesSettled`].

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::core::error::Result;
use crate::core::model::{Point, Route, RouteQuery};

/// Identifies one route fetch. Later fetches carry larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// User input and settled network calls
#[derive(Debug)]
pub enum Event {
    /// Primary click on the map surface
    PrimaryClick(Point),
    /// Secondary (context) click on the map surface
    ContextClick(Point),
    ConfirmStart,
    ConfirmEnd,
    /// Move the end to the pending click and rebuild the route
    ConfirmNewRoute,
    DismissPending,
    ResetStart,
    ResetEnd,
    ResetAll,
    /// A route fetch finished, successfully or not
    RoutesSettled {
        ticket: Ticket,
        outcome: Result<Vec<Route>>,
    },
}

/// Work the caller must perform on behalf of the session
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fire-and-forget coordinate report
    ReportCoordinates(Point),
    /// Route query whose outcome must be fed back with the same ticket
    FetchRoutes { ticket: Ticket, query: RouteQuery },
}

/// Coarse view of where the user is in the selection flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected
    Idle,
    /// A click awaits confirmation as start
    StartPending,
    /// Start chosen, no end yet
    StartSet,
    /// A click awaits confirmation as end
    EndPending,
    /// End kept after a start reset, no start
    EndSet,
    /// Both endpoints chosen; routes loaded or loading
    BothSet,
}

/// Ways a pending click can be confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Start,
    End,
    NewRoute,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confirmation::Start => "start",
            Confirmation::End => "end",
            Confirmation::NewRoute => "new route",
        };
        f.write_str(label)
    }
}

/// A confirmation requested in a state that does not offer it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no pending click to confirm")]
    NoPendingClick,
    #[error("start point is already set")]
    StartAlreadySet,
    #[error("start point is not set")]
    StartNotSet,
    #[error("end point is already set")]
    EndAlreadySet,
    #[error("end point is not set")]
    EndNotSet,
}

#[derive(Debug, Default)]
pub struct Session {
    start: Option<Point>,
    end: Option<Point>,
    pending: Option<Point>,
    routes: Vec<Route>,
    in_flight: BTreeSet<Ticket>,
    current: Option<Ticket>,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// True while any route fetch is outstanding
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn phase(&self) -> Phase {
        match (self.start, self.end, self.pending) {
            (Some(_), Some(_), _) => Phase::BothSet,
            (None, _, Some(_)) => Phase::StartPending,
            (Some(_), None, Some(_)) => Phase::EndPending,
            (Some(_), None, None) => Phase::StartSet,
            (None, Some(_), None) => Phase::EndSet,
            (None, None, None) => Phase::Idle,
        }
    }

    /// The confirmation a popup on the pending click would offer
    pub fn offered(&self) -> Option<Confirmation> {
        self.pending?;
        Some(match (self.start, self.end) {
            (None, _) => Confirmation::Start,
            (Some(_), None) => Confirmation::End,
            (Some(_), Some(_)) => Confirmation::NewRoute,
        })
    }

    /// Apply one event. Returns the side effect to run, if any.
    ///
    /// A rejected confirmation leaves the session exactly as it was.
    pub fn dispatch(&mut self, event: Event) -> std::result::Result<Option<Effect>, TransitionError> {
        match event {
            Event::PrimaryClick(point) => Ok(Some(self.primary_click(point))),
            Event::ContextClick(point) => {
                self.context_click(point);
                Ok(None)
            }
            Event::ConfirmStart => self.confirm_start(),
            Event::ConfirmEnd => self.confirm_end().map(Some),
            Event::ConfirmNewRoute => self.confirm_new_route().map(Some),
            Event::DismissPending => {
                self.dismiss_pending();
                Ok(None)
            }
            Event::ResetStart => {
                self.reset_start();
                Ok(None)
            }
            Event::ResetEnd => {
                self.reset_end();
                Ok(None)
            }
            Event::ResetAll => {
                self.reset_all();
                Ok(None)
            }
            Event::RoutesSettled { ticket, outcome } => {
                self.settle(ticket, outcome);
                Ok(None)
            }
        }
    }

    fn primary_click(&mut self, point: Point) -> Effect {
        info!("Map click at {point}");
        Effect::ReportCoordinates(point)
    }

    fn context_click(&mut self, point: Point) {
        if let Some(previous) = self.pending.replace(point) {
            debug!("Pending click moved from {previous} to {point}");
        } else {
            debug!("Pending click at {point}");
        }
    }

    fn confirm_start(&mut self) -> std::result::Result<Option<Effect>, TransitionError> {
        let point = self.pending.ok_or(TransitionError::NoPendingClick)?;
        if self.start.is_some() {
            return Err(TransitionError::StartAlreadySet);
        }

        self.pending = None;
        self.start = Some(point);
        debug!("Start set to {point}");

        let end = self.end;
        Ok(end.map(|end| self.issue_fetch(point, end)))
    }

    fn confirm_end(&mut self) -> std::result::Result<Effect, TransitionError> {
        let point = self.pending.ok_or(TransitionError::NoPendingClick)?;
        let start = self.start.ok_or(TransitionError::StartNotSet)?;
        if self.end.is_some() {
            return Err(TransitionError::EndAlreadySet);
        }
        Ok(self.place_end(start, point))
    }

    fn confirm_new_route(&mut self) -> std::result::Result<Effect, TransitionError> {
        let point = self.pending.ok_or(TransitionError::NoPendingClick)?;
        let start = self.start.ok_or(TransitionError::StartNotSet)?;
        if self.end.is_none() {
            return Err(TransitionError::EndNotSet);
        }
        Ok(self.place_end(start, point))
    }

    fn place_end(&mut self, start: Point, end: Point) -> Effect {
        self.pending = None;
        self.end = Some(end);
        debug!("End set to {end}");
        self.issue_fetch(start, end)
    }

    fn dismiss_pending(&mut self) {
        if self.pending.take().is_some() {
            debug!("Pending click dismissed");
        }
    }

    fn reset_start(&mut self) {
        self.start = None;
        self.clear_routes();
    }

    fn reset_end(&mut self) {
        self.end = None;
        self.clear_routes();
    }

    fn reset_all(&mut self) {
        self.start = None;
        self.end = None;
        self.clear_routes();
    }

    /// Drop displayed routes and supersede any outstanding fetch
    fn clear_routes(&mut self) {
        self.routes.clear();
        self.current = None;
    }

    fn issue_fetch(&mut self, origin: Point, destination: Point) -> Effect {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight.insert(ticket);
        self.current = Some(ticket);
        debug!("Route fetch {ticket}: {origin} -> {destination}");

        Effect::FetchRoutes {
            ticket,
            query: RouteQuery {
                origin,
                destination,
            },
        }
    }

    fn settle(&mut self, ticket: Ticket, outcome: Result<Vec<Route>>) {
        if !self.in_flight.remove(&ticket) {
            warn!("Ignoring outcome for unknown route fetch {ticket}");
            return;
        }

        if self.current != Some(ticket) {
            match outcome {
                Ok(routes) => debug!(
                    "Discarding {} route(s) from superseded fetch {ticket}",
                    routes.len()
                ),
                Err(e) => debug!("Superseded fetch {ticket} failed: {e}"),
            }
            return;
        }

        match outcome {
            Ok(routes) => {
                info!("Loaded {} route(s) from fetch {ticket}", routes.len());
                self.routes = routes;
            }
            Err(e) => error!("Route fetch {ticket} failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::model::Segment;

    fn route(duration: &str) -> Route {
        Route {
            duration: duration.to_string(),
            distance: "1 km".to_string(),
            segments: vec![Segment {
                polyline: vec![Point::new(50.40, 30.50), Point::new(50.46, 30.55)],
                traffic: None,
            }],
        }
    }

    fn ticket_of(effect: Option<Effect>) -> Ticket {
        match effect {
            Some(Effect::FetchRoutes { ticket, .. }) => ticket,
            other => panic!("Expected a route fetch, got {other:?}"),
        }
    }

    /// Session with both points set and one loaded route
    fn loaded_session() -> Session {
        let mut session = Session::new();
        session.dispatch(Event::ContextClick(Point::new(50.40, 30.50))).unwrap();
        session.dispatch(Event::ConfirmStart).unwrap();
        session.dispatch(Event::ContextClick(Point::new(50.46, 30.55))).unwrap();
        let ticket = ticket_of(session.dispatch(Event::ConfirmEnd).unwrap());
        session
            .dispatch(Event::RoutesSettled {
                ticket,
                outcome: Ok(vec![route("10 min")]),
            })
            .unwrap();
        session
    }

    #[test]
    fn test_phases_follow_selection_flow() {
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);

        session.dispatch(Event::ContextClick(Point::new(50.40, 30.50))).unwrap();
        assert_eq!(session.phase(), Phase::StartPending);
        assert_eq!(session.offered(), Some(Confirmation::Start));

        assert_eq!(session.dispatch(Event::ConfirmStart).unwrap(), None);
        assert_eq!(session.phase(), Phase::StartSet);
        assert_eq!(session.pending(), None);
        assert_eq!(session.offered(), None);

        session.dispatch(Event::ContextClick(Point::new(50.46, 30.55))).unwrap();
        assert_eq!(session.phase(), Phase::EndPending);
        assert_eq!(session.offered(), Some(Confirmation::End));

        session.dispatch(Event::ConfirmEnd).unwrap();
        assert_eq!(session.phase(), Phase::BothSet);
        assert!(session.is_loading());
    }

    #[test]
    fn test_start_then_end_issues_exactly_one_fetch() {
        let mut session = Session::new();
        let mut effects = Vec::new();

        for event in [
            Event::ContextClick(Point::new(50.40, 30.50)),
            Event::ConfirmStart,
            Event::ContextClick(Point::new(50.46, 30.55)),
            Event::ConfirmEnd,
        ] {
            effects.extend(session.dispatch(event).unwrap());
        }

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::FetchRoutes { query, .. } => {
                assert_eq!(query.origin, Point::new(50.40, 30.50));
                assert_eq!(query.destination, Point::new(50.46, 30.55));
            }
            other => panic!("Expected route fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_confirm_start_with_end_kept_fetches_immediately() {
        let mut session = loaded_session();
        session.dispatch(Event::ResetStart).unwrap();
        assert_eq!(session.phase(), Phase::EndSet);
        assert!(session.routes().is_empty());

        session.dispatch(Event::ContextClick(Point::new(50.42, 30.52))).unwrap();
        assert_eq!(session.offered(), Some(Confirmation::Start));
        match session.dispatch(Event::ConfirmStart).unwrap() {
            Some(Effect::FetchRoutes { query, .. }) => {
                assert_eq!(query.origin, Point::new(50.42, 30.52));
                assert_eq!(query.destination, Point::new(50.46, 30.55));
            }
            other => panic!("Expected route fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_new_route_moves_end_and_keeps_start() {
        let mut session = loaded_session();
        session.dispatch(Event::ContextClick(Point::new(50.50, 30.60))).unwrap();
        assert_eq!(session.offered(), Some(Confirmation::NewRoute));

        let ticket = ticket_of(session.dispatch(Event::ConfirmNewRoute).unwrap());
        assert_eq!(session.start(), Some(Point::new(50.40, 30.50)));
        assert_eq!(session.end(), Some(Point::new(50.50, 30.60)));
        assert_eq!(session.routes()[0].duration, "10 min");

        session
            .dispatch(Event::RoutesSettled {
                ticket,
                outcome: Ok(vec![route("12 min"), route("15 min")]),
            })
            .unwrap();
        assert_eq!(session.routes().len(), 2);
        assert_eq!(session.routes()[0].duration, "12 min");
    }

    #[test]
    fn test_rejected_confirmations_leave_state_untouched() {
        let mut session = Session::new();
        assert_eq!(
            session.dispatch(Event::ConfirmStart),
            Err(TransitionError::NoPendingClick)
        );

        session.dispatch(Event::ContextClick(Point::new(50.40, 30.50))).unwrap();
        assert_eq!(
            session.dispatch(Event::ConfirmEnd),
            Err(TransitionError::StartNotSet)
        );
        assert_eq!(
            session.dispatch(Event::ConfirmNewRoute),
            Err(TransitionError::StartNotSet)
        );
        assert_eq!(session.pending(), Some(Point::new(50.40, 30.50)));

        session.dispatch(Event::ConfirmStart).unwrap();
        session.dispatch(Event::ContextClick(Point::new(50.41, 30.51))).unwrap();
        assert_eq!(
            session.dispatch(Event::ConfirmStart),
            Err(TransitionError::StartAlreadySet)
        );
        assert_eq!(
            session.dispatch(Event::ConfirmNewRoute),
            Err(TransitionError::EndNotSet)
        );

        let mut loaded = loaded_session();
        loaded.dispatch(Event::ContextClick(Point::new(50.50, 30.60))).unwrap();
        assert_eq!(
            loaded.dispatch(Event::ConfirmEnd),
            Err(TransitionError::EndAlreadySet)
        );
        assert_eq!(loaded.routes().len(), 1);
        assert!(!loaded.is_loading());
    }

    #[test]
    fn test_context_click_replaces_pending_and_dismiss_clears_it() {
        let mut session = Session::new();
        session.dispatch(Event::ContextClick(Point::new(1.0, 1.0))).unwrap();
        session.dispatch(Event::ContextClick(Point::new(2.0, 2.0))).unwrap();
        assert_eq!(session.pending(), Some(Point::new(2.0, 2.0)));

        session.dispatch(Event::DismissPending).unwrap();
        assert_eq!(session.pending(), None);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_primary_click_only_reports() {
        let mut session = loaded_session();
        let effect = session.dispatch(Event::PrimaryClick(Point::new(1.0, 2.0))).unwrap();
        assert_eq!(effect, Some(Effect::ReportCoordinates(Point::new(1.0, 2.0))));
        assert_eq!(session.routes().len(), 1);
        assert_eq!(session.pending(), None);
    }

    #[test]
    fn test_every_reset_clears_routes() {
        let resets: [fn() -> Event; 3] = [|| Event::ResetStart, || Event::ResetEnd, || Event::ResetAll];
        for first in resets {
            for second in resets {
                let mut session = loaded_session();
                session.dispatch(first()).unwrap();
                assert!(session.routes().is_empty());
                session.dispatch(second()).unwrap();
                assert!(session.routes().is_empty());
            }
        }
    }

    #[test]
    fn test_resets_keep_the_other_endpoint() {
        let mut session = loaded_session();
        session.dispatch(Event::ResetEnd).unwrap();
        assert_eq!(session.start(), Some(Point::new(50.40, 30.50)));
        assert_eq!(session.end(), None);

        let mut session = loaded_session();
        session.dispatch(Event::ResetStart).unwrap();
        assert_eq!(session.start(), None);
        assert_eq!(session.end(), Some(Point::new(50.46, 30.55)));

        let mut session = loaded_session();
        session.dispatch(Event::ResetAll).unwrap();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_success_with_no_routes_empties_route_set() {
        let mut session = loaded_session();
        session.dispatch(Event::ContextClick(Point::new(50.50, 30.60))).unwrap();
        let ticket = ticket_of(session.dispatch(Event::ConfirmNewRoute).unwrap());

        session
            .dispatch(Event::RoutesSettled {
                ticket,
                outcome: Ok(Vec::new()),
            })
            .unwrap();
        assert!(session.routes().is_empty());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_route_set() {
        let mut session = loaded_session();
        let before = session.routes().to_vec();
        session.dispatch(Event::ContextClick(Point::new(50.50, 30.60))).unwrap();
        let ticket = ticket_of(session.dispatch(Event::ConfirmNewRoute).unwrap());

        session
            .dispatch(Event::RoutesSettled {
                ticket,
                outcome: Err(Error::Unsuccessful {
                    status: "error".to_string(),
                }),
            })
            .unwrap();
        assert_eq!(session.routes(), before.as_slice());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_late_response_after_reset_is_discarded() {
        let mut session = Session::new();
        session.dispatch(Event::ContextClick(Point::new(50.40, 30.50))).unwrap();
        session.dispatch(Event::ConfirmStart).unwrap();
        session.dispatch(Event::ContextClick(Point::new(50.46, 30.55))).unwrap();
        let ticket = ticket_of(session.dispatch(Event::ConfirmEnd).unwrap());

        session.dispatch(Event::ResetAll).unwrap();
        assert!(session.is_loading());

        session
            .dispatch(Event::RoutesSettled {
                ticket,
                outcome: Ok(vec![route("10 min")]),
            })
            .unwrap();
        assert!(session.routes().is_empty());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_superseded_fetch_cannot_overwrite_newer_routes() {
        let mut session = loaded_session();
        session.dispatch(Event::ContextClick(Point::new(50.50, 30.60))).unwrap();
        let older = ticket_of(session.dispatch(Event::ConfirmNewRoute).unwrap());
        session.dispatch(Event::ContextClick(Point::new(50.55, 30.65))).unwrap();
        let newer = ticket_of(session.dispatch(Event::ConfirmNewRoute).unwrap());
        assert!(newer > older);
        assert_eq!(session.in_flight(), 2);

        session
            .dispatch(Event::RoutesSettled {
                ticket: newer,
                outcome: Ok(vec![route("newer")]),
            })
            .unwrap();
        assert!(session.is_loading());

        session
            .dispatch(Event::RoutesSettled {
                ticket: older,
                outcome: Ok(vec![route("older")]),
            })
            .unwrap();
        assert_eq!(session.routes()[0].duration, "newer");
        assert!(!session.is_loading());
    }

    #[test]
    fn test_unknown_ticket_is_ignored() {
        let mut session = loaded_session();
        session
            .dispatch(Event::RoutesSettled {
                ticket: Ticket(99),
                outcome: Ok(Vec::new()),
            })
            .unwrap();
        assert_eq!(session.routes().len(), 1);
    }
}
