//! Route state: applying responses, clearing, and ordering concurrent applies.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::{debug, warn};

use crate::route::{RouteError, RouteResult};

/// Externally visible builder state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RouteState {
    #[default]
    Empty,
    HasRoute(RouteResult),
}

/// Turns routing responses into the current route.
///
/// A new result is built completely before it replaces the old one, so a
/// failed build never leaves a half-applied route behind.
#[derive(Debug, Clone, Default)]
pub struct RouteGeometryBuilder {
    state: RouteState,
}

impl RouteGeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a route from `response` and makes it current.
    ///
    /// `None` means the service produced no response: the current state is
    /// kept and returned as is. On error the current state is untouched.
    pub fn build_from_response(
        &mut self,
        response: Option<Value>,
    ) -> Result<Option<&RouteResult>, RouteError> {
        let Some(raw) = response else {
            warn!("no routing response, keeping current route");
            return Ok(self.result());
        };

        let result = RouteResult::from_response(raw)?;
        debug!(
            legs = result.legs().len(),
            points = result.geometry().len(),
            distance_km = result.distance(),
            duration_s = result.duration(),
            "route built"
        );
        self.state = RouteState::HasRoute(result);
        Ok(self.result())
    }

    /// Replaces the current state with an already built result.
    pub fn set_result(&mut self, result: RouteResult) {
        self.state = RouteState::HasRoute(result);
    }

    pub fn clear(&mut self) {
        self.state = RouteState::Empty;
    }

    pub fn has_route(&self) -> bool {
        matches!(self.state, RouteState::HasRoute(_))
    }

    pub fn result(&self) -> Option<&RouteResult> {
        match &self.state {
            RouteState::HasRoute(result) => Some(result),
            RouteState::Empty => None,
        }
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }
}

/// Position of a build request in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BuildTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result is now current.
    Applied,
    /// No response was given; state unchanged.
    Unchanged,
    /// A later submission was already applied; this one was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct SharedState {
    builder: RouteGeometryBuilder,
    last_applied: u64,
}

/// A route builder shared between threads.
///
/// Callers take a ticket with [`SharedRouteBuilder::submit`] before asking
/// the routing service for a response, then hand both to
/// [`SharedRouteBuilder::apply`]. Decoding runs outside the lock; the swap
/// happens under it and only if no later ticket has been applied, so a slow
/// older response never replaces a newer route.
#[derive(Debug)]
pub struct SharedRouteBuilder {
    next_ticket: AtomicU64,
    state: Mutex<SharedState>,
}

impl Default for SharedRouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRouteBuilder {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(1),
            state: Mutex::new(SharedState::default()),
        }
    }

    pub fn submit(&self) -> BuildTicket {
        BuildTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    pub fn apply(
        &self,
        ticket: BuildTicket,
        response: Option<Value>,
    ) -> Result<ApplyOutcome, RouteError> {
        let Some(raw) = response else {
            return Ok(ApplyOutcome::Unchanged);
        };
        if ticket.0 <= self.lock().last_applied {
            warn!(ticket = ticket.0, "skipping stale route build");
            return Ok(ApplyOutcome::Superseded);
        }

        let result = RouteResult::from_response(raw)?;

        let mut shared = self.lock();
        if ticket.0 <= shared.last_applied {
            warn!(ticket = ticket.0, "dropping superseded route");
            return Ok(ApplyOutcome::Superseded);
        }
        shared.builder.set_result(result);
        shared.last_applied = ticket.0;
        Ok(ApplyOutcome::Applied)
    }

    /// Clears the route and supersedes every ticket issued so far.
    pub fn clear(&self) {
        let mut shared = self.lock();
        shared.builder.clear();
        shared.last_applied = self.next_ticket.load(Ordering::SeqCst) - 1;
    }

    pub fn has_route(&self) -> bool {
        self.lock().builder.has_route()
    }

    /// A copy of the current route, if any.
    pub fn snapshot(&self) -> Option<RouteResult> {
        self.lock().builder.result().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SharedState> {
        // A poisoned lock still holds a consistent state: results are only
        // swapped in after they are fully built.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
