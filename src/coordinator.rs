//! Query coordinator: owns the selection and decides between re-fetching and
//! re-filtering.
//!
//! The coordinator never talks to a provider itself. Operations that need new
//! data return [`Reaction::Fetch`] with a [`FetchTicket`]; the caller runs the
//! provider and hands the outcome back through
//! [`complete_fetch`](QueryCoordinator::complete_fetch). Only the most recently
//! issued ticket is honored, so a slow response for an abandoned selection
//! can never overwrite the view.
//!
//! | state     | event                                   | next      |
//! |-----------|-----------------------------------------|-----------|
//! | `Idle`    | asset selected                          | `Loading` |
//! | `Loading` | current ticket succeeds                 | `Ready`   |
//! | `Loading` | current ticket fails                    | `Error`   |
//! | `Ready`   | asset or interval changes               | `Loading` |
//! | `Ready`   | date/price bounds change                | `Ready`   |
//! | `Error`   | an asset is (re-)selected               | `Loading` |
//! | any       | selection cleared                       | `Idle`    |

use std::fmt;

use chrono::{Days, Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DashboardError, Result};
use crate::models::{Asset, Effect, FilteredView, Interval, Selection, Series, Status};
use crate::normalizer::normalize_payload;
use crate::request::ProviderRequest;
use crate::view::project;

/// Supplies "today" for quick ranges without an end date.
pub type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// One issued provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub id: u64,
    pub request: ProviderRequest,
}

/// What an operation did, and whether the caller must now call the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// The selection did not change.
    Unchanged,
    /// The selection changed but there is no series to re-filter yet.
    Updated,
    /// The view was recomputed from the held series.
    Refiltered,
    /// A provider call must be made for this ticket.
    Fetch(FetchTicket),
    /// Back to idle.
    Cleared,
}

impl Reaction {
    pub fn ticket(&self) -> Option<&FetchTicket> {
        match self {
            Reaction::Fetch(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// Result of handing a provider outcome back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The series was installed and the view published.
    Applied,
    /// The current fetch failed; the coordinator is in `Error`.
    Failed(String),
    /// The ticket was superseded or abandoned; nothing changed.
    Discarded,
}

pub struct QueryCoordinator {
    selection: Selection,
    status: Status,
    series: Option<Series>,
    view: Option<FilteredView>,
    in_flight: Option<FetchTicket>,
    next_ticket: u64,
    clock: Clock,
}

impl Default for QueryCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCoordinator {
    /// Create an idle coordinator using the local date for quick ranges.
    pub fn new() -> Self {
        Self::with_clock(Box::new(|| Local::now().date_naive()))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            selection: Selection::default(),
            status: Status::Idle,
            series: None,
            view: None,
            in_flight: None,
            next_ticket: 1,
            clock,
        }
    }

    // -- Read side ---------------------------------------------------------

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Latest projection. Only present while `Ready`.
    pub fn view(&self) -> Option<&FilteredView> {
        self.view.as_ref()
    }

    /// Unfiltered series for the current selection, if held.
    pub fn series(&self) -> Option<&Series> {
        self.series.as_ref()
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    // -- Selection inputs --------------------------------------------------

    /// Select an asset. Re-selecting the current asset after a failed fetch
    /// retries it.
    pub fn select_asset(&mut self, asset: Asset) -> Reaction {
        if matches!(self.status, Status::Error(_)) && self.selection.asset == Some(asset) {
            return self.begin_fetch();
        }
        let next = self.selection.with_asset(Some(asset));
        self.transition(next)
    }

    pub fn set_interval(&mut self, interval: Interval) -> Reaction {
        let next = self.selection.with_interval(interval);
        self.transition(next)
    }

    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Reaction> {
        let next = self.selection.with_date_range(start, end)?;
        Ok(self.transition(next))
    }

    pub fn set_price_range(&mut self, min: Option<f64>, max: Option<f64>) -> Result<Reaction> {
        let next = self.selection.with_price_range(min, max)?;
        Ok(self.transition(next))
    }

    /// Show the last `days` days ending at the selected end date, or at today
    /// when no end date is set. The end date itself is left as it was.
    pub fn apply_quick_range(&mut self, days: u32) -> Result<Reaction> {
        let anchor = self.selection.end_date.unwrap_or_else(|| (self.clock)());
        let start = anchor
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                DashboardError::InvalidArgument(format!(
                    "{} days before {} is out of range",
                    days, anchor
                ))
            })?;
        let next = self
            .selection
            .with_date_range(Some(start), self.selection.end_date)?;
        Ok(self.transition(next))
    }

    /// Deselect the asset: drop the series, the bounds and the view.
    /// The interval is kept.
    pub fn clear_selection(&mut self) -> Reaction {
        if let Some(ticket) = self.in_flight.take() {
            debug!(ticket = ticket.id, "abandoning in-flight fetch");
        }
        self.selection = self.selection.cleared();
        self.series = None;
        self.view = None;
        self.status = Status::Idle;
        info!("selection cleared");
        Reaction::Cleared
    }

    /// Fetch the current selection again.
    pub fn refresh(&mut self) -> Reaction {
        self.begin_fetch()
    }

    // -- Provider outcomes -------------------------------------------------

    /// Deliver the outcome of a provider call.
    ///
    /// Outcomes for anything but the current in-flight ticket are discarded.
    pub fn complete_fetch(&mut self, ticket_id: u64, result: Result<Value>) -> FetchOutcome {
        let ticket = match self.in_flight.take() {
            Some(t) if t.id == ticket_id => t,
            other => {
                debug!(
                    ticket = ticket_id,
                    current = other.as_ref().map(|t| t.id),
                    "discarding response for superseded fetch"
                );
                self.in_flight = other;
                return FetchOutcome::Discarded;
            }
        };

        let asset = ticket.request.asset();
        let interval = ticket.request.interval();
        match result.and_then(|payload| normalize_payload(&payload, asset, interval)) {
            Ok(series) => {
                info!(%asset, %interval, points = series.len(), "series ready");
                self.view = Some(project(&series, &self.selection));
                self.series = Some(series);
                self.status = Status::Ready;
                FetchOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                warn!(%asset, %interval, error = %message, "fetch failed");
                self.series = None;
                self.view = None;
                self.status = Status::Error(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    // -- Internals ---------------------------------------------------------

    fn transition(&mut self, next: Selection) -> Reaction {
        let changed = self.selection.changed_fields(&next);
        let Some(effect) = changed.iter().map(|f| f.effect()).max() else {
            return Reaction::Unchanged;
        };
        debug!(?changed, ?effect, "selection changed");
        self.selection = next;

        match effect {
            Effect::Refetch => self.begin_fetch(),
            Effect::Refilter => self.republish(),
        }
    }

    fn republish(&mut self) -> Reaction {
        match (&self.status, &self.series) {
            (Status::Ready, Some(series)) => {
                self.view = Some(project(series, &self.selection));
                Reaction::Refiltered
            }
            _ => Reaction::Updated,
        }
    }

    fn begin_fetch(&mut self) -> Reaction {
        let Some(request) = ProviderRequest::for_selection(&self.selection) else {
            return Reaction::Updated;
        };

        let ticket = FetchTicket {
            id: self.next_ticket,
            request,
        };
        self.next_ticket += 1;

        if let Some(previous) = self.in_flight.replace(ticket.clone()) {
            debug!(superseded = previous.id, ticket = ticket.id, "superseding in-flight fetch");
        }
        self.series = None;
        self.view = None;
        self.status = Status::Loading;
        info!(
            ticket = ticket.id,
            asset = %ticket.request.asset(),
            interval = %ticket.request.interval(),
            "fetch issued"
        );
        Reaction::Fetch(ticket)
    }
}

impl fmt::Debug for QueryCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCoordinator")
            .field("selection", &self.selection)
            .field("status", &self.status)
            .field("series_len", &self.series.as_ref().map(Series::len))
            .field("in_flight", &self.in_flight.as_ref().map(|t| t.id))
            .finish()
    }
}
