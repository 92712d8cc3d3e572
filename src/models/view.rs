use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::price::{Series, Statistics};

// ---------------------------------------------------------------------------
// Status: Coordinator lifecycle as seen by the renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum Status {
    /// No asset selected.
    Idle,
    /// A provider call is in flight.
    Loading,
    /// A series for the current selection is held and projected.
    Ready,
    /// The last provider call failed.
    Error(String),
}

impl Status {
    pub fn is_ready(&self) -> bool {
        matches!(self, Status::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("idle"),
            Status::Loading => f.write_str("loading"),
            Status::Ready => f.write_str("ready"),
            Status::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView: What the renderer draws
// ---------------------------------------------------------------------------

/// The filtered series and its statistics.
///
/// `statistics` is `None` when the filter left nothing, which is distinct
/// from statistics with a zero spread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    pub series: Series,
    pub statistics: Option<Statistics>,
    /// Date span of the unfiltered series the view was cut from.
    pub available: Option<(NaiveDate, NaiveDate)>,
}

impl FilteredView {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
