use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::asset::{Asset, Interval};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// DateRange / PriceRange: Inclusive, optionally open-ended bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |m| price >= m) && self.max.map_or(true, |m| price <= m)
    }
}

// ---------------------------------------------------------------------------
// SelectionField / Effect: Which fields force a provider round-trip
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionField {
    Asset,
    Interval,
    StartDate,
    EndDate,
    MinPrice,
    MaxPrice,
}

/// What a change to a selection field requires. Ordered so that the
/// strongest effect of a multi-field change is the `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Effect {
    /// Re-run the filter and aggregator over the series already held.
    Refilter,
    /// Ask the provider for a new series.
    Refetch,
}

impl SelectionField {
    pub const ALL: [SelectionField; 6] = [
        SelectionField::Asset,
        SelectionField::Interval,
        SelectionField::StartDate,
        SelectionField::EndDate,
        SelectionField::MinPrice,
        SelectionField::MaxPrice,
    ];

    /// Asset and interval change what the provider returns; the bounds only
    /// change which part of it is shown.
    pub fn effect(self) -> Effect {
        match self {
            SelectionField::Asset | SelectionField::Interval => Effect::Refetch,
            SelectionField::StartDate
            | SelectionField::EndDate
            | SelectionField::MinPrice
            | SelectionField::MaxPrice => Effect::Refilter,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection: The user's query and filter parameters
// ---------------------------------------------------------------------------

/// Current query/filter parameters.
///
/// Updates never mutate; each `with_*` returns the next selection so that a
/// sequence of changes can be replayed and diffed with
/// [`changed_fields`](Self::changed_fields).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub asset: Option<Asset>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub interval: Interval,
}

impl Selection {
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn price_range(&self) -> PriceRange {
        PriceRange::new(self.min_price, self.max_price)
    }

    pub fn with_asset(&self, asset: Option<Asset>) -> Self {
        Self {
            asset,
            ..self.clone()
        }
    }

    pub fn with_interval(&self, interval: Interval) -> Self {
        Self {
            interval,
            ..self.clone()
        }
    }

    /// Replace both date bounds. Fails if `start` is after `end`.
    pub fn with_date_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(DashboardError::InvalidArgument(format!(
                    "Start date {} is after end date {}",
                    s, e
                )));
            }
        }
        Ok(Self {
            start_date: start,
            end_date: end,
            ..self.clone()
        })
    }

    /// Replace both price bounds. Fails on NaN/infinite bounds or `min > max`.
    pub fn with_price_range(&self, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        for bound in [min, max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(DashboardError::InvalidArgument(format!(
                    "Price bound must be finite, got {}",
                    bound
                )));
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(DashboardError::InvalidArgument(format!(
                    "Minimum price {} is above maximum price {}",
                    lo, hi
                )));
            }
        }
        Ok(Self {
            min_price: min,
            max_price: max,
            ..self.clone()
        })
    }

    /// Drop the asset and all bounds, keeping the interval.
    pub fn cleared(&self) -> Self {
        Self {
            interval: self.interval,
            ..Self::default()
        }
    }

    /// Fields whose value differs between `self` and `other`.
    pub fn changed_fields(&self, other: &Selection) -> Vec<SelectionField> {
        SelectionField::ALL
            .into_iter()
            .filter(|field| match field {
                SelectionField::Asset => self.asset != other.asset,
                SelectionField::Interval => self.interval != other.interval,
                SelectionField::StartDate => self.start_date != other.start_date,
                SelectionField::EndDate => self.end_date != other.end_date,
                SelectionField::MinPrice => self.min_price != other.min_price,
                SelectionField::MaxPrice => self.max_price != other.max_price,
            })
            .collect()
    }
}
