use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::asset::{Asset, Interval};

// ---------------------------------------------------------------------------
// PricePoint: One observation per interval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    /// Closing price; this is the "price" plotted and filtered on.
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }

    /// Absolute open/close difference.
    pub fn spread(&self) -> f64 {
        (self.open - self.close).abs()
    }
}

// ---------------------------------------------------------------------------
// Series: Date-ordered points for a single asset and interval
// ---------------------------------------------------------------------------

/// Price points for one asset at one interval, sorted ascending by date with
/// at most one point per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    asset: Asset,
    interval: Interval,
    points: Vec<PricePoint>,
}

impl Series {
    /// Build a series from points in any order.
    ///
    /// Points are stably sorted by date. When several points share a date the
    /// one that came last in `points` is kept.
    pub fn new(asset: Asset, interval: Interval, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self {
            asset,
            interval,
            points: deduped,
        }
    }

    pub fn empty(asset: Asset, interval: Interval) -> Self {
        Self::from_sorted(asset, interval, Vec::new())
    }

    /// Caller guarantees `points` already satisfy the ordering invariant.
    pub(crate) fn from_sorted(asset: Asset, interval: Interval, points: Vec<PricePoint>) -> Self {
        Self {
            asset,
            interval,
            points,
        }
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last date covered, or `None` for an empty series.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ---------------------------------------------------------------------------
// Statistics: Aggregates over a (filtered) series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub lowest_price: f64,
    pub highest_price: f64,
    pub average_spread: f64,
    pub largest_spread: f64,
    pub data_points: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}
