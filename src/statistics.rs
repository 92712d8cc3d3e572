//! Summary statistics over a series.

use crate::models::{Series, Statistics};

/// Aggregate a series in one pass.
///
/// Returns `None` for an empty series rather than zeroed statistics.
pub fn aggregate(series: &Series) -> Option<Statistics> {
    let mut points = series.iter();
    let first = points.next()?;

    let mut lowest = first.close;
    let mut highest = first.close;
    let mut spread_sum = first.spread();
    let mut largest_spread = first.spread();
    let mut last_date = first.date;
    let mut count = 1usize;

    for p in points {
        let spread = p.spread();
        lowest = lowest.min(p.close);
        highest = highest.max(p.close);
        spread_sum += spread;
        largest_spread = largest_spread.max(spread);
        last_date = p.date;
        count += 1;
    }

    Some(Statistics {
        lowest_price: lowest,
        highest_price: highest,
        average_spread: spread_sum / count as f64,
        largest_spread,
        data_points: count,
        first_date: first.date,
        last_date,
    })
}
