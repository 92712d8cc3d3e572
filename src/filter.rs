//! Inclusive date and price range filtering.

use crate::models::{DateRange, PriceRange, Series};

/// Keep the points whose date lies in `dates` and whose closing price lies in
/// `prices`. All bounds are inclusive and an absent bound does not constrain.
///
/// The input is left untouched and the surviving points keep their order.
pub fn filter(series: &Series, dates: &DateRange, prices: &PriceRange) -> Series {
    let points = series
        .iter()
        .filter(|p| dates.contains(p.date) && prices.contains(p.close))
        .copied()
        .collect();
    Series::from_sorted(series.asset(), series.interval(), points)
}
