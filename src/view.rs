//! Projection of a held series through the current selection.

use crate::filter::filter;
use crate::models::{FilteredView, Selection, Series};
use crate::statistics::aggregate;

/// Filter `series` by the selection's bounds and aggregate the result.
pub fn project(series: &Series, selection: &Selection) -> FilteredView {
    let filtered = filter(series, &selection.date_range(), &selection.price_range());
    let statistics = aggregate(&filtered);
    FilteredView {
        series: filtered,
        statistics,
        available: series.date_span(),
    }
}
