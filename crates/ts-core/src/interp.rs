//! Piecewise-linear interpolation over sorted sample tables.
//!
//! Shared by heat-pipe conductance curves (G vs average temperature)
//! and time-varying heat loads (W vs time). Tables are sorted by the
//! abscissa; lookups outside the table clamp to the endpoint values.

/// Interpolate a table of records at `x`, projecting each record to an
/// `(abscissa, ordinate)` pair with `key`.
///
/// Returns `None` for an empty table so callers can decide what an
/// empty curve means (heat pipes treat it as zero conductance and log
/// a diagnostic). Lookup is a binary search on the abscissa.
pub fn piecewise_linear_by<T>(points: &[T], x: f64, key: impl Fn(&T) -> (f64, f64)) -> Option<f64> {
    let (first_x, first_y) = key(points.first()?);
    if x <= first_x {
        return Some(first_y);
    }
    let (last_x, last_y) = key(points.last()?);
    if x >= last_x {
        return Some(last_y);
    }

    // Index of the first sample strictly above x; the bracket is [hi-1, hi].
    let hi = points.partition_point(|p| key(p).0 <= x);
    let (x0, y0) = key(&points[hi - 1]);
    let (x1, y1) = key(&points[hi]);
    if x1 == x0 {
        return Some(y0);
    }
    let frac = (x - x0) / (x1 - x0);
    Some(y0 + frac * (y1 - y0))
}
