//! Lane centre-line derivation.

use sd_core::geo::{line_intersection, side_point};
use sd_core::{Cm, CoreResult, Point};

/// Lateral offset of each lane's centre line from the median of a road
/// `width` cm wide, positive to the left.  Lane `0` is the leftmost.
pub fn lane_center_offsets(width: Cm, lane_widths: &[Cm]) -> Vec<f64> {
    let half_width = width as f64 / 2.0;
    let mut before = 0.0;
    lane_widths
        .iter()
        .map(|&w| {
            let offset = half_width - (before + w as f64 / 2.0);
            before += w as f64;
            offset
        })
        .collect()
}

/// Shift `median` sideways by `magnitude` cm (positive = left).
///
/// Interior points are the intersections of the shifted neighbouring
/// stretches, so corners stay sharp; collinear neighbours fall back to a
/// plain perpendicular shift.
pub fn offset_polyline(median: &[Point], magnitude: f64) -> CoreResult<Vec<Point>> {
    if magnitude == 0.0 || median.len() < 2 {
        return Ok(median.to_vec());
    }
    let n = median.len();
    let mut out = Vec::with_capacity(n);

    out.push(side_point(median[0], median[1], magnitude)?);

    for k in 1..n - 1 {
        let (prev, cur, next) = (median[k - 1], median[k], median[k + 1]);
        let a1 = side_point(prev, cur, magnitude)?;
        let a2 = side_point(cur, prev, -magnitude)?;
        let b1 = side_point(cur, next, magnitude)?;
        let b2 = side_point(next, cur, -magnitude)?;
        match line_intersection(a1, a2, b1, b2) {
            Some(p) => out.push(p),
            None => out.push(b1),
        }
    }

    out.push(side_point(median[n - 1], median[n - 2], -magnitude)?);
    Ok(out)
}
