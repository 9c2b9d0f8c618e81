//! Planar coordinates and the geometry helpers used by lane derivation, the
//! grid index and the graph builder.
//!
//! Coordinates are integer centimetres.  Equality is exact; any tolerance is
//! applied explicitly by the caller.  Intermediate arithmetic that can
//! overflow `i64` (cross products, squared lengths) runs in `i128`.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Length in centimetres.
pub type Cm = i64;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A planar point in centimetres.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Cm,
    pub y: Cm,
}

impl Point {
    #[inline]
    pub const fn new(x: Cm, y: Cm) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Exact.
    #[inline]
    pub fn distance_sq(self, other: Point) -> i128 {
        let dx = (other.x - self.x) as i128;
        let dy = (other.y - self.y) as i128;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// Euclidean distance rounded to the nearest centimetre.
    #[inline]
    pub fn distance_cm(self, other: Point) -> Cm {
        self.distance(other).round() as Cm
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    /// `true` if both coordinates differ by strictly less than `tolerance`.
    #[inline]
    pub fn close_to(self, other: Point, tolerance: Cm) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }

    fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + ((other.x - self.x) as f64 * t).round() as Cm,
            self.y + ((other.y - self.y) as f64 * t).round() as Cm,
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Side ──────────────────────────────────────────────────────────────────────

/// Which side of a directed line a point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

/// Side of `p` relative to the directed line `a → b`.  Points exactly on
/// the line count as `Left`.
pub fn side_of(p: Point, a: Point, b: Point) -> Side {
    if cross(a, b, p) >= 0 { Side::Left } else { Side::Right }
}

/// z-component of `(b - a) × (p - a)`.
#[inline]
fn cross(a: Point, b: Point, p: Point) -> i128 {
    let abx = (b.x - a.x) as i128;
    let aby = (b.y - a.y) as i128;
    let apx = (p.x - a.x) as i128;
    let apy = (p.y - a.y) as i128;
    abx * apy - aby * apx
}

// ── Offsets ───────────────────────────────────────────────────────────────────

/// The point `magnitude` cm perpendicular to `origin → toward`, measured from
/// `origin`.  Positive magnitudes go to the left of the direction of travel.
///
/// Fails when `origin == toward`, since no direction exists.
pub fn side_point(origin: Point, toward: Point, magnitude: f64) -> CoreResult<Point> {
    let dx = (toward.x - origin.x) as f64;
    let dy = (toward.y - origin.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return Err(CoreError::DegenerateLine(origin));
    }
    Ok(Point::new(
        origin.x + (-dy / len * magnitude).round() as Cm,
        origin.y + (dx / len * magnitude).round() as Cm,
    ))
}

/// Intersection of the infinite lines through `a1, a2` and `b1, b2`.
///
/// Returns `None` for parallel (or coincident) lines.
pub fn line_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let (x1, y1, x2, y2) = (a1.x as i128, a1.y as i128, a2.x as i128, a2.y as i128);
    let (x3, y3, x4, y4) = (b1.x as i128, b1.y as i128, b2.x as i128, b2.y as i128);

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom == 0 {
        return None;
    }
    let a = x1 * y2 - y1 * x2;
    let b = x3 * y4 - y3 * x4;
    let px = (a * (x3 - x4) - (x1 - x2) * b) as f64 / denom as f64;
    let py = (a * (y3 - y4) - (y1 - y2) * b) as f64 / denom as f64;
    Some(Point::new(px.round() as Cm, py.round() as Cm))
}

// ── Distances to lines ────────────────────────────────────────────────────────

/// Projection parameter of `p` onto `a → b` (0 at `a`, 1 at `b`), or `None`
/// for a zero-length line.
fn projection_t(p: Point, a: Point, b: Point) -> Option<f64> {
    let len_sq = a.distance_sq(b);
    if len_sq == 0 {
        return None;
    }
    let dot = (p.x - a.x) as i128 * (b.x - a.x) as i128
        + (p.y - a.y) as i128 * (b.y - a.y) as i128;
    Some(dot as f64 / len_sq as f64)
}

/// Perpendicular distance from `p` to the line through `a, b`.
///
/// Returns `None` when the foot of the perpendicular falls outside the
/// closed segment `[a, b]`, or when `a == b`.
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> Option<f64> {
    let t = projection_t(p, a, b)?;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(cross(a, b, p).abs() as f64 / a.distance(b))
}

/// Distance from `p` to the closed segment `[a, b]` (clamped to the ends).
pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    match projection_t(p, a, b) {
        None => p.distance(a),
        Some(t) if t <= 0.0 => p.distance(a),
        Some(t) if t >= 1.0 => p.distance(b),
        Some(_) => cross(a, b, p).abs() as f64 / a.distance(b),
    }
}

// ── Polylines ─────────────────────────────────────────────────────────────────

/// Sum of stretch lengths, rounded to the nearest centimetre.
pub fn polyline_length(points: &[Point]) -> Cm {
    points
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .sum::<f64>()
        .round() as Cm
}

/// The point `offset` cm along `points`, clamped to the polyline's ends.
///
/// Returns `None` for an empty polyline.
pub fn point_along(points: &[Point], offset: Cm) -> Option<Point> {
    let first = *points.first()?;
    if offset <= 0 {
        return Some(first);
    }
    let mut remaining = offset as f64;
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if remaining <= len {
            if len == 0.0 {
                return Some(w[0]);
            }
            return Some(w[0].lerp(w[1], remaining / len));
        }
        remaining -= len;
    }
    points.last().copied()
}

/// Offset along `points` of the closest point to `p`.
///
/// Returns `None` when the polyline has no stretch of non-zero length.
pub fn offset_along(points: &[Point], p: Point) -> Option<Cm> {
    let mut best: Option<(f64, f64)> = None; // (distance, offset)
    let mut travelled = 0.0;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = a.distance(b);
        if let Some(t) = projection_t(p, a, b) {
            let t = t.clamp(0.0, 1.0);
            let d = p.distance(a.lerp(b, t));
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, travelled + t * len));
            }
        }
        travelled += len;
    }
    best.map(|(_, offset)| offset.round() as Cm)
}
