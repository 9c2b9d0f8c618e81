//! Axis-aligned boxes and the overlap test between a road stretch and a box.

use sd_core::geo::segment_distance;
use sd_core::{Cm, Point};

/// Axis-aligned bounding box with inclusive bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}

impl Aabb {
    /// Box spanned by two arbitrary corners.
    pub fn of_points(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Box centred on `center` extending `half_width` / `half_height` each way.
    pub fn around(center: Point, half_width: Cm, half_height: Cm) -> Self {
        Self {
            min: Point::new(center.x - half_width, center.y - half_height),
            max: Point::new(center.x + half_width, center.y + half_height),
        }
    }

    /// Grow by `by` on every side.
    pub fn expand(self, by: Cm) -> Self {
        Self {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// `true` if `other` lies wholly inside `self`.
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Corners in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// Euclidean distance from `p` to the box (0 inside).
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = gap(p.x, p.x, self.min.x, self.max.x) as f64;
        let dy = gap(p.y, p.y, self.min.y, self.max.y) as f64;
        dx.hypot(dy)
    }

    /// `true` if the segment `a`–`b` passes through the box (Liang–Barsky).
    pub fn clips_segment(&self, a: Point, b: Point) -> bool {
        if self.contains_point(a) || self.contains_point(b) {
            return true;
        }
        let dx = (b.x - a.x) as f64;
        let dy = (b.y - a.y) as f64;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        let edges = [
            (-dx, (a.x - self.min.x) as f64),
            (dx, (self.max.x - a.x) as f64),
            (-dy, (a.y - self.min.y) as f64),
            (dy, (self.max.y - a.y) as f64),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return false;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return false;
                }
                t1 = t1.min(r);
            }
        }
        t0 <= t1
    }
}

/// Distance between the closed intervals `[lo1, hi1]` and `[lo2, hi2]`.
#[inline]
fn gap(lo1: Cm, hi1: Cm, lo2: Cm, hi2: Cm) -> Cm {
    (lo2 - hi1).max(lo1 - hi2).max(0)
}

/// Does the stretch `a`–`b`, widened by `half_width` on each side, touch
/// `rect`?
///
/// Broad phase: the stretch's expanded bounding box must meet `rect`.
/// Narrow phase: the midline crosses `rect`; or, for axis-parallel
/// stretches, the gap between midline and box is within `half_width`; or
/// some box corner or stretch end lies within `half_width` of the other
/// shape.
pub fn stretch_touches(rect: &Aabb, a: Point, b: Point, half_width: Cm) -> bool {
    let bounds = Aabb::of_points(a, b).expand(half_width);
    if !bounds.intersects(rect) {
        return false;
    }
    if rect.clips_segment(a, b) {
        return true;
    }

    let hw = half_width as f64;
    if a.x == b.x || a.y == b.y {
        let gx = gap(a.x.min(b.x), a.x.max(b.x), rect.min.x, rect.max.x) as f64;
        let gy = gap(a.y.min(b.y), a.y.max(b.y), rect.min.y, rect.max.y) as f64;
        return gx.hypot(gy) <= hw;
    }

    rect.corners().iter().any(|&c| segment_distance(c, a, b) <= hw)
        || rect.distance_to(a) <= hw
        || rect.distance_to(b) <= hw
}
