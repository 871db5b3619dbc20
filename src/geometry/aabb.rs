use std::ops::Range;

use crate::geometry::{FloatType, Ray, WorldPoint, WorldVector};

/// Axis-aligned bounding box, grown by accumulating points and boxes.
///
/// The empty box keeps `min` at `+∞` and `max` at `-∞` on every axis, so the
/// first accumulated point snaps both corners onto itself.
#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl Aabb {
    pub fn empty() -> Aabb {
        let inf = FloatType::INFINITY;
        Aabb {
            min: WorldPoint::new(inf, inf, inf),
            max: WorldPoint::new(-inf, -inf, -inf),
        }
    }

    pub fn new(a: WorldPoint, b: WorldPoint) -> Aabb {
        let mut result = Aabb::empty();
        result.add_point(&a);
        result.add_point(&b);
        result
    }

    pub fn from_points(points: impl IntoIterator<Item = WorldPoint>) -> Option<Aabb> {
        let mut result = Aabb::empty();
        let mut any = false;
        for p in points {
            result.add_point(&p);
            any = true;
        }
        any.then_some(result)
    }

    pub fn add_point(&mut self, point: &WorldPoint) {
        self.min = self.min.coords.inf(&point.coords).into();
        self.max = self.max.coords.sup(&point.coords).into();
    }

    pub fn add_box(&mut self, other: &Aabb) {
        self.add_point(&other.min);
        self.add_point(&other.max);
    }

    pub fn union(mut self, other: &Aabb) -> Aabb {
        self.add_box(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn center(&self) -> WorldPoint {
        ((self.min.coords + self.max.coords) / 2.0).into()
    }

    pub fn size(&self) -> WorldVector {
        self.max - self.min
    }

    /// Index of the axis along which the box is widest.
    pub fn longest_axis(&self) -> usize {
        self.size().imax()
    }

    pub fn translated(&self, offset: &WorldVector) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn contains(&self, point: &WorldPoint, threshold: FloatType) -> bool {
        (0..3).all(|axis| {
            self.min[axis] - threshold <= point[axis] && point[axis] <= self.max[axis] + threshold
        })
    }

    /// Slab test. Returns the parameter interval in which the ray is inside
    /// the box, or `None` if it misses.
    ///
    /// An axis whose slab distances come out non-finite (ray parallel to the
    /// slab, or origin on its boundary) does not constrain the interval.
    pub fn hit(&self, ray: &Ray) -> Option<Range<FloatType>> {
        let mut entry = -FloatType::INFINITY;
        let mut exit = FloatType::INFINITY;
        for axis in 0..3 {
            let t1 = (self.min[axis] - ray.origin[axis]) / ray.direction[axis];
            let t2 = (self.max[axis] - ray.origin[axis]) / ray.direction[axis];
            if t1.is_finite() && t2.is_finite() {
                entry = entry.max(t1.min(t2));
                exit = exit.min(t1.max(t2));
            }
        }
        (entry < exit).then(|| entry..exit)
    }

    /// The eight corners, min corner first.
    pub fn corners(&self) -> [WorldPoint; 8] {
        std::array::from_fn(|i| {
            WorldPoint::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            )
        })
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}
