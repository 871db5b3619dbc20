use std::ops::Range;
use std::sync::Arc;

use itertools::Itertools as _;

use crate::geometry::{Aabb, FloatType, Ray, WorldPoint};
use crate::scene::{first_boundary_in, Face, HitRange, HitRecord, Hittable, HittableVolume};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Union,
    Intersection,
    /// First operand minus all the following ones.
    Subtract,
}

/// Boolean composition of volumes, folded left to right over pairwise merges
/// of the operands' sorted boundary lists.
#[derive(Clone)]
pub struct Composition {
    operation: Operation,
    items: Vec<Arc<dyn HittableVolume>>,
    bounding_box: Aabb,
}

impl Composition {
    pub fn new(operation: Operation, items: Vec<Arc<dyn HittableVolume>>) -> Composition {
        assert!(!items.is_empty());
        let mut bounding_box = Aabb::empty();
        for item in &items {
            bounding_box.add_box(&item.bounding_box());
        }
        Composition {
            operation,
            items,
            bounding_box,
        }
    }
}

impl Hittable for Composition {
    fn center(&self) -> WorldPoint {
        self.bounding_box.center()
    }

    fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        first_boundary_in(self.hits(ray, time), &range)
    }
}

impl HittableVolume for Composition {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange> {
        let mut ranges = self.items[0].hits(ray, time);
        for item in &self.items[1..] {
            let next = item.hits(ray, time);
            ranges = match self.operation {
                Operation::Union => merge_union(ranges, next),
                Operation::Intersection => merge_intersection(ranges, next),
                Operation::Subtract => merge_difference(ranges, next),
            };
        }
        ranges
    }
}

/// The boundaries of two sorted range lists merged into one stream ordered by
/// ascending `t`, each tagged with whether it came from the right list. Ties
/// yield the right boundary first.
fn boundaries(
    lhs: Vec<HitRange>,
    rhs: Vec<HitRange>,
) -> impl Iterator<Item = (HitRecord, bool)> {
    let split = |ranges: Vec<HitRange>, is_right| {
        ranges
            .into_iter()
            .flat_map(move |r| [(r.entry, is_right), (r.exit, is_right)])
    };
    split(lhs, false).merge_by(split(rhs, true), |a, b| a.0.t < b.0.t)
}

fn merge_union(lhs: Vec<HitRange>, rhs: Vec<HitRange>) -> Vec<HitRange> {
    let mut result = Vec::new();
    let mut entry: Option<HitRecord> = None;
    let mut depth: i32 = 0;
    for (hit, _) in boundaries(lhs, rhs) {
        if hit.face == Face::Front {
            if entry.is_none() {
                entry = Some(hit);
            }
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                result.push(HitRange::new(entry.take().unwrap(), hit));
            }
        }
    }
    result
}

fn merge_intersection(lhs: Vec<HitRange>, rhs: Vec<HitRange>) -> Vec<HitRange> {
    let mut result = Vec::new();
    let mut entry: Option<HitRecord> = None;
    let mut depth: i32 = 0;
    for (hit, _) in boundaries(lhs, rhs) {
        if hit.face == Face::Front {
            depth += 1;
            if depth == 2 {
                entry = Some(hit);
            }
        } else {
            if depth == 2 {
                result.push(HitRange::new(entry.take().unwrap(), hit));
            }
            depth -= 1;
        }
    }
    result
}

/// Left minus right. A boundary keeps the inside on the same side when it
/// comes from the left, and flips it when it comes from the right; right
/// boundaries recorded in the result are face-inverted, since the entering
/// surface of a subtracted volume is an exiting surface of the difference.
fn merge_difference(lhs: Vec<HitRange>, rhs: Vec<HitRange>) -> Vec<HitRange> {
    let mut result = Vec::new();
    let mut entry: Option<HitRecord> = None;
    let mut depth: i32 = 0;
    for (hit, is_right) in boundaries(lhs, rhs) {
        if (hit.face == Face::Front) != is_right {
            depth += 1;
        } else {
            depth -= 1;
        }
        if depth == 1 {
            entry = Some(if is_right { hit.inverted() } else { hit });
        } else if let Some(e) = entry.take() {
            let exit = if is_right { hit.inverted() } else { hit };
            // Coincident boundaries (subtracting a volume from itself) open
            // and close at the same parameter; such zero-width slivers are
            // not part of the difference.
            if e.t < exit.t {
                result.push(HitRange::new(e, exit));
            }
        }
    }
    result
}
