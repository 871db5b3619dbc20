use std::ops::Range;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::geometry::{Aabb, FloatType, Ray, WorldPoint};
use crate::scene::{HitRecord, Hittable};

/// Binary bounding volume hierarchy over scene objects.
///
/// Built once by recursive median split on the longest axis of the items'
/// union box; balanced by count, not by volume. Traversal prunes subtrees
/// whose box the ray misses and tightens the search range with the best hit
/// found so far, so the result is exactly the nearest hit the brute-force
/// scan would return.
pub struct BoundingVolumeNode {
    bounding_box: Aabb,
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
}

impl BoundingVolumeNode {
    pub fn new(mut items: Vec<Arc<dyn Hittable>>) -> BoundingVolumeNode {
        assert!(items.len() >= 2);
        let mut bounding_box = Aabb::empty();
        for item in &items {
            bounding_box.add_box(&item.bounding_box());
        }

        let axis = bounding_box.longest_axis();
        items.sort_by_key(|item| OrderedFloat(item.center()[axis]));

        let mid = items.len().div_ceil(2);
        let tail = items.split_off(mid);
        let left = Self::subtree(items);
        let right = Self::subtree(tail);

        BoundingVolumeNode {
            bounding_box,
            left,
            right,
        }
    }

    fn subtree(items: Vec<Arc<dyn Hittable>>) -> Arc<dyn Hittable> {
        if items.len() == 1 {
            items.into_iter().next().unwrap()
        } else {
            Arc::new(BoundingVolumeNode::new(items))
        }
    }
}

impl Hittable for BoundingVolumeNode {
    fn center(&self) -> WorldPoint {
        self.bounding_box.center()
    }

    fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        if self.bounding_box.hit(ray).is_none() {
            return None;
        }

        let left_hit = self.left.hit(ray, time, range.clone());
        let right_range = range.start..left_hit.as_ref().map_or(range.end, |hit| hit.t);
        let right_hit = self.right.hit(ray, time, right_range);
        right_hit.or(left_hit)
    }
}
