use std::ops::Range;

use crate::geometry::{Aabb, FloatType, Ray, Transform, WorldPoint};
use crate::scene::{HitRange, HitRecord, Hittable, HittableConvexVolume, HittableVolume};

/// A volume placed rigidly somewhere else: queries are mapped into the base's
/// local frame through the inverse transform, and the resulting hits are
/// mapped back out. The ray direction is not re-normalized, so `t` values are
/// valid in both frames.
#[derive(Clone)]
pub struct Transformed<Base> {
    transform: Transform,
    inverse: Transform,
    base: Base,
}

impl<Base> Transformed<Base> {
    pub fn new(transform: Transform, base: Base) -> Transformed<Base> {
        Transformed {
            transform,
            inverse: transform.inverse(),
            base,
        }
    }
}

impl<Base: HittableVolume> Hittable for Transformed<Base> {
    fn center(&self) -> WorldPoint {
        self.bounding_box().center()
    }

    fn bounding_box(&self) -> Aabb {
        let box_ = self.base.bounding_box();
        if self.transform.is_identity_rotation() {
            box_.translated(&self.transform.translation)
        } else {
            let mut result = Aabb::empty();
            for corner in box_.corners() {
                result.add_point(&self.transform.transform_point(&corner));
            }
            result
        }
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        let local_ray = self.inverse.transform_ray(ray);
        let mut hit = self.base.hit(&local_ray, time, range)?;
        hit.apply(&self.transform);
        Some(hit)
    }
}

impl<Base: HittableVolume> HittableVolume for Transformed<Base> {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange> {
        let local_ray = self.inverse.transform_ray(ray);
        let mut hits = self.base.hits(&local_ray, time);
        for range in &mut hits {
            range.apply(&self.transform);
        }
        hits
    }
}

impl<Base: HittableConvexVolume> HittableConvexVolume for Transformed<Base> {
    fn hit_range(&self, ray: &Ray, time: FloatType) -> Option<HitRange> {
        let local_ray = self.inverse.transform_ray(ray);
        let mut range = self.base.hit_range(&local_ray, time)?;
        range.apply(&self.transform);
        Some(range)
    }
}

/// A volume that moves from its rest pose (time 0) to the full target
/// placement (time 1) during the shutter interval. Each query evaluates the
/// instantaneous placement `transform.pow(time)`; rays sampled at random
/// times therefore see the object at different positions, which is what
/// produces the blur.
#[derive(Clone)]
pub struct MotionBlur<Base> {
    transform: Transform,
    base: Base,
}

impl<Base> MotionBlur<Base> {
    pub fn new(transform: Transform, base: Base) -> MotionBlur<Base> {
        MotionBlur { transform, base }
    }
}

impl<Base: HittableVolume + Clone> MotionBlur<Base> {
    fn at_time(&self, time: FloatType) -> Transformed<Base> {
        Transformed::new(self.transform.pow(time), self.base.clone())
    }
}

impl<Base: HittableVolume + Clone> Hittable for MotionBlur<Base> {
    fn center(&self) -> WorldPoint {
        self.bounding_box().center()
    }

    /// Covers the whole swept volume, not just the endpoint poses: every
    /// corner of the base box contributes its full path over the shutter.
    fn bounding_box(&self) -> Aabb {
        let box_ = self.base.bounding_box();
        let mut result = Aabb::empty();
        if self.transform.is_identity_rotation() {
            result.add_box(&box_);
            result.add_box(&box_.translated(&self.transform.translation));
        } else {
            for corner in box_.corners() {
                result.add_box(&self.transform.swept_bounding_box(&corner));
            }
        }
        result
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        self.at_time(time).hit(ray, time, range)
    }
}

impl<Base: HittableVolume + Clone> HittableVolume for MotionBlur<Base> {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange> {
        self.at_time(time).hits(ray, time)
    }
}

impl<Base: HittableConvexVolume + Clone> HittableConvexVolume for MotionBlur<Base> {
    fn hit_range(&self, ray: &Ray, time: FloatType) -> Option<HitRange> {
        self.at_time(time).hit_range(ray, time)
    }
}
