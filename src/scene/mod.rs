pub mod bvh;
pub mod csg;
pub mod primitives;
pub mod transformed;

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::geometry::{Aabb, FloatType, Ray, TexturePoint, Transform, WorldPoint, WorldVector};
use crate::material::Material;

/// Which side of the surface the ray met, before the stored normal was
/// oriented against the ray. A dielectric reads this to tell entering a
/// medium apart from exiting it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

impl Face {
    pub fn inverted(self) -> Face {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

/// One surface crossing.
///
/// `normal` is always oriented against the incoming ray; `face` records
/// whether the geometric surface normal originally pointed against it
/// (`Front`) or along it (`Back`).
#[derive(Clone)]
pub struct HitRecord {
    pub t: FloatType,
    pub point: WorldPoint,
    pub normal: WorldVector,
    pub face: Face,
    pub material: Arc<dyn Material>,
    pub texture_coordinates: TexturePoint,
}

impl HitRecord {
    /// Builds a record from the geometric (outward) surface normal, flipping
    /// it against `ray_direction` and noting the original orientation.
    pub fn with_outward_normal(
        t: FloatType,
        point: WorldPoint,
        outward_normal: WorldVector,
        ray_direction: &WorldVector,
        material: Arc<dyn Material>,
        texture_coordinates: TexturePoint,
    ) -> HitRecord {
        let (normal, face) = if outward_normal.dot(ray_direction) > 0.0 {
            (-outward_normal, Face::Back)
        } else {
            (outward_normal, Face::Front)
        };
        HitRecord {
            t,
            point,
            normal,
            face,
            material,
            texture_coordinates,
        }
    }

    /// The same crossing seen as a boundary of the complement volume.
    pub fn inverted(mut self) -> HitRecord {
        self.face = self.face.inverted();
        self
    }

    pub fn apply(&mut self, transform: &Transform) {
        self.point = transform.transform_point(&self.point);
        self.normal = transform.transform_vector(&self.normal);
    }
}

impl fmt::Debug for HitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitRecord")
            .field("t", &self.t)
            .field("point", &self.point)
            .field("normal", &self.normal)
            .field("face", &self.face)
            .field("texture_coordinates", &self.texture_coordinates)
            .finish_non_exhaustive()
    }
}

/// One maximal parameter interval in which the ray is inside a volume.
#[derive(Clone, Debug)]
pub struct HitRange {
    pub entry: HitRecord,
    pub exit: HitRecord,
}

impl HitRange {
    /// Orders the two crossings by `t`.
    pub fn new(a: HitRecord, b: HitRecord) -> HitRange {
        if a.t <= b.t {
            HitRange { entry: a, exit: b }
        } else {
            HitRange { entry: b, exit: a }
        }
    }

    pub fn apply(&mut self, transform: &Transform) {
        self.entry.apply(transform);
        self.exit.apply(transform);
    }
}

/// Anything a ray can be traced against: reports its nearest crossing within
/// a parameter range.
pub trait Hittable: Send + Sync {
    fn center(&self) -> WorldPoint;
    fn bounding_box(&self) -> Aabb;
    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord>;
}

/// A closed volume: reports the full sorted, disjoint list of intervals in
/// which the ray is inside it. The nearest-crossing query of [`Hittable`] is
/// derived by scanning the boundaries in order.
pub trait HittableVolume: Hittable {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange>;
}

/// A convex volume: every ray is inside it in at most one interval, which
/// derives both coarser capabilities.
pub trait HittableConvexVolume: HittableVolume {
    fn hit_range(&self, ray: &Ray, time: FloatType) -> Option<HitRange>;
}

/// Derived [`Hittable::hit`] for volumes: the first interval boundary that
/// falls inside the query range.
pub(crate) fn first_boundary_in(
    ranges: impl IntoIterator<Item = HitRange>,
    range: &Range<FloatType>,
) -> Option<HitRecord> {
    for r in ranges {
        if range.contains(&r.entry.t) {
            return Some(r.entry);
        }
        if range.contains(&r.exit.t) {
            return Some(r.exit);
        }
    }
    None
}

/// Brute-force scene: linear scan with a shrinking search range. This is the
/// reference the accelerated tree is tested against.
impl Hittable for Vec<Arc<dyn Hittable>> {
    fn center(&self) -> WorldPoint {
        self.bounding_box().center()
    }

    fn bounding_box(&self) -> Aabb {
        let mut result = Aabb::empty();
        for item in self {
            result.add_box(&item.bounding_box());
        }
        result
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        let mut result: Option<HitRecord> = None;
        for item in self {
            let upper = result.as_ref().map_or(range.end, |hit| hit.t);
            if let Some(hit) = item.hit(ray, time, range.start..upper) {
                result = Some(hit);
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::material::test::TestMaterial;
    use assert2::assert;

    fn record(t: FloatType, outward: WorldVector, direction: WorldVector) -> HitRecord {
        HitRecord::with_outward_normal(
            t,
            WorldPoint::origin(),
            outward,
            &direction,
            TestMaterial::shared("record"),
            TexturePoint::origin(),
        )
    }

    #[test]
    fn outward_normal_opposing_the_ray_is_a_front_face() {
        let h = record(1.0, WorldVector::new(0.0, 0.0, -1.0), WorldVector::new(0.0, 0.0, 1.0));
        assert!(h.face == Face::Front);
        assert!(h.normal == WorldVector::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn outward_normal_along_the_ray_is_flipped_to_a_back_face() {
        let h = record(1.0, WorldVector::new(0.0, 0.0, 1.0), WorldVector::new(0.0, 0.0, 1.0));
        assert!(h.face == Face::Back);
        assert!(h.normal == WorldVector::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn inverted_flips_only_the_face() {
        let h = record(1.0, WorldVector::new(0.0, 0.0, -1.0), WorldVector::new(0.0, 0.0, 1.0));
        let inverted = h.clone().inverted();
        assert!(inverted.face == Face::Back);
        assert!(inverted.normal == h.normal);
    }

    #[test]
    fn hit_range_orders_by_t() {
        let near = record(1.0, WorldVector::new(0.0, 0.0, -1.0), WorldVector::new(0.0, 0.0, 1.0));
        let far = record(3.0, WorldVector::new(0.0, 0.0, 1.0), WorldVector::new(0.0, 0.0, 1.0));
        let range = HitRange::new(far, near);
        assert!(range.entry.t == 1.0);
        assert!(range.exit.t == 3.0);
    }

    #[test]
    fn first_boundary_skips_intervals_before_the_range() {
        let direction = WorldVector::new(0.0, 0.0, 1.0);
        let ranges = vec![
            HitRange::new(
                record(1.0, WorldVector::new(0.0, 0.0, -1.0), direction),
                record(2.0, WorldVector::new(0.0, 0.0, 1.0), direction),
            ),
            HitRange::new(
                record(5.0, WorldVector::new(0.0, 0.0, -1.0), direction),
                record(6.0, WorldVector::new(0.0, 0.0, 1.0), direction),
            ),
        ];
        let hit = first_boundary_in(ranges.clone(), &(3.0..10.0)).unwrap();
        assert!(hit.t == 5.0);

        // A query starting inside an interval surfaces its exit.
        let hit = first_boundary_in(ranges, &(1.5..10.0)).unwrap();
        assert!(hit.t == 2.0);
    }
}
