use std::f64::consts::{PI, TAU};
use std::ops::Range;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::geometry::{Aabb, FloatType, Ray, TexturePoint, WorldPoint, WorldVector};
use crate::material::Material;
use crate::scene::{
    first_boundary_in, HitRange, HitRecord, Hittable, HittableConvexVolume, HittableVolume,
};

/// Intersects up to three independent slab/quadric constraint intervals:
/// the result enters at the latest entry and exits at the earliest exit.
fn intersect_constraints(constraints: ArrayVec<HitRange, 3>) -> Option<HitRange> {
    let mut iter = constraints.into_iter();
    let mut intersection = iter.next()?;
    for range in iter {
        if range.entry.t > intersection.entry.t {
            intersection.entry = range.entry;
        }
        if range.exit.t < intersection.exit.t {
            intersection.exit = range.exit;
        }
    }
    (intersection.entry.t <= intersection.exit.t).then_some(intersection)
}

/// Sphere whose center follows a linear path over the shutter interval.
/// A stationary sphere is the zero-velocity special case.
#[derive(Clone)]
pub struct Sphere {
    center_path: Ray,
    radius: FloatType,
    material: Arc<dyn Material>,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType, material: Arc<dyn Material>) -> Sphere {
        Sphere::moving(center, center, radius, material)
    }

    pub fn moving(
        from: WorldPoint,
        to: WorldPoint,
        radius: FloatType,
        material: Arc<dyn Material>,
    ) -> Sphere {
        assert!(radius >= 0.0);
        Sphere {
            center_path: Ray::towards(from, to),
            radius,
            material,
        }
    }

    pub fn center_at(&self, time: FloatType) -> WorldPoint {
        self.center_path.point_at(time)
    }

    fn record(&self, t: FloatType, ray: &Ray, center: &WorldPoint) -> HitRecord {
        let point = ray.point_at(t);
        let normal = (point - center) / self.radius;
        let texture_coordinates = Sphere::texture_coordinates(&normal);
        HitRecord::with_outward_normal(
            t,
            point,
            normal,
            &ray.direction,
            self.material.clone(),
            texture_coordinates,
        )
    }

    fn texture_coordinates(normal: &WorldVector) -> TexturePoint {
        TexturePoint::new(
            ((-normal.z).atan2(normal.x) + PI) / TAU,
            (-normal.y).clamp(-1.0, 1.0).acos() / PI,
        )
    }
}

impl Hittable for Sphere {
    fn center(&self) -> WorldPoint {
        self.center_at(0.5)
    }

    fn bounding_box(&self) -> Aabb {
        let r = WorldVector::repeat(self.radius);
        let at = |time| {
            let center = self.center_at(time);
            Aabb::new(center - r, center + r)
        };
        at(0.0).union(&at(1.0))
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        first_boundary_in(self.hits(ray, time), &range)
    }
}

impl HittableVolume for Sphere {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange> {
        self.hit_range(ray, time).into_iter().collect()
    }
}

impl HittableConvexVolume for Sphere {
    fn hit_range(&self, ray: &Ray, time: FloatType) -> Option<HitRange> {
        // |origin + t·direction - center|² = radius², quadratic in t with
        // halved linear coefficient.
        let center = self.center_at(time);
        let oc = ray.origin - center;
        let a = ray.direction.norm_squared();
        let half_b = ray.direction.dot(&oc);
        let c = oc.norm_squared() - self.radius * self.radius;
        let quarter_disc = half_b * half_b - a * c;
        if quarter_disc < 0.0 {
            return None;
        }
        let root = quarter_disc.sqrt();
        let t1 = (-half_b - root) / a;
        let t2 = (-half_b + root) / a;
        if !(t1.is_finite() && t2.is_finite()) {
            // Degenerate direction; nothing to parametrize.
            return None;
        }
        Some(HitRange::new(
            self.record(t1, ray, &center),
            self.record(t2, ray, &center),
        ))
    }
}

/// Finite cylinder along the local +Y axis, from y = 0 to y = height, with
/// separate cap and side materials. Place it elsewhere with [`Transformed`].
///
/// [`Transformed`]: crate::scene::transformed::Transformed
#[derive(Clone)]
pub struct Cylinder {
    radius: FloatType,
    height: FloatType,
    bottom: Arc<dyn Material>,
    top: Arc<dyn Material>,
    side: Arc<dyn Material>,
}

impl Cylinder {
    pub fn new(
        radius: FloatType,
        height: FloatType,
        bottom: Arc<dyn Material>,
        top: Arc<dyn Material>,
        side: Arc<dyn Material>,
    ) -> Cylinder {
        assert!(radius >= 0.0);
        assert!(height >= 0.0);
        Cylinder {
            radius,
            height,
            bottom,
            top,
            side,
        }
    }

    pub fn uniform(radius: FloatType, height: FloatType, material: Arc<dyn Material>) -> Cylinder {
        Cylinder::new(
            radius,
            height,
            material.clone(),
            material.clone(),
            material,
        )
    }

    fn axis_ray() -> Ray {
        Ray::new(WorldPoint::origin(), WorldVector::y())
    }

    fn cap_record(
        &self,
        t: FloatType,
        ray: &Ray,
        outward: WorldVector,
        material: &Arc<dyn Material>,
    ) -> HitRecord {
        let point = ray.point_at(t);
        let texture_coordinates = TexturePoint::new(
            0.5 + point.x / (2.0 * self.radius),
            0.5 + point.z / (2.0 * self.radius),
        );
        HitRecord::with_outward_normal(
            t,
            point,
            outward,
            &ray.direction,
            material.clone(),
            texture_coordinates,
        )
    }

    fn side_record(&self, t: FloatType, ray: &Ray) -> HitRecord {
        let point = ray.point_at(t);
        let normal = (point - Cylinder::axis_ray().projection_of(&point)).normalize();
        let texture_coordinates =
            TexturePoint::new(point.z.atan2(point.x) / TAU, point.y / self.height);
        HitRecord::with_outward_normal(
            t,
            point,
            normal,
            &ray.direction,
            self.side.clone(),
            texture_coordinates,
        )
    }
}

impl Hittable for Cylinder {
    fn center(&self) -> WorldPoint {
        WorldPoint::new(0.0, self.height * 0.5, 0.0)
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::new(
            WorldPoint::new(-self.radius, 0.0, -self.radius),
            WorldPoint::new(self.radius, self.height, self.radius),
        )
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        first_boundary_in(self.hits(ray, time), &range)
    }
}

impl HittableVolume for Cylinder {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange> {
        self.hit_range(ray, time).into_iter().collect()
    }
}

impl HittableConvexVolume for Cylinder {
    fn hit_range(&self, ray: &Ray, _time: FloatType) -> Option<HitRange> {
        let mut constraints: ArrayVec<HitRange, 3> = ArrayVec::new();

        // Cap planes at y = 0 and y = height: a linear interval, unless the
        // ray runs parallel to the caps.
        let to_bottom = -ray.origin.y;
        let to_top = self.height - ray.origin.y;
        let t_bottom = to_bottom / ray.direction.y;
        let t_top = to_top / ray.direction.y;
        if t_bottom.is_finite() && t_top.is_finite() {
            constraints.push(HitRange::new(
                self.cap_record(t_bottom, ray, -WorldVector::y(), &self.bottom),
                self.cap_record(t_top, ray, WorldVector::y(), &self.top),
            ));
        } else if to_bottom < 0.0 && to_top < 0.0 || to_bottom > 0.0 && to_top > 0.0 {
            // Parallel to the caps with the origin outside the slab.
            return None;
        }

        // Infinite side tube: the sphere quadratic projected onto the plane
        // perpendicular to the axis, unless the ray runs parallel to it.
        let d = &ray.direction;
        let ob = ray.origin.coords;
        let a = d.norm_squared() - d.y * d.y;
        let half_b = d.dot(&ob) - d.y * ob.y;
        let c = ob.norm_squared() - ob.y * ob.y - self.radius * self.radius;
        let quarter_disc = half_b * half_b - a * c;
        if quarter_disc < 0.0 {
            return None;
        }
        let root = quarter_disc.sqrt();
        let t1 = (-half_b - root) / a;
        let t2 = (-half_b + root) / a;
        if t1.is_finite() && t2.is_finite() {
            constraints.push(HitRange::new(
                self.side_record(t1, ray),
                self.side_record(t2, ray),
            ));
        } else if Cylinder::axis_ray().distance_squared_to(&ray.origin)
            > self.radius * self.radius
        {
            // Parallel to the axis, outside the tube.
            return None;
        }

        intersect_constraints(constraints)
    }
}

/// Axis-aligned box from the local origin to `size`, with a material per
/// face in `[-x, +x, -y, +y, -z, +z]` order.
#[derive(Clone)]
pub struct Cuboid {
    size: WorldVector,
    materials: [Arc<dyn Material>; 6],
}

impl Cuboid {
    pub fn new(size: WorldVector, materials: [Arc<dyn Material>; 6]) -> Cuboid {
        assert!(size.iter().all(|s| *s >= 0.0));
        Cuboid { size, materials }
    }

    pub fn uniform(size: WorldVector, material: Arc<dyn Material>) -> Cuboid {
        Cuboid::new(size, std::array::from_fn(|_| material.clone()))
    }

    /// Planar projection onto the face; negative faces mirror one coordinate
    /// so the image is not flipped when seen from outside.
    fn face_uv(&self, axis: usize, positive: bool, p: &WorldPoint) -> TexturePoint {
        let s = &self.size;
        match (axis, positive) {
            (0, true) => TexturePoint::new(p.z / s.z, p.y / s.y),
            (0, false) => TexturePoint::new(1.0 - p.z / s.z, p.y / s.y),
            (1, true) => TexturePoint::new(p.x / s.x, p.z / s.z),
            (1, false) => TexturePoint::new(p.x / s.x, 1.0 - p.z / s.z),
            (2, true) => TexturePoint::new(p.x / s.x, p.y / s.y),
            (2, false) => TexturePoint::new(1.0 - p.x / s.x, p.y / s.y),
            _ => unreachable!(),
        }
    }

    fn face_record(&self, t: FloatType, ray: &Ray, axis: usize, positive: bool) -> HitRecord {
        let point = ray.point_at(t);
        let mut outward = WorldVector::zeros();
        outward[axis] = if positive { 1.0 } else { -1.0 };
        let material = &self.materials[axis * 2 + usize::from(positive)];
        HitRecord::with_outward_normal(
            t,
            point,
            outward,
            &ray.direction,
            material.clone(),
            self.face_uv(axis, positive, &point),
        )
    }
}

impl Hittable for Cuboid {
    fn center(&self) -> WorldPoint {
        (self.size / 2.0).into()
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::new(WorldPoint::origin(), WorldPoint::origin() + self.size)
    }

    fn hit(&self, ray: &Ray, time: FloatType, range: Range<FloatType>) -> Option<HitRecord> {
        first_boundary_in(self.hits(ray, time), &range)
    }
}

impl HittableVolume for Cuboid {
    fn hits(&self, ray: &Ray, time: FloatType) -> Vec<HitRange> {
        self.hit_range(ray, time).into_iter().collect()
    }
}

impl HittableConvexVolume for Cuboid {
    fn hit_range(&self, ray: &Ray, _time: FloatType) -> Option<HitRange> {
        let mut constraints: ArrayVec<HitRange, 3> = ArrayVec::new();
        for axis in 0..3 {
            let to_low = -ray.origin[axis];
            let to_high = self.size[axis] - ray.origin[axis];
            let t_low = to_low / ray.direction[axis];
            let t_high = to_high / ray.direction[axis];
            if t_low.is_finite() && t_high.is_finite() {
                constraints.push(HitRange::new(
                    self.face_record(t_low, ray, axis, false),
                    self.face_record(t_high, ray, axis, true),
                ));
            } else if to_low < 0.0 && to_high < 0.0 || to_low > 0.0 && to_high > 0.0 {
                return None;
            }
        }
        intersect_constraints(constraints)
    }
}
