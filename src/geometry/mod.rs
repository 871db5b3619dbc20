mod aabb;
mod transform;

pub use aabb::Aabb;
pub use transform::{Rotation, Transform};

use nalgebra::{Point2, Point3, Vector3};

pub type FloatType = f64;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type TexturePoint = Point2<FloatType>;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray. Not necessarily normalized: transformed and
    /// interpolated rays keep their original parametrization, so `t` values
    /// stay comparable across coordinate frames.
    pub direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray { origin, direction }
    }

    pub fn towards(origin: WorldPoint, target: WorldPoint) -> Ray {
        Ray {
            origin,
            direction: target - origin,
        }
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }

    /// Projection of `point` onto the carrier line of the ray.
    pub fn projection_of(&self, point: &WorldPoint) -> WorldPoint {
        let t = self.direction.dot(&(point - self.origin)) / self.direction.norm_squared();
        self.point_at(t)
    }

    pub fn distance_squared_to(&self, point: &WorldPoint) -> FloatType {
        (point - self.projection_of(point)).norm_squared()
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use proptest::prelude::*;

    /// Helper macro that creates a wrapper around a type that implements Deref and Arbitrary
    macro_rules! arbitrary_wrapper {
        ( $wrapper_name:ident ( $type:ty ) -> $block:block ) => {
            #[derive(Copy, Clone, Debug)]
            pub struct $wrapper_name(pub $type);

            impl std::ops::Deref for $wrapper_name {
                type Target = $type;
                fn deref(&self) -> &$type {
                    &self.0
                }
            }

            impl Arbitrary for $wrapper_name {
                type Parameters = ();
                type Strategy = proptest::strategy::BoxedStrategy<Self>;
                fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
                    $block.prop_map(|x| $wrapper_name(x)).boxed()
                }
            }
        };
    }

    pub fn simple_float() -> BoxedStrategy<FloatType> {
        any::<i32>().prop_map(|n| n as FloatType * 1e-4).boxed()
    }

    arbitrary_wrapper! {
        WorldPointWrapper(WorldPoint) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_map(|coords| {
                    WorldPoint::new(coords.0, coords.1, coords.2)
                })
        }
    }

    arbitrary_wrapper! {
        NonzeroWorldVectorWrapper(WorldVector) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_filter_map(
                    "vector is zero",
                    |coords| {
                        let vector = WorldVector::new(coords.0, coords.1, coords.2);
                        if vector.norm() < 1e-6 {
                            None
                        } else {
                            Some(vector)
                        }
                    })
        }
    }

    arbitrary_wrapper! {
        RotationWrapper(nalgebra::UnitQuaternion<FloatType>) -> {
            (simple_float(), simple_float(), simple_float(), -3.1..3.1f64)
                .prop_filter_map(
                    "axis is zero",
                    |(x, y, z, angle)| {
                        let axis = WorldVector::new(x, y, z);
                        if axis.norm() < 1e-6 {
                            None
                        } else {
                            Some(nalgebra::UnitQuaternion::from_axis_angle(
                                &nalgebra::Unit::new_normalize(axis),
                                angle,
                            ))
                        }
                    })
        }
    }

    mod ray {
        use super::*;
        use assert2::assert;
        use test_strategy::proptest;

        #[test]
        fn point_at_walks_the_parametrization() {
            let r = Ray::new(WorldPoint::new(1.0, 2.0, 3.0), WorldVector::new(0.0, 0.0, 2.0));
            assert!(r.point_at(0.0) == WorldPoint::new(1.0, 2.0, 3.0));
            assert!(r.point_at(1.5) == WorldPoint::new(1.0, 2.0, 6.0));
            assert!(r.point_at(-1.0) == WorldPoint::new(1.0, 2.0, 1.0));
        }

        #[test]
        fn towards_hits_the_target_at_one() {
            let r = Ray::towards(WorldPoint::new(1.0, 0.0, 0.0), WorldPoint::new(4.0, 4.0, 0.0));
            assert!((r.point_at(1.0) - WorldPoint::new(4.0, 4.0, 0.0)).norm() < 1e-12);
        }

        #[proptest]
        fn projection_residual_is_perpendicular(
            origin: WorldPointWrapper,
            direction: NonzeroWorldVectorWrapper,
            point: WorldPointWrapper,
        ) {
            let ray = Ray::new(*origin, *direction);
            let projected = ray.projection_of(&point);
            let residual = *point - projected;
            prop_assert!(residual.dot(&ray.direction).abs() <= 1e-6 * ray.direction.norm() * (1.0 + residual.norm()));
        }
    }
}
