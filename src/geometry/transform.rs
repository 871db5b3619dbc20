use std::ops::Mul;

use nalgebra::{Unit, UnitQuaternion};

use crate::geometry::{Aabb, FloatType, Ray, WorldPoint, WorldVector};

pub type Rotation = UnitQuaternion<FloatType>;

/// Rigid placement: rotate, then translate.
///
/// `pow(t)` continuously interpolates from the identity (t = 0) to the full
/// placement (t = 1), which is what gives motion-blurred objects their path
/// over the shutter interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub rotation: Rotation,
    pub translation: WorldVector,
}

impl Transform {
    pub fn identity() -> Transform {
        Transform {
            rotation: Rotation::identity(),
            translation: WorldVector::zeros(),
        }
    }

    pub fn new(rotation: Rotation, translation: WorldVector) -> Transform {
        Transform {
            rotation,
            translation,
        }
    }

    pub fn rotation(axis: &Unit<WorldVector>, angle: FloatType) -> Transform {
        Transform::new(Rotation::from_axis_angle(axis, angle), WorldVector::zeros())
    }

    pub fn translation(translation: WorldVector) -> Transform {
        Transform::new(Rotation::identity(), translation)
    }

    pub fn is_identity_rotation(&self) -> bool {
        self.rotation.angle() == 0.0
    }

    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        Transform {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    pub fn transform_point(&self, point: &WorldPoint) -> WorldPoint {
        self.rotation * point + self.translation
    }

    /// Vectors rotate but do not translate.
    pub fn transform_vector(&self, vector: &WorldVector) -> WorldVector {
        self.rotation * vector
    }

    pub fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray {
            origin: self.transform_point(&ray.origin),
            direction: self.transform_vector(&ray.direction),
        }
    }

    /// Fractional application: slerp of the rotation from identity plus the
    /// scaled translation. `pow(0)` is the identity, `pow(1)` is `self`.
    pub fn pow(&self, t: FloatType) -> Transform {
        Transform {
            rotation: self.rotation.powf(t),
            translation: self.translation * t,
        }
    }

    pub fn interpolate(a: &Transform, b: &Transform, t: FloatType) -> Transform {
        Transform {
            rotation: a.rotation.slerp(&b.rotation, t),
            translation: a.translation.lerp(&b.translation, t),
        }
    }

    /// Bounding box of the path `pow(t).transform_point(p)` for t ∈ [0, 1].
    ///
    /// The path is the slerp of `p` towards its rotated image `p1` plus the
    /// growing translation:
    ///
    ///   p(t) = (sin((1-t)·θ)·p + sin(t·θ)·p1) / sin(θ) + t·translation
    ///
    /// Differentiating the axis-s component and setting it to zero reduces to
    ///
    ///   A·sin(t·θ) + B·cos(t·θ) = C
    ///   A = θ·sin(θ)·pₛ,  B = θ·(cos(θ)·pₛ - p1ₛ),  C = translationₛ·sin(θ)
    ///
    /// which the amplitude-phase form solves as t·θ = φ ± acos(C / √(A²+B²)).
    /// Solutions inside [0, 1] are folded into the box together with the two
    /// endpoints. Non-finite intermediate values mean the axis contributes no
    /// interior extremum.
    pub fn swept_bounding_box(&self, p: &WorldPoint) -> Aabb {
        let p1 = self.rotation * p;
        let p2 = p1 + self.translation;
        let mut result = Aabb::new(*p, p2);
        let theta = self.rotation.angle();
        if theta == 0.0 {
            return result;
        }

        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let sample = |t: FloatType| -> WorldPoint {
            let wa = ((1.0 - t) * theta).sin() / sin_theta;
            let wb = (t * theta).sin() / sin_theta;
            (wa * p.coords + wb * p1.coords + t * self.translation).into()
        };

        for axis in 0..3 {
            let a = theta * sin_theta * p[axis];
            let b = theta * (cos_theta * p[axis] - p1[axis]);
            let c = self.translation[axis] * sin_theta;
            let z = c / (a * a + b * b).sqrt();
            if !z.is_finite() || z.abs() > 1.0 {
                continue;
            }
            let phi = a.atan2(b);
            let acos_z = z.acos();
            for t in [
                normalize_angle(phi + acos_z) / theta,
                normalize_angle(phi - acos_z) / theta,
            ] {
                if t.is_finite() && (0.0..=1.0).contains(&t) {
                    let q = sample(t);
                    if q.coords.iter().all(|x| x.is_finite()) {
                        result.add_point(&q);
                    }
                }
            }
        }
        result
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::identity()
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}

fn normalize_angle(x: FloatType) -> FloatType {
    let tau = std::f64::consts::TAU;
    if x < 0.0 {
        x + tau
    } else if x >= tau {
        x - tau
    } else {
        x
    }
}
