use nalgebra::Vector3;
use rand::RngCore;

use crate::geometry::{FloatType, Ray, TexturePoint, WorldPoint};
use crate::scene::HitRecord;

/// Linear RGB color.
pub type ColorF = Vector3<FloatType>;

/// Result of a successful scatter: the attenuated throughput and the
/// continuation ray.
#[derive(Copy, Clone, Debug)]
pub struct Scatter {
    pub attenuation: ColorF,
    pub scattered: Ray,
}

/// Surface response, consumed by the renderer.
///
/// The intersection engine only stores material handles in hit records and
/// never calls these itself. Randomness is threaded through an explicit
/// generator handle; there is no global RNG state anywhere in the crate.
pub trait Material: Send + Sync {
    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter>;

    fn emitted(&self, _texture_coordinates: &TexturePoint, _point: &WorldPoint) -> ColorF {
        ColorF::zeros()
    }
}
