pub mod geometry;
pub mod material;
pub mod scene;

pub use geometry::{Aabb, FloatType, Ray, Rotation, Transform};
pub use material::{ColorF, Material, Scatter};
pub use scene::bvh::BoundingVolumeNode;
pub use scene::csg::{Composition, Operation};
pub use scene::primitives::{Cuboid, Cylinder, Sphere};
pub use scene::transformed::{MotionBlur, Transformed};
pub use scene::{Face, HitRange, HitRecord, Hittable, HittableConvexVolume, HittableVolume};
