use glam::Vec3;

/// A finite ray: origin, unit direction and maximum length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

impl Ray {
    /// `direction` must already be normalized.
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction,
            length,
        }
    }

    /// Ray from `from` toward `to`, limited to `max_length`.
    ///
    /// Returns `None` when the two points coincide (no direction).
    pub fn between(from: Vec3, to: Vec3, max_length: f32) -> Option<Self> {
        let direction = (to - from).try_normalize()?;
        Some(Self::new(from, direction, max_length))
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Distance along `ray` to the first intersection with a sphere, if it lies
/// within the ray's length. An origin inside the sphere reports the exit.
pub fn sphere_hit_distance(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let near = -b - sq;
    let far = -b + sq;
    let t = if near >= 0.0 { near } else { far };
    (t >= 0.0 && t <= ray.length).then_some(t)
}

/// Slab test against an axis-aligned box given by its corners.
///
/// An axis the ray runs parallel to only constrains the origin, so a ray
/// grazing a face still hits.
pub fn aabb_hit_distance(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let (o, d) = (ray.origin[axis], ray.direction[axis]);
        let (lo, hi) = (min[axis], max[axis]);
        if d == 0.0 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }
    if t_exit < 0.0 || t_enter > t_exit {
        return None;
    }
    let t = t_enter.max(0.0);
    (t <= ray.length).then_some(t)
}
