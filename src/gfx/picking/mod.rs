//! # Controller Ray Picking
//!
//! Ray casting against the draggable objects of a [`Scene`].
//!
//! ## How it works
//!
//! 1. **Broad phase**: reject objects whose world [`Aabb`] the ray misses.
//!    The boxes are refreshed once per frame before casting.
//! 2. **Narrow phase**: move the ray into the object's local space and test it
//!    against the local geometry bounds, which is exact for box panels.
//! 3. **Ordering**: hits are sorted by world distance, ties by lowest object id.
//!
//! ## Usage
//!
//! ```no_run
//! use keepsake::gfx::picking::{cast_draggable, Ray};
//! # fn demo(scene: &keepsake::gfx::scene::Scene) {
//! let ray = Ray::new([0.0, 1.0, 0.0].into(), [0.0, 0.0, -1.0].into());
//! if let Some(hit) = cast_draggable(&ray, scene).first() {
//!     println!("hit {:?} at {}", hit.object, hit.distance);
//! }
//! # }
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::scene::{ObjectId, Scene, SceneObject};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Re-expresses the ray in the space of `inverse` without renormalizing,
    /// so the slab parameter stays proportional to the world parameter.
    fn transformed(&self, inverse: &Matrix4<f32>) -> Self {
        let origin = inverse * self.origin.extend(1.0);
        let direction = inverse * self.direction.extend(0.0);
        Self {
            origin: origin.truncate() / origin.w,
            direction: direction.truncate(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box centered at the origin with the given full extents
    pub fn centered(size: Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self::new(-half, half)
    }

    /// Create AABB from a set of points
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for point in points.iter().skip(1) {
            min.x = min.x.min(point[0]);
            min.y = min.y.min(point[1]);
            min.z = min.z.min(point[2]);
            max.x = max.x.max(point[0]);
            max.y = max.y.max(point[1]);
            max.z = max.z.max(point[2]);
        }

        Self::new(min, max)
    }

    /// Slab test. Returns the ray parameter of the entry point (or the exit
    /// point when the origin is inside), or None if the ray misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed = corners.map(|corner| {
            let p = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
            [p.x / p.w, p.y / p.w, p.z / p.w]
        });

        Self::from_points(&transformed)
    }
}

/// A single ray/object intersection
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub object: ObjectId,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space intersection point
    pub point: Vector3<f32>,
}

/// Exact ray test against one object's local bounds
pub fn intersect_object(ray: &Ray, object: &SceneObject, world: &Matrix4<f32>) -> Option<RayHit> {
    if let Some(bb) = &object.bounding_box {
        bb.intersect_ray(ray)?;
    }

    let inverse = world.invert()?;
    let local_ray = ray.transformed(&inverse);
    let t = object.local_bounds().intersect_ray(&local_ray)?;

    // The local parameter equals the world parameter because the direction
    // was not renormalized after the transform.
    let point = ray.point_at(t);
    Some(RayHit {
        object: object.id(),
        distance: (point - ray.origin).magnitude(),
        point,
    })
}

/// Casts `ray` against every draggable object, nearest first
pub fn cast_draggable(ray: &Ray, scene: &Scene) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = scene
        .objects()
        .filter(|object| object.is_draggable)
        .filter_map(|object| intersect_object(ray, object, &scene.world_matrix(object)))
        .collect();

    hits.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.object.cmp(&b.object))
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{MaterialSlot, SceneObject};
    use crate::gfx::transform::Transform;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn panel_at(scene: &mut Scene, position: Vector3<f32>, yaw: f32) -> ObjectId {
        let transform = Transform::from_euler(position, Vector3::new(0.0, yaw, 0.0));
        let id = scene.insert(SceneObject::panel(
            "panel",
            transform,
            Vector3::new(1.0, 1.0, 0.02),
            vec![MaterialSlot::neutral(); 6],
        ));
        scene.refresh_bounding_boxes();
        id
    }

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_points(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(aabb.intersect_ray(&ray).unwrap_or(-1.0), 4.0);

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let ray_away = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&ray_away).is_none());
    }

    #[test]
    fn test_rotated_panel_is_hit_on_its_face() {
        let mut scene = Scene::new();
        // Left-wall panel facing +X, like the gallery layout
        let id = panel_at(&mut scene, Vector3::new(-4.49, 1.5, 0.0), FRAC_PI_2);

        let ray = Ray::new(Vector3::new(0.0, 1.5, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let hits = cast_draggable(&ray, &scene);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, id);
        assert_relative_eq!(hits[0].distance, 4.48, epsilon = 1e-4);
    }

    #[test]
    fn test_hits_sorted_nearest_first() {
        let mut scene = Scene::new();
        let far = panel_at(&mut scene, Vector3::new(0.0, 0.0, -5.0), 0.0);
        let near = panel_at(&mut scene, Vector3::new(0.0, 0.0, -2.0), 0.0);

        let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
        let hits = cast_draggable(&ray, &scene);

        assert_eq!(hits.iter().map(|h| h.object).collect::<Vec<_>>(), vec![near, far]);
    }

    #[test]
    fn test_equal_distance_breaks_tie_on_lowest_id() {
        let mut scene = Scene::new();
        let first = panel_at(&mut scene, Vector3::new(0.0, 0.0, -2.0), 0.0);
        let second = panel_at(&mut scene, Vector3::new(0.0, 0.0, -2.0), 0.0);

        let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
        let hits = cast_draggable(&ray, &scene);

        assert_eq!(hits[0].object, first);
        assert_eq!(hits[1].object, second);
    }

    #[test]
    fn test_non_draggable_objects_are_ignored() {
        let mut scene = Scene::new();
        let id = panel_at(&mut scene, Vector3::new(0.0, 0.0, -2.0), 0.0);
        if let Some(object) = scene.get_mut(id) {
            object.is_draggable = false;
        }

        let ray = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
        assert!(cast_draggable(&ray, &scene).is_empty());
    }
}
