use crate::{InnerSpace, Vec3, Zero};

/// Sphere enclosing a set of points
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere
    pub center: Vec3,
    /// Radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Constructs new sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Computes a sphere around the axis aligned bounds of the points
    ///
    /// Empty input gives a zero sphere at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        let (first, rest) = match points.split_first() {
            Some(split) => split,
            None => return Self::default(),
        };

        let (min, max) = rest.iter().fold((*first, *first), |(min, max), p| {
            (
                Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });

        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|p| (p - center).magnitude())
            .fold(0.0, f32::max);

        Self { center, radius }
    }

    /// Checks if the point lies inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).magnitude() <= self.radius * (1.0 + f32::EPSILON)
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Vec3::zero(),
            radius: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_of_box_diagonal_touches_corners() {
        let max = Vec3::new(5.0, 5.0, 5.0);
        let sphere = BoundingSphere::from_points(&[-max, max]);

        assert_eq!(sphere.center, Vec3::zero());
        assert!((sphere.radius - max.magnitude()).abs() < 1e-4);
        for corner in [
            Vec3::new(5.0, -5.0, 5.0),
            Vec3::new(-5.0, 5.0, -5.0),
            Vec3::new(5.0, 5.0, -5.0),
        ] {
            assert!(sphere.contains(corner));
        }
    }

    #[test]
    fn empty_points_give_default_sphere() {
        assert_eq!(BoundingSphere::from_points(&[]), BoundingSphere::default());
    }
}
