use crate::Mesh;
use firmament_math::Vec3;
use firmament_types::vertex;

/// Axis aligned box tessellator
///
/// Every side gets its own four vertices, triangles are wound counter-clockwise when looking
/// at the box from outside.
pub struct BoxTessellator {
    /// Minimal corner of the box
    pub minimum_corner: Vec3,
    /// Maximal corner of the box
    pub maximum_corner: Vec3,
}

impl BoxTessellator {
    /// Constructs tessellator of a box with corners
    pub fn new(minimum_corner: Vec3, maximum_corner: Vec3) -> Self {
        Self {
            minimum_corner,
            maximum_corner,
        }
    }

    /// Constructs tessellator of a cube centered at the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        Self::new(Vec3::new(-half, -half, -half), Vec3::new(half, half, half))
    }

    /// Returns vertices positions of the box
    pub fn positions(&self) -> Vec<[f32; 3]> {
        let [x0, y0, z0]: [f32; 3] = self.minimum_corner.into();
        let [x1, y1, z1]: [f32; 3] = self.maximum_corner.into();
        vec![
            [x0, y0, z0], // 0 -> 0
            [x1, y0, z0], // 1 -> 1
            [x1, y1, z0], // 2 -> 2
            [x0, y1, z0], // 3 -> 3
            [x1, y0, z0], // 1 -> 4
            [x1, y1, z1], // 6 -> 5
            [x1, y0, z1], // 5 -> 6
            [x1, y1, z0], // 2 -> 7
            [x1, y0, z1], // 5 -> 8
            [x0, y1, z1], // 7 -> 9
            [x0, y0, z1], // 4 -> 10
            [x1, y1, z1], // 6 -> 11
            [x0, y0, z1], // 4 -> 12
            [x0, y1, z0], // 3 -> 13
            [x0, y0, z0], // 0 -> 14
            [x0, y1, z1], // 7 -> 15
            [x0, y1, z0], // 3 -> 16
            [x1, y1, z1], // 6 -> 17
            [x1, y1, z0], // 2 -> 18
            [x0, y1, z1], // 7 -> 19
            [x0, y0, z1], // 4 -> 20
            [x1, y0, z0], // 1 -> 21
            [x1, y0, z1], // 5 -> 22
            [x0, y0, z0], // 0 -> 23
        ]
    }

    /// Returns triangle indices of the box
    pub fn indices(&self) -> Vec<u32> {
        vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 7, 5, // +x
            8, 9, 10, 8, 11, 9, // +z
            12, 13, 14, 12, 15, 13, // -x
            16, 17, 18, 16, 19, 17, // +y
            20, 21, 22, 20, 23, 21, // -y
        ]
    }

    /// Corners of the box
    pub fn corners(&self) -> [Vec3; 2] {
        [self.minimum_corner, self.maximum_corner]
    }

    /// Tessellates the box into a position-only mesh
    pub fn compute(&self) -> Mesh {
        let mut mesh = Mesh::new("Box");
        mesh.set_vertices::<vertex::Position>(self.positions());
        mesh.set_indices(self.indices());
        mesh
    }
}

impl Default for BoxTessellator {
    fn default() -> Self {
        Self::cube(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmament_math::InnerSpace;

    #[test]
    fn box_has_six_quads() {
        let mesh = BoxTessellator::cube(2.0).compute();
        assert_eq!(mesh.count_vertices(), 24);
        assert_eq!(mesh.count_faces(), 12);
    }

    #[test]
    fn triangles_face_outwards() {
        let tessellator = BoxTessellator::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        let positions = tessellator.positions();
        for triangle in tessellator.indices().chunks(3) {
            let v0 = Vec3::from(positions[triangle[0] as usize]);
            let v1 = Vec3::from(positions[triangle[1] as usize]);
            let v2 = Vec3::from(positions[triangle[2] as usize]);
            let normal = (v1 - v0).cross(v2 - v0);
            let centroid = (v0 + v1 + v2) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {:?} faces inwards", triangle);
        }
    }

    #[test]
    fn positions_stay_within_corners() {
        let tessellator = BoxTessellator::cube(10.0);
        for p in tessellator.positions() {
            assert!(p.iter().all(|c| c.abs() == 5.0));
        }
    }
}
