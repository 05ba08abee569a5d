//! Unit cube geometry shared by lighting and meshing.
//!
//! ```text
//!      7 ------- 6
//!     /|        /|
//!    / |       / |
//!   4 ------- 5  |
//!   |  3 -----|- 2
//!   | /       | /
//!   |/        |/
//!   0 ------- 1
//! ```
//!
//! Each face lists its vertices as (left-down, right-down, left-top,
//! right-top) in the face's aligned axes, which is also the order of the
//! four AO corners.

/// Unit cube corners.
pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Four cube corners per face, in direction order.
pub const CUBE_FACES: [usize; 24] = [
    1, 2, 5, 6, // right
    0, 3, 4, 7, // left
    4, 5, 7, 6, // top
    0, 1, 3, 2, // bottom
    3, 2, 7, 6, // front
    0, 1, 4, 5, // back
];

/// Texture corner of each face vertex.
pub const CUBE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Two triangles per face, split along the left-down/right-top diagonal.
pub const CUBE_INDICES: [u32; 36] = [
    0, 3, 1, 0, 2, 3, // right
    1, 3, 0, 3, 2, 0, // left
    0, 3, 1, 0, 2, 3, // top
    1, 3, 0, 3, 2, 0, // bottom
    1, 3, 0, 3, 2, 0, // front
    0, 3, 1, 0, 2, 3, // back
];

/// Two triangles per face, split along the right-down/left-top diagonal.
pub const CUBE_FLIPPED_INDICES: [u32; 36] = [
    0, 2, 1, 1, 2, 3, // right
    1, 2, 0, 3, 2, 1, // left
    0, 2, 1, 1, 2, 3, // top
    1, 2, 0, 3, 2, 1, // bottom
    1, 2, 0, 3, 2, 1, // front
    0, 2, 1, 1, 2, 3, // back
];

/// Two diagonal planes through the cube, over the eight vertices of the
/// right and left faces.
pub const CUBE_CROSS_INDICES: [u32; 12] = [4, 3, 1, 4, 6, 3, 0, 7, 5, 0, 2, 7];

/// Ring of eight samples around a face, as (aligned X, aligned Y) steps:
/// down, left-down, left, top-left, top, top-right, right, right-down.
pub const AO_RING: [(i32, i32); 8] = [
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
];

/// Per corner: (side, diagonal, side) as indices into [`AO_RING`].
pub const AO_NEIGHBOR_OFFSETS: [[usize; 3]; 4] = [[0, 1, 2], [6, 7, 0], [2, 3, 4], [4, 5, 6]];

#[cfg(test)]
mod tests {
    use super::*;
    use strata_shared::Direction;

    #[test]
    fn test_face_vertices_lie_on_their_plane() {
        for direction in Direction::ALL {
            let axis = direction.aligned_z();
            let plane = if direction.sign() > 0 { 1.0 } else { 0.0 };
            for i in 0..4 {
                let vertex = CUBE_VERTICES[CUBE_FACES[direction.index() * 4 + i]];
                assert_eq!(vertex[axis], plane, "{direction:?} vertex {i}");
            }
        }
    }

    #[test]
    fn test_face_vertex_order_matches_ao_corners() {
        for direction in Direction::ALL {
            let (ax, ay) = (direction.aligned_x(), direction.aligned_y());
            let expected = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
            for (i, corner) in expected.iter().enumerate() {
                let vertex = CUBE_VERTICES[CUBE_FACES[direction.index() * 4 + i]];
                assert_eq!([vertex[ax], vertex[ay]], *corner, "{direction:?} vertex {i}");
            }
        }
    }

    #[test]
    fn test_ao_corners_point_outwards() {
        // Each corner's side and diagonal samples sit in that corner's quadrant.
        let quadrant = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
        for (corner, offsets) in AO_NEIGHBOR_OFFSETS.iter().enumerate() {
            let (qx, qy) = quadrant[corner];
            let diagonal = AO_RING[offsets[1]];
            assert_eq!(diagonal, (qx, qy));
            for &side in &[offsets[0], offsets[2]] {
                let (sx, sy) = AO_RING[side];
                assert!(sx == 0 || sx == qx);
                assert!(sy == 0 || sy == qy);
            }
        }
    }

    #[test]
    fn test_triangulations_cover_all_four_vertices() {
        for table in [CUBE_INDICES, CUBE_FLIPPED_INDICES] {
            for face in table.chunks(6) {
                let mut seen = [false; 4];
                for &i in face {
                    seen[i as usize] = true;
                }
                assert_eq!(seen, [true; 4]);
            }
        }
    }
}
