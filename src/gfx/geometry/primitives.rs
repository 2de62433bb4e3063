//! # Primitive Shape Generation
//!
//! Shapes used by the room. All generated with outward normals and UVs.

use super::GeometryData;
use std::f32::consts::PI;

/// Faces of a generated box, in material-slot order
pub const BOX_FACE_COUNT: usize = 6;

/// Box centered at the origin with the given full extents.
///
/// Faces are emitted as +X, -X, +Y, -Y, +Z, -Z; face `i` owns indices
/// `6 * i .. 6 * i + 6`. UVs run left to right and bottom to top as seen from
/// outside the face, so an image on +Z reads correctly from the front.
pub fn generate_box(size: [f32; 3]) -> GeometryData {
    let [hx, hy, hz] = size.map(|s| s * 0.5);
    let mut data = GeometryData::new();

    // Per face: outward normal and the four corners bottom-left, bottom-right,
    // top-right, top-left as seen from outside
    let faces: [([f32; 3], [[f32; 3]; 4]); BOX_FACE_COUNT] = [
        (
            [1.0, 0.0, 0.0],
            [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]],
        ),
        (
            [-1.0, 0.0, 0.0],
            [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]],
        ),
        (
            [0.0, 1.0, 0.0],
            [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]],
        ),
        (
            [0.0, -1.0, 0.0],
            [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]],
        ),
        (
            [0.0, 0.0, 1.0],
            [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]],
        ),
        (
            [0.0, 0.0, -1.0],
            [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]],
        ),
    ];

    // Texture rows start at the top of the image
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    for (normal, corners) in faces {
        let base = data.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            data.vertices.push(*corner);
            data.normals.push(normal);
            data.tex_coords.push(uv);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Index range of one box face
pub fn box_face_indices(face: usize) -> std::ops::Range<u32> {
    let start = (face * 6) as u32;
    start..start + 6
}

/// UV sphere of the given radius centered at the origin
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices.push(normal.map(|n| n * radius));
            data.normals.push(normal);
            data.tex_coords
                .push([long as f32 / long_segs as f32, lat as f32 / lat_segs as f32]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Flat annulus in the XY plane at depth `z`, facing +Z
pub fn generate_ring(inner_radius: f32, outer_radius: f32, segments: u32, z: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let u = i as f32 / segs as f32;

        data.vertices.push([inner_radius * cos_a, inner_radius * sin_a, z]);
        data.normals.push([0.0, 0.0, 1.0]);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([outer_radius * cos_a, outer_radius * sin_a, z]);
        data.normals.push([0.0, 0.0, 1.0]);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let inner = i * 2;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;

        data.indices.extend_from_slice(&[inner, outer, next_outer]);
        data.indices.extend_from_slice(&[inner, next_outer, next_inner]);
    }

    data
}

/// Thin beam from the origin to `(0, 0, -length)`, drawn for pointer controllers
pub fn generate_pointer_beam(length: f32, thickness: f32) -> GeometryData {
    let mut data = generate_box([thickness, thickness, length]);
    for vertex in &mut data.vertices {
        vertex[2] -= length * 0.5;
    }
    data
}
