use std::f32::consts::TAU;

use glam::Vec3;

/// Triangle list and edge list of one solid.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub triangles: Vec<Vec3>,
    pub edges: Vec<Vec3>,
}

fn ring(count: usize, radius: f32, y: f32, phase: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let a = phase + i as f32 / count as f32 * TAU;
            Vec3::new(a.cos() * radius, y, a.sin() * radius)
        })
        .collect()
}

/// Round brilliant cut: octagonal table, crown, girdle, pavilion down to the culet.
pub fn brilliant(sides: usize) -> Mesh {
    let table = ring(sides, 0.55, 0.55, 0.0);
    let girdle = ring(sides, 1.0, 0.15, TAU / (2 * sides) as f32);
    let table_center = Vec3::new(0.0, 0.55, 0.0);
    let culet = Vec3::new(0.0, -1.1, 0.0);

    let mut mesh = Mesh::default();
    for i in 0..sides {
        let j = (i + 1) % sides;
        mesh.triangles.extend([table_center, table[i], table[j]]);
        // crown: kite between two table corners and the girdle
        mesh.triangles.extend([table[i], girdle[i], table[j]]);
        mesh.triangles.extend([table[j], girdle[i], girdle[j]]);
        mesh.triangles.extend([girdle[i], culet, girdle[j]]);

        mesh.edges.extend([table[i], table[j]]);
        mesh.edges.extend([girdle[i], girdle[j]]);
        mesh.edges.extend([table[i], girdle[i]]);
        mesh.edges.extend([table[j], girdle[i]]);
        mesh.edges.extend([girdle[i], culet]);
    }
    mesh
}

/// Axis-aligned box centered on the origin.
pub fn cuboid(half: Vec3) -> Mesh {
    let c = |x: f32, y: f32, z: f32| Vec3::new(x * half.x, y * half.y, z * half.z);
    let corners = [
        c(-1.0, -1.0, -1.0),
        c(1.0, -1.0, -1.0),
        c(1.0, 1.0, -1.0),
        c(-1.0, 1.0, -1.0),
        c(-1.0, -1.0, 1.0),
        c(1.0, -1.0, 1.0),
        c(1.0, 1.0, 1.0),
        c(-1.0, 1.0, 1.0),
    ];
    const FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [1, 5, 6, 2],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ];
    const EDGES: [[usize; 2]; 12] = [
        [0, 1], [1, 2], [2, 3], [3, 0],
        [4, 5], [5, 6], [6, 7], [7, 4],
        [0, 4], [1, 5], [2, 6], [3, 7],
    ];

    let mut mesh = Mesh::default();
    for [a, b, c, d] in FACES {
        mesh.triangles
            .extend([corners[a], corners[b], corners[c], corners[a], corners[c], corners[d]]);
    }
    for [a, b] in EDGES {
        mesh.edges.extend([corners[a], corners[b]]);
    }
    mesh
}

/// Closed circle in the XZ plane as a line list.
pub fn circle(segments: usize, radius: f32) -> Vec<Vec3> {
    let points = ring(segments, radius, 0.0, 0.0);
    (0..segments)
        .flat_map(|i| [points[i], points[(i + 1) % segments]])
        .collect()
}

/// Evenly spread points on a sphere (golden-angle spiral).
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<Vec3> {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - (i as f32 + 0.5) / count as f32 * 2.0;
            let r = (1.0 - y * y).sqrt();
            let theta = golden * i as f32;
            Vec3::new(theta.cos() * r, y, theta.sin() * r) * radius
        })
        .collect()
}
