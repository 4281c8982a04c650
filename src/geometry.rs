//! Parametric primitives.
//!
//! Faces wind counter-clockwise when seen from outside. Texture coordinates
//! put (0, 0) at the top-left texel, matching how `three-d` uploads images.

use std::f32::consts::{PI, TAU};
use three_d::{vec2, vec3, CpuMesh, Indices, InnerSpace, Positions, Vec2, Vec3};

use crate::texels::Texels;


/// CPU-side triangle list kept around so it can be displaced later
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}
impl Geometry {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Moves every vertex along its normal by `height(uv) * scale + bias`.
    /// Normals are left untouched.
    pub fn displaced(&self, height: &Texels, scale: f32, bias: f32) -> Self {
        let positions = self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| p + n * (height.sample(*uv) * scale + bias))
            .collect();
        Self {
            positions,
            ..self.clone()
        }
    }

    /// Uploadable mesh with tangents for normal mapping
    pub fn to_cpu_mesh(&self) -> CpuMesh {
        let mut mesh = CpuMesh {
            positions: Positions::F32(self.positions.clone()),
            indices: Indices::U32(self.indices.clone()),
            normals: Some(self.normals.clone()),
            uvs: Some(self.uvs.clone()),
            ..Default::default()
        };
        mesh.compute_tangents();
        mesh
    }
}


/// UV sphere; latitude rows run from the north pole (v = 0) to the south pole
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut g = Geometry::default();

    let mut grid = Vec::with_capacity(hs as usize + 1);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        let row: Vec<u32> = (0..=ws)
            .map(|ix| {
                let u = ix as f32 / ws as f32;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let normal = vec3(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                g.push_vertex(normal * radius, normal, vec2(u, v))
            })
            .collect();
        grid.push(row);
    }

    for iy in 0..hs as usize {
        for ix in 0..ws as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // the pole rows collapse to a single triangle per segment
            if iy != 0 {
                g.push_triangle(a, b, d);
            }
            if iy != hs as usize - 1 {
                g.push_triangle(b, c, d);
            }
        }
    }
    g
}


/// Axis-aligned box centred at the origin, each face gridded independently
pub fn cuboid(width: f32, height: f32, depth: f32, segments: [u32; 3]) -> Geometry {
    let [ws, hs, ds] = segments.map(|s| s.max(1));
    let (x, y, z) = (0, 1, 2);
    let mut g = Geometry::default();

    let faces = [
        // (u, v, w), u dir, v dir, face width, face height, offset along w, grid
        ([z, y, x], -1.0, -1.0, depth, height, width, (ds, hs)),
        ([z, y, x], 1.0, -1.0, depth, height, -width, (ds, hs)),
        ([x, z, y], 1.0, 1.0, width, depth, height, (ws, ds)),
        ([x, z, y], 1.0, -1.0, width, depth, -height, (ws, ds)),
        ([x, y, z], 1.0, -1.0, width, height, depth, (ws, hs)),
        ([x, y, z], -1.0, -1.0, width, height, -depth, (ws, hs)),
    ];
    for (axes, udir, vdir, face_w, face_h, face_d, (gx, gy)) in faces {
        grid_face(&mut g, axes, udir, vdir, face_w, face_h, face_d, gx, gy);
    }
    g
}


#[allow(clippy::too_many_arguments)]
fn grid_face(
    g: &mut Geometry,
    [u, v, w]: [usize; 3],
    udir: f32,
    vdir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: u32,
    grid_y: u32,
) {
    let start = g.vertex_count() as u32;
    let (seg_w, seg_h) = (width / grid_x as f32, height / grid_y as f32);

    let mut normal = [0.0_f32; 3];
    normal[w] = depth.signum();
    let normal = Vec3::from(normal);

    for iy in 0..=grid_y {
        let py = iy as f32 * seg_h - height / 2.0;
        for ix in 0..=grid_x {
            let px = ix as f32 * seg_w - width / 2.0;
            let mut position = [0.0_f32; 3];
            position[u] = px * udir;
            position[v] = py * vdir;
            position[w] = depth / 2.0;
            let uv = vec2(ix as f32 / grid_x as f32, iy as f32 / grid_y as f32);
            g.push_vertex(Vec3::from(position), normal, uv);
        }
    }

    let row = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = start + ix + row * iy;
            let b = start + ix + row * (iy + 1);
            let c = start + (ix + 1) + row * (iy + 1);
            let d = start + (ix + 1) + row * iy;
            g.push_triangle(a, b, d);
            g.push_triangle(b, c, d);
        }
    }
}


/// Closed cylinder (or frustum) along +y, centred at the origin
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> Geometry {
    let rs = radial_segments.max(3);
    let hs = height_segments.max(1);
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let mut g = Geometry::default();

    let mut grid = Vec::with_capacity(hs as usize + 1);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let row: Vec<u32> = (0..=rs)
            .map(|ix| {
                let u = ix as f32 / rs as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let position = vec3(radius * sin, half - v * height, radius * cos);
                let normal = vec3(sin, slope, cos).normalize();
                g.push_vertex(position, normal, vec2(u, v))
            })
            .collect();
        grid.push(row);
    }
    for ix in 0..rs as usize {
        for iy in 0..hs as usize {
            let a = grid[iy][ix];
            let b = grid[iy + 1][ix];
            let c = grid[iy + 1][ix + 1];
            let d = grid[iy][ix + 1];
            g.push_triangle(a, b, d);
            g.push_triangle(b, c, d);
        }
    }

    if radius_top > 0.0 {
        cap(&mut g, radius_top, half, rs, true);
    }
    if radius_bottom > 0.0 {
        cap(&mut g, radius_bottom, half, rs, false);
    }
    g
}


fn cap(g: &mut Geometry, radius: f32, half: f32, radial_segments: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = vec3(0.0, sign, 0.0);

    // one centre vertex per segment so each wedge gets its own uv
    let centre_start = g.vertex_count() as u32;
    for _ in 0..radial_segments {
        g.push_vertex(vec3(0.0, half * sign, 0.0), normal, vec2(0.5, 0.5));
    }
    let rim_start = g.vertex_count() as u32;
    for ix in 0..=radial_segments {
        let (sin, cos) = (ix as f32 / radial_segments as f32 * TAU).sin_cos();
        let uv = vec2(cos * 0.5 + 0.5, 0.5 - sin * 0.5 * sign);
        g.push_vertex(vec3(radius * sin, half * sign, radius * cos), normal, uv);
    }

    for ix in 0..radial_segments {
        let c = centre_start + ix;
        let i = rim_start + ix;
        if top {
            g.push_triangle(i, i + 1, c);
        } else {
            g.push_triangle(i + 1, i, c);
        }
    }
}
