//! Triangle tessellation of shape descriptors, used by the in-process kernel for export and
//! rasterization.

use std::f64::consts::TAU;

use glam::DQuat;

use crate::foundation::core::{Axis, Vec3};

use super::{Primitive, Solid};

pub const DEFAULT_SEGMENTS: u32 = 24;

/// Indexed triangle list. Faces wind counter-clockwise seen from outside.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriMesh {
    fn push(&mut self, p: Vec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn append(&mut self, other: &TriMesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.triangles
            .extend(other.triangles.iter().map(|t| t.map(|i| i + base)));
    }

    pub fn map_positions(&mut self, f: impl Fn(Vec3) -> Vec3) {
        for p in &mut self.positions {
            *p = f(*p);
        }
    }

    /// Axis-aligned `(min, max)` corners, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    pub fn triangle(&self, t: [u32; 3]) -> [Vec3; 3] {
        t.map(|i| self.positions[i as usize])
    }

    /// Unnormalized face normal.
    pub fn face_normal(&self, t: [u32; 3]) -> Vec3 {
        let [a, b, c] = self.triangle(t);
        (b - a).cross(c - a)
    }
}

pub fn rotation(axis: Axis, degrees: f64) -> DQuat {
    DQuat::from_axis_angle(axis.unit(), degrees.to_radians())
}

/// Tessellate a solid in its local frame.
///
/// The only difference the kernel resolves exactly is a coaxial cylinder bored by a thinner
/// one (a tube); any other cut keeps the hull of its base.
pub fn tessellate(solid: &Solid, segments: u32) -> TriMesh {
    let n = segments.max(3);
    match solid {
        Solid::Primitive(p) => primitive(p, n),
        Solid::Cut { base, tool } => match (base.as_ref(), tool.as_ref()) {
            (
                Solid::Primitive(Primitive::Cylinder { radius, height }),
                Solid::Primitive(Primitive::Cylinder { radius: bore, .. }),
            ) if bore < radius => tube(*radius, *bore, *height, n),
            (base, _) => tessellate(base, n),
        },
    }
}

pub fn primitive(p: &Primitive, n: u32) -> TriMesh {
    match *p {
        Primitive::Cuboid { dx, dy, dz } => cuboid(dx, dy, dz),
        Primitive::Cylinder { radius, height } => cylinder(radius, height, n),
        Primitive::Torus {
            major_radius,
            minor_radius,
        } => torus(major_radius, minor_radius, n, (n / 2).max(6)),
    }
}

fn cuboid(dx: f64, dy: f64, dz: f64) -> TriMesh {
    let mut m = TriMesh::default();
    for k in 0..2 {
        for j in 0..2 {
            for i in 0..2 {
                m.push(Vec3::new(
                    f64::from(i) * dx,
                    f64::from(j) * dy,
                    f64::from(k) * dz,
                ));
            }
        }
    }
    m.triangles = vec![
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
    ];
    m
}

fn ring(m: &mut TriMesh, radius: f64, z: f64, n: u32) -> Vec<u32> {
    (0..n)
        .map(|k| {
            let (s, c) = (TAU * f64::from(k) / f64::from(n)).sin_cos();
            m.push(Vec3::new(radius * c, radius * s, z))
        })
        .collect()
}

fn cylinder(radius: f64, height: f64, n: u32) -> TriMesh {
    let mut m = TriMesh::default();
    let cb = m.push(Vec3::ZERO);
    let ct = m.push(Vec3::new(0.0, 0.0, height));
    let bottom = ring(&mut m, radius, 0.0, n);
    let top = ring(&mut m, radius, height, n);
    for k in 0..n as usize {
        let k1 = (k + 1) % n as usize;
        m.triangles.push([cb, bottom[k1], bottom[k]]);
        m.triangles.push([ct, top[k], top[k1]]);
        m.triangles.push([bottom[k], bottom[k1], top[k1]]);
        m.triangles.push([bottom[k], top[k1], top[k]]);
    }
    m
}

fn tube(outer: f64, inner: f64, height: f64, n: u32) -> TriMesh {
    let mut m = TriMesh::default();
    let ob = ring(&mut m, outer, 0.0, n);
    let ot = ring(&mut m, outer, height, n);
    let ib = ring(&mut m, inner, 0.0, n);
    let it = ring(&mut m, inner, height, n);
    for k in 0..n as usize {
        let k1 = (k + 1) % n as usize;
        m.triangles.push([ob[k], ob[k1], ot[k1]]);
        m.triangles.push([ob[k], ot[k1], ot[k]]);
        m.triangles.push([ib[k], it[k1], ib[k1]]);
        m.triangles.push([ib[k], it[k], it[k1]]);
        m.triangles.push([ot[k], ot[k1], it[k1]]);
        m.triangles.push([ot[k], it[k1], it[k]]);
        m.triangles.push([ob[k], ib[k1], ob[k1]]);
        m.triangles.push([ob[k], ib[k], ib[k1]]);
    }
    m
}

fn torus(major: f64, minor: f64, n: u32, m_segs: u32) -> TriMesh {
    let mut m = TriMesh::default();
    for i in 0..n {
        let (su, cu) = (TAU * f64::from(i) / f64::from(n)).sin_cos();
        for j in 0..m_segs {
            let (sv, cv) = (TAU * f64::from(j) / f64::from(m_segs)).sin_cos();
            let r = major + minor * cv;
            m.push(Vec3::new(r * cu, r * su, minor * sv));
        }
    }
    let idx = |i: u32, j: u32| (i % n) * m_segs + (j % m_segs);
    for i in 0..n {
        for j in 0..m_segs {
            let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
            m.triangles.push([a, b, c]);
            m.triangles.push([a, c, d]);
        }
    }
    m
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mesh.rs"]
mod tests;
