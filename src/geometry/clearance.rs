//! Pairwise interference check over the static parts of a catalog.
//!
//! Boxes are compared first; pairs whose world bounds overlap are then tested by sampling the
//! tessellated surface of each part (vertices, edge midpoints and face centroids) against the
//! exact solid of the other. Surfaces that only touch do not count.

use glam::DQuat;

use crate::foundation::core::Vec3;

use super::mesh::{self, DEFAULT_SEGMENTS};
use super::{Part, Primitive, Solid};

/// Penetration below this depth (mm) is treated as contact.
const CONTACT_TOLERANCE: f64 = 1e-6;

struct Placed<'a> {
    part: &'a Part,
    rotation: DQuat,
    samples: Vec<Vec3>,
    lo: Vec3,
    hi: Vec3,
}

impl<'a> Placed<'a> {
    fn new(part: &'a Part) -> Self {
        let mut m = mesh::tessellate(&part.solid, DEFAULT_SEGMENTS);
        let rotation = part
            .rotation
            .map(|r| mesh::rotation(r.axis, r.degrees))
            .unwrap_or_default();
        m.map_positions(|p| rotation * p + part.offset);

        let mut samples = m.positions.clone();
        for t in &m.triangles {
            let [a, b, c] = m.triangle(*t);
            samples.extend([(a + b + c) / 3.0, (a + b) / 2.0, (b + c) / 2.0, (a + c) / 2.0]);
        }
        let (lo, hi) = m.bounds().unwrap_or((part.offset, part.offset));
        Self {
            part,
            rotation,
            samples,
            lo,
            hi,
        }
    }

    fn boxes_overlap(&self, other: &Placed<'_>) -> bool {
        let depth = self.hi.min(other.hi) - self.lo.max(other.lo);
        depth.min_element() > CONTACT_TOLERANCE
    }

    /// World point into the part's local frame.
    fn to_local(&self, p: Vec3) -> Vec3 {
        self.rotation.inverse() * (p - self.part.offset)
    }

    fn penetrated_by(&self, other: &Placed<'_>) -> bool {
        other
            .samples
            .iter()
            .any(|p| solid_contains(&self.part.solid, self.to_local(*p)))
    }
}

/// Strict interior test in the solid's local frame.
fn solid_contains(solid: &Solid, p: Vec3) -> bool {
    match solid {
        Solid::Primitive(prim) => primitive_contains(prim, p),
        Solid::Cut { base, tool } => solid_contains(base, p) && !solid_touches(tool, p),
    }
}

/// Interior or boundary.
fn solid_touches(solid: &Solid, p: Vec3) -> bool {
    match solid {
        Solid::Primitive(prim) => primitive_depth(prim, p) >= -CONTACT_TOLERANCE,
        Solid::Cut { base, tool } => solid_touches(base, p) && !solid_contains(tool, p),
    }
}

fn primitive_contains(p: &Primitive, at: Vec3) -> bool {
    primitive_depth(p, at) > CONTACT_TOLERANCE
}

/// Distance from `at` to the nearest boundary face, negative outside.
fn primitive_depth(p: &Primitive, at: Vec3) -> f64 {
    match *p {
        Primitive::Cuboid { dx, dy, dz } => at
            .min(Vec3::new(dx, dy, dz) - at)
            .min_element(),
        Primitive::Cylinder { radius, height } => (radius - at.truncate().length())
            .min(at.z)
            .min(height - at.z),
        Primitive::Torus {
            major_radius,
            minor_radius,
        } => {
            let radial = at.truncate().length() - major_radius;
            minor_radius - radial.hypot(at.z)
        }
    }
}

/// Names of every pair of parts whose solids interpenetrate, in catalog order.
pub fn interferences<'a>(parts: impl IntoIterator<Item = &'a Part>) -> Vec<(&'a str, &'a str)> {
    let placed: Vec<Placed<'a>> = parts.into_iter().map(Placed::new).collect();
    let mut out = Vec::new();
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if a.boxes_overlap(b) && (a.penetrated_by(b) || b.penetrated_by(a)) {
                out.push((a.part.name.as_str(), b.part.name.as_str()));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/clearance.rs"]
mod tests;
