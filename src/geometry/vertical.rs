use crate::foundation::core::Axis;
use crate::params::CastingParams;

use super::peripherals::{casting_peripherals, control_panel};
use super::{MovingBody, Part, PartCatalog, PartGroup, PartKind, Solid, Travel, palette};

const SPRAY_ANGLES: [u32; 4] = [0, 90, 180, 270];

/// Z of every spray ring, top to bottom: `-(i + 1) * spacing`.
pub fn spray_levels(p: &CastingParams, scale: f64) -> Vec<f64> {
    (0..p.spray_zone_count)
        .map(|i| -f64::from(i + 1) * p.spray_spacing * scale)
        .collect()
}

/// Axis height of every guide roller, top to bottom, two per pair.
///
/// Rollers step down by half a pitch starting just under the mold. A roller that would come
/// within `radius + nozzle radius + clearance` of a spray ring is pushed below that ring.
pub fn guide_roller_levels(p: &CastingParams, scale: f64) -> Vec<f64> {
    let step = p.spray_spacing * p.roller_pitch_ratio * scale / 2.0;
    let radius = p.guide_roller_radius * scale;
    let clearance = p.guide_roller_clearance * scale;
    let keep_out = radius + p.spray_nozzle_radius * scale + clearance;
    let sprays = spray_levels(p, scale);

    let mut levels: Vec<f64> = Vec::with_capacity(2 * p.roller_pair_count as usize);
    for _ in 0..2 * p.roller_pair_count {
        let mut z = match levels.last() {
            Some(prev) => prev - step,
            None => -(radius + clearance),
        };
        // Rings are sorted downward, so one pass settles z.
        for ring in &sprays {
            if (z - ring).abs() < keep_out {
                z = ring - keep_out;
            }
        }
        levels.push(z);
    }
    levels
}

/// Vertical strand descending from the mold, spray rings, guide rollers and the casting
/// peripherals around them.
pub fn casting_catalog(p: &CastingParams, scale: f64) -> PartCatalog {
    let s = |mm: f64| mm * scale;
    let section = s(p.strand_section);
    let mold = s(p.mold_size());
    let mold_h = s(p.mold_height);

    let mut parts = Vec::new();

    // Cross-section centred on the casting axis; the Z position comes from the placement.
    parts.push(
        Part::new(
            "strand",
            PartKind::Strand,
            PartGroup::Heating,
            Solid::cuboid(section, section, s(p.strand_length)),
            palette::STEEL,
        )
        .at(-section / 2.0, -section / 2.0, 0.0),
    );

    parts.push(
        Part::new(
            "mold",
            PartKind::Mold,
            PartGroup::Cooling,
            Solid::cuboid(mold, mold, mold_h),
            palette::MOLD_COPPER,
        )
        .at(-mold / 2.0, -mold / 2.0, 0.0),
    );

    let (tw, td) = (s(p.tundish_width), s(p.tundish_depth));
    parts.push(
        Part::new(
            "tundish",
            PartKind::Tundish,
            PartGroup::Heating,
            Solid::cuboid(tw, td, s(p.tundish_height)),
            palette::TUNDISH,
        )
        .at(-tw / 2.0, -td / 2.0, mold_h + s(p.tundish_gap)),
    );

    let ring = mold / 2.0 + s(p.spray_ring_gap);
    let nozzle_len = s(p.spray_nozzle_length);
    for (zone, z) in spray_levels(p, scale).into_iter().enumerate() {
        for angle in SPRAY_ANGLES {
            let (sin, cos) = f64::from(angle).to_radians().sin_cos();
            parts.push(
                Part::new(
                    format!("spray_{:02}_{angle:03}", zone + 1),
                    PartKind::SprayNozzle,
                    PartGroup::Cooling,
                    Solid::cylinder(s(p.spray_nozzle_radius), nozzle_len),
                    palette::SPRAY,
                )
                .rotated(Axis::Y, 90.0)
                .at(ring * cos - nozzle_len / 2.0, ring * sin, z),
            );
        }
    }

    let (radius, length, offset) = (
        s(p.guide_roller_radius),
        s(p.guide_roller_length),
        s(p.guide_roller_offset),
    );
    for (j, z) in guide_roller_levels(p, scale).into_iter().enumerate() {
        let i = j / 2;
        let part = Part::new(
            if j % 2 == 0 {
                format!("guide_roller_x_{i:02}")
            } else {
                format!("guide_roller_y_{i:02}")
            },
            PartKind::GuideRoller,
            PartGroup::Transport,
            Solid::cylinder(radius, length),
            palette::GUIDE_ROLLER,
        );
        // Even rollers lie along Y, odd ones along X.
        parts.push(if j % 2 == 0 {
            part.rotated(Axis::X, 90.0).at(-offset, length / 2.0, z)
        } else {
            part.rotated(Axis::Y, 90.0).at(-length / 2.0, -offset, z)
        });
    }

    let mut annotations = Vec::new();
    if p.create_peripherals {
        let peripherals = casting_peripherals(p, scale);
        parts.extend(peripherals.parts);
        annotations = peripherals.annotations;
    }
    parts.push(control_panel(scale));

    PartCatalog {
        parts,
        annotations,
        moving: strand_body(p, scale),
    }
}

/// Strand withdrawn downward; its placement coordinate is the bottom face.
pub(super) fn strand_body(p: &CastingParams, scale: f64) -> MovingBody {
    MovingBody {
        part: "strand".to_string(),
        axis: Axis::Z,
        travel: Travel::Backward,
        length: p.strand_length * scale,
        rest: p.mold_height * scale,
    }
}
