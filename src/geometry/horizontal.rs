use crate::foundation::core::Axis;
use crate::params::InductionParams;

use super::peripherals::control_panel;
use super::{MovingBody, Part, PartCatalog, PartGroup, PartKind, Solid, Travel, palette};

/// Entry face X of every coil: `start_offset + i * spacing`, scaled.
pub fn coil_offsets(p: &InductionParams, scale: f64) -> Vec<f64> {
    (0..p.coil_count)
        .map(|i| (p.coil_start_offset + f64::from(i) * p.coil_spacing) * scale)
        .collect()
}

/// Billet along +X through a series of coaxial coils, carried by a roller table.
pub fn induction_catalog(p: &InductionParams, scale: f64) -> PartCatalog {
    let s = |mm: f64| mm * scale;
    let section = s(p.billet_section);
    let length = s(p.billet_length);
    let coil_h = s(p.coil_height);
    let outer = s(p.coil_outer_diameter) / 2.0;
    let inner = s(p.coil_inner_diameter) / 2.0;

    let mut parts = Vec::new();

    // Cross-section centred on the line axis; the X position comes from the placement.
    parts.push(
        Part::new(
            "billet",
            PartKind::Billet,
            PartGroup::Heating,
            Solid::cuboid(length, section, section),
            palette::STEEL,
        )
        .at(0.0, -section / 2.0, -section / 2.0),
    );

    let offsets = coil_offsets(p, scale);
    for (i, x) in offsets.iter().enumerate() {
        parts.push(
            Part::new(
                format!("coil_{:02}", i + 1),
                PartKind::Coil,
                PartGroup::Heating,
                Solid::cylinder(outer, coil_h).cut(Solid::cylinder(inner, coil_h)),
                palette::COPPER,
            )
            .rotated(Axis::Y, 90.0)
            .at(*x, 0.0, 0.0),
        );
    }

    let roller_r = s(p.roller_diameter) / 2.0;
    let roller_w = s(p.roller_width);
    // Clear of the coil shells as well as the billet.
    let roller_z = -(outer + roller_r + s(p.roller_clearance));
    for i in 0..p.roller_count {
        parts.push(
            Part::new(
                format!("roller_{:02}", i + 1),
                PartKind::Roller,
                PartGroup::Transport,
                Solid::cylinder(roller_r, roller_w),
                palette::ROLLER,
            )
            .rotated(Axis::X, 90.0)
            .at(f64::from(i) * s(p.roller_spacing), roller_w / 2.0, roller_z),
        );
    }

    let (cx, cy) = (s(p.column_offset_x), s(p.column_offset_y));
    let corners = [(cx, cy), (-cx, cy), (cx, -cy), (-cx, -cy)];
    for (i, (x, y)) in corners.into_iter().enumerate() {
        parts.push(
            Part::new(
                format!("column_{}", i + 1),
                PartKind::Column,
                PartGroup::Structure,
                Solid::cylinder(s(p.column_diameter) / 2.0, s(p.frame_height)),
                palette::COLUMN,
            )
            .at(x, y, 0.0),
        );
    }

    if p.create_sensors {
        for (i, x) in offsets.iter().enumerate() {
            parts.push(
                Part::new(
                    format!("sensor_temp_{:02}", i + 1),
                    PartKind::Sensor,
                    PartGroup::Control,
                    Solid::cylinder(s(25.0), s(150.0)),
                    palette::SENSOR,
                )
                .at(x + coil_h / 2.0, 0.0, outer + s(50.0)),
            );
        }
    }

    if p.create_pipes {
        let pipe_y = outer + s(50.0);
        for (i, x) in offsets.iter().enumerate() {
            for (name, z, color) in [
                ("pipe_in", s(-100.0), palette::PIPE_IN),
                ("pipe_out", s(100.0), palette::PIPE_OUT),
            ] {
                parts.push(
                    Part::new(
                        format!("{name}_{:02}", i + 1),
                        PartKind::Pipe,
                        PartGroup::Cooling,
                        Solid::cylinder(s(10.0), s(500.0)),
                        color,
                    )
                    .rotated(Axis::Y, 90.0)
                    .at(x + coil_h / 2.0, pipe_y, z),
                );
            }
        }
    }

    parts.push(control_panel(scale));

    PartCatalog {
        parts,
        annotations: Vec::new(),
        moving: billet_body(p, scale),
    }
}

/// Billet pushed along +X; its placement coordinate is the trailing face.
pub(super) fn billet_body(p: &InductionParams, scale: f64) -> MovingBody {
    let length = p.billet_length * scale;
    MovingBody {
        part: "billet".to_string(),
        axis: Axis::X,
        travel: Travel::Forward,
        length,
        rest: -length / 2.0,
    }
}
