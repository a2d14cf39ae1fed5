//! Plant equipment around the casting strand. Purely visual; none of it takes part in the
//! thermal model.

use crate::foundation::core::{Axis, Rgb, Vec3};
use crate::params::CastingParams;

use super::{Annotation, Part, PartGroup, PartKind, Solid, palette};

/// Caption lines for the side panel of the labeled video, one entry per equipment block.
pub const OVERLAY_CAPTIONS: &[&str] = &[
    "Induction furnace\nCapacity 5 t/h | Power 3500 kW",
    "Melting system\nRefractory crucible",
    "Continuous casting\nBillets and balls 150x150 mm",
    "Ball molder\nSteel ball forming line",
    "Power transformer\n4000 kVA",
    "Cooling system\nTower 500 m3/h",
    "Bridge crane\nCapacity 15 t",
    "Fume extraction\nCapture and filtering",
    "Scrap loader\nAutomated charging",
    "PLC and SCADA\nFull automation",
    "Sensors\nTemperature | level | flow",
    "Safety system\nAlarms and emergency stops",
];

const PYROMETER_COUNT: u32 = 4;

pub(super) struct Peripherals {
    pub parts: Vec<Part>,
    pub annotations: Vec<Annotation>,
}

fn equipment(name: &str, group: PartGroup, solid: Solid, color: Rgb) -> Part {
    Part::new(name, PartKind::Equipment, group, solid, color)
}

pub(super) fn casting_peripherals(p: &CastingParams, scale: f64) -> Peripherals {
    let s = |mm: f64| mm * scale;
    let mold_h = s(p.mold_height);
    let label_size = s(40.0);
    let mut parts = Vec::new();
    let mut annotations = Vec::new();
    let mut label = |text: &str, x: f64, y: f64, z: f64| {
        annotations.push(Annotation::new(text, Vec3::new(x, y, z), label_size));
    };

    // Furnace: open crucible ringed by its induction coil, tube clear of the wall.
    let (fx, fz) = (s(-2500.0), mold_h + s(600.0));
    parts.push(
        equipment(
            "furnace_crucible",
            PartGroup::Heating,
            Solid::cylinder(s(500.0), s(700.0)).cut(Solid::cylinder(s(420.0), s(700.0))),
            Rgb::new(0.5, 0.5, 0.55),
        )
        .at(fx, 0.0, fz),
    );
    parts.push(
        equipment(
            "furnace_coil",
            PartGroup::Heating,
            Solid::torus(s(600.0), s(80.0)),
            Rgb::new(0.95, 0.6, 0.2),
        )
        .at(fx, 0.0, fz + s(350.0)),
    );
    label(
        "Induction furnace\n5 t/h | 3500 kW",
        fx - s(400.0),
        s(700.0),
        fz + s(800.0),
    );

    let (x, y, z) = (s(-4300.0), s(-600.0), mold_h + s(200.0));
    parts.push(
        equipment(
            "transformer",
            PartGroup::Heating,
            Solid::cuboid(s(900.0), s(600.0), s(800.0)),
            Rgb::new(0.3, 0.35, 0.45),
        )
        .at(x, y, z),
    );
    label("Transformer 4000 kVA", x - s(200.0), y, z + s(900.0));

    let (x, y, z) = (s(2800.0), s(-1500.0), s(-400.0));
    parts.push(
        equipment(
            "cooling_tower",
            PartGroup::Cooling,
            Solid::cylinder(s(700.0), s(1200.0)),
            Rgb::new(0.6, 0.8, 0.9),
        )
        .at(x, y, z),
    );
    label("Cooling tower 500 m3/h", x - s(300.0), y, z + s(1300.0));

    let (x1, x2, z) = (s(-3200.0), s(3200.0), mold_h + s(2600.0));
    parts.push(
        equipment(
            "crane_beam",
            PartGroup::Transport,
            Solid::cuboid(x2 - x1, s(200.0), s(200.0)),
            Rgb::new(0.95, 0.85, 0.2),
        )
        .at(x1, s(1200.0), z),
    );
    parts.push(
        equipment(
            "crane_hook",
            PartGroup::Transport,
            Solid::cylinder(s(60.0), s(800.0)),
            Rgb::new(0.9, 0.6, 0.1),
        )
        .at(0.0, s(1200.0), z - s(800.0)),
    );
    label("Bridge crane 15 t", s(-200.0), s(1300.0), z + s(200.0));

    let (x, y, z) = (s(2600.0), s(800.0), s(200.0));
    parts.push(
        equipment(
            "fume_filter",
            PartGroup::Structure,
            Solid::cuboid(s(1000.0), s(700.0), s(1000.0)),
            Rgb::new(0.5, 0.6, 0.65),
        )
        .at(x, y, z),
    );
    label(
        "Fume extraction\nCapture and filtering",
        x - s(400.0),
        y,
        z + s(1100.0),
    );

    let (x, y, z) = (s(-3000.0), s(-1200.0), mold_h + s(200.0));
    parts.push(
        equipment(
            "scrap_loader",
            PartGroup::Transport,
            Solid::cuboid(s(800.0), s(600.0), s(600.0)),
            Rgb::new(0.6, 0.45, 0.3),
        )
        .at(x, y, z),
    );
    label(
        "Scrap loader\nAutomated charging",
        x - s(400.0),
        y,
        z + s(700.0),
    );

    let (x, y) = (s(2000.0), s(1600.0));
    parts.push(
        equipment(
            "plc_scada",
            PartGroup::Control,
            Solid::cuboid(s(600.0), s(300.0), s(1200.0)),
            Rgb::new(0.8, 0.8, 0.85),
        )
        .at(x, y, 0.0),
    );
    label("PLC + SCADA\nAutomated control", x - s(250.0), y, s(1250.0));

    let (x, y, z) = (s(3700.0), s(-2200.0), s(-600.0));
    parts.push(
        equipment(
            "ball_molder",
            PartGroup::Structure,
            Solid::cuboid(s(1200.0), s(800.0), s(900.0)),
            Rgb::new(0.7, 0.5, 0.4),
        )
        .at(x, y, z),
    );
    label(
        "Ball molder\nSteel ball forming",
        x - s(450.0),
        y,
        z + s(1000.0),
    );

    for i in 0..PYROMETER_COUNT {
        parts.push(
            Part::new(
                format!("pyrometer_{}", i + 1),
                PartKind::Sensor,
                PartGroup::Control,
                Solid::cylinder(s(40.0), s(160.0)),
                palette::SENSOR,
            )
            .rotated(Axis::Y, 90.0)
            .at(s(500.0), 0.0, -f64::from(i + 1) * s(p.spray_spacing) * 0.8),
        );
    }
    label(
        "Sensors\nTemperature | level | flow",
        s(700.0),
        0.0,
        s(200.0),
    );

    for (side, x) in [("left", s(-900.0)), ("right", s(900.0))] {
        parts.push(
            Part::new(
                format!("safety_post_{side}"),
                PartKind::SafetyPost,
                PartGroup::Control,
                Solid::cylinder(s(40.0), s(1200.0)),
                Rgb::new(0.9, 0.2, 0.2),
            )
            .at(x, s(-900.0), 0.0),
        );
    }
    label(
        "Safety system\nAlarms and stops",
        s(-1000.0),
        s(-900.0),
        s(1300.0),
    );

    Peripherals { parts, annotations }
}

/// Electrical cabinet shared by both process variants.
pub(super) fn control_panel(scale: f64) -> Part {
    Part::new(
        "control_panel",
        PartKind::ControlPanel,
        PartGroup::Control,
        Solid::cuboid(800.0 * scale, 300.0 * scale, 600.0 * scale),
        palette::PANEL,
    )
    .at(-900.0 * scale, -1500.0 * scale, 0.0)
}
