use approx::assert_abs_diff_eq;

use super::*;
use crate::params::{CastingParams, InductionParams, ProcessModeKind};

fn induction(scale: f64, p: InductionParams) -> ParameterSet {
    ParameterSet::new(scale, ProcessMode::HorizontalInduction(p))
}

fn casting(scale: f64, p: CastingParams) -> ParameterSet {
    ParameterSet::new(scale, ProcessMode::VerticalCasting(p))
}

fn catalog(kind: ProcessModeKind, scale: f64) -> PartCatalog {
    build_catalog(&ParameterSet::new(scale, ProcessMode::from_kind(kind))).unwrap()
}

#[test]
fn two_coils_sit_at_start_offset_plus_spacing() {
    let p = InductionParams {
        coil_count: 2,
        coil_spacing: 1500.0,
        ..InductionParams::default()
    };
    let cat = build_catalog(&induction(1.0, p)).unwrap();

    let coils: Vec<&Part> = cat
        .parts
        .iter()
        .filter(|part| part.kind == PartKind::Coil)
        .collect();
    assert_eq!(coils.len(), 2);
    assert_eq!(coils[0].name, "coil_01");
    assert_eq!(coils[1].name, "coil_02");
    assert_abs_diff_eq!(coils[0].offset.x, 500.0);
    assert_abs_diff_eq!(coils[1].offset.x, 2000.0);
    assert_eq!(coils[0].solid.kind_name(), "compound");
}

#[test]
fn default_counts_per_mode() {
    let cat = catalog(ProcessModeKind::InductionHorizontal, 3.0);
    assert_eq!(cat.count(PartKind::Billet), 1);
    assert_eq!(cat.count(PartKind::Coil), 8);
    assert_eq!(cat.count(PartKind::Roller), 18);
    assert_eq!(cat.count(PartKind::Column), 4);
    assert_eq!(cat.count(PartKind::ControlPanel), 1);
    assert_eq!(cat.count(PartKind::Sensor), 0);
    assert_eq!(cat.count(PartKind::Pipe), 0);
    assert_eq!(cat.moving.part, "billet");
    assert_eq!(cat.moving.axis, Axis::X);

    let cat = catalog(ProcessModeKind::CastingVertical, 3.0);
    assert_eq!(cat.count(PartKind::Strand), 1);
    assert_eq!(cat.count(PartKind::Mold), 1);
    assert_eq!(cat.count(PartKind::Tundish), 1);
    assert_eq!(cat.count(PartKind::SprayNozzle), 6 * 4);
    assert_eq!(cat.count(PartKind::GuideRoller), 16 * 2);
    assert_eq!(cat.count(PartKind::Sensor), 4);
    assert_eq!(cat.count(PartKind::SafetyPost), 2);
    assert!(cat.part("furnace_crucible").is_some());
    assert!(cat.part("crane_hook").is_some());
    assert!(!cat.annotations.is_empty());
    assert_eq!(cat.moving.part, "strand");
    assert_eq!(cat.moving.travel, Travel::Backward);
}

#[test]
fn optional_accessories_follow_their_flags() {
    let p = InductionParams {
        create_sensors: true,
        create_pipes: true,
        ..InductionParams::default()
    };
    let cat = build_catalog(&induction(1.0, p)).unwrap();
    assert_eq!(cat.count(PartKind::Sensor), 8);
    assert_eq!(cat.count(PartKind::Pipe), 16);
    assert!(cat.part("pipe_out_08").is_some());

    let c = CastingParams {
        create_peripherals: false,
        ..CastingParams::default()
    };
    let cat = build_catalog(&casting(1.0, c)).unwrap();
    assert_eq!(cat.count(PartKind::Equipment), 0);
    assert!(cat.annotations.is_empty());
    assert_eq!(cat.count(PartKind::ControlPanel), 1);
}

#[test]
fn every_dimension_and_offset_scales_linearly() {
    for kind in [
        ProcessModeKind::CastingVertical,
        ProcessModeKind::InductionHorizontal,
    ] {
        let a = catalog(kind, 1.0);
        let b = catalog(kind, 2.5);
        assert_eq!(a.parts.len(), b.parts.len());

        for (pa, pb) in a.parts.iter().zip(&b.parts) {
            assert_eq!(pa.name, pb.name);
            assert_eq!(pa.rotation, pb.rotation);
            for (da, db) in pa.solid.dimensions().iter().zip(pb.solid.dimensions()) {
                assert_abs_diff_eq!(da * 2.5, db, epsilon = 1e-9);
            }
            assert_abs_diff_eq!((pa.offset * 2.5).distance(pb.offset), 0.0, epsilon = 1e-9);
        }
        for (la, lb) in a.annotations.iter().zip(&b.annotations) {
            assert_abs_diff_eq!(la.size * 2.5, lb.size, epsilon = 1e-9);
            assert_abs_diff_eq!(
                (la.position * 2.5).distance(lb.position),
                0.0,
                epsilon = 1e-9
            );
        }
        assert_abs_diff_eq!(a.moving.length * 2.5, b.moving.length, epsilon = 1e-9);
        assert_abs_diff_eq!(a.moving.rest * 2.5, b.moving.rest, epsilon = 1e-9);
    }
}

#[test]
fn identical_parameters_give_identical_catalogs() {
    for kind in [
        ProcessModeKind::CastingVertical,
        ProcessModeKind::InductionHorizontal,
    ] {
        assert_eq!(catalog(kind, 3.0), catalog(kind, 3.0));
    }
}

#[test]
fn names_are_unique_in_both_modes() {
    for kind in [
        ProcessModeKind::CastingVertical,
        ProcessModeKind::InductionHorizontal,
    ] {
        let cat = catalog(kind, 1.0);
        let names: HashSet<&str> = cat.parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), cat.parts.len());
    }
}

#[test]
fn spray_rings_step_down_from_the_mold() {
    let c = CastingParams {
        spray_zone_count: 3,
        ..CastingParams::default()
    };
    let levels = spray_levels(&c, 2.0);
    assert_eq!(levels, vec![-2000.0, -4000.0, -6000.0]);

    let cat = build_catalog(&casting(2.0, c)).unwrap();
    let zone2 = cat.part("spray_02_090").unwrap();
    assert_abs_diff_eq!(zone2.offset.z, -4000.0);
    assert_eq!(
        zone2.rotation,
        Some(Rotation {
            axis: Axis::Y,
            degrees: 90.0
        })
    );
}

#[test]
fn fixed_parts_never_interpenetrate() {
    let full = InductionParams {
        create_sensors: true,
        create_pipes: true,
        ..InductionParams::default()
    };
    let bare = CastingParams {
        create_peripherals: false,
        ..CastingParams::default()
    };
    for scale in [0.5, 1.0, 3.0] {
        for set in [
            ParameterSet::new(scale, ProcessMode::from_kind(ProcessModeKind::CastingVertical)),
            ParameterSet::new(
                scale,
                ProcessMode::from_kind(ProcessModeKind::InductionHorizontal),
            ),
            induction(scale, full.clone()),
            casting(scale, bare.clone()),
        ] {
            let cat = build_catalog(&set).unwrap();
            assert_eq!(cat.interferences(), Vec::<(&str, &str)>::new());
        }
    }
}

#[test]
fn guide_rollers_start_under_the_mold_and_skip_spray_rings() {
    let c = CastingParams::default();
    let cat = build_catalog(&casting(1.0, c.clone())).unwrap();
    let levels = guide_roller_levels(&c, 1.0);
    assert_eq!(levels.len(), 32);
    assert_abs_diff_eq!(levels[0], -160.0);
    assert_abs_diff_eq!(levels[1], -460.0);
    assert_abs_diff_eq!(levels[2], -760.0);
    // -1060 would graze the first ring at -1000.
    assert_abs_diff_eq!(levels[3], -1200.0);
    assert!(levels.windows(2).all(|w| w[1] < w[0]));

    let keep_out = c.guide_roller_radius + c.spray_nozzle_radius + c.guide_roller_clearance;
    for z in &levels {
        assert!(z + c.guide_roller_radius <= -c.guide_roller_clearance);
        for ring in spray_levels(&c, 1.0) {
            assert!((z - ring).abs() >= keep_out, "roller at {z} vs ring {ring}");
        }
    }

    assert_abs_diff_eq!(cat.part("guide_roller_x_00").unwrap().offset.z, levels[0]);
    assert_abs_diff_eq!(cat.part("guide_roller_y_01").unwrap().offset.z, levels[3]);
}

#[test]
fn transport_rollers_pass_under_the_coils() {
    let p = InductionParams::default();
    let cat = build_catalog(&induction(1.0, p.clone())).unwrap();
    let coil_bottom = -p.coil_outer_diameter / 2.0;
    for roller in cat.parts.iter().filter(|part| part.kind == PartKind::Roller) {
        let top = roller.offset.z + p.roller_diameter / 2.0;
        assert_abs_diff_eq!(top, coil_bottom - p.roller_clearance, epsilon = 1e-9);
    }
}

#[test]
fn crowded_guide_rollers_are_rejected() {
    let c = CastingParams {
        roller_pitch_ratio: 0.1,
        ..CastingParams::default()
    };
    let err = build_catalog(&casting(1.0, c)).unwrap_err();
    assert!(err.is_config());
    let msg = err.to_string();
    assert!(msg.contains("overlap"), "{msg}");
    assert!(msg.contains("guide_roller_x_00"), "{msg}");
}

#[test]
fn invalid_table_is_rejected_before_any_part_is_listed() {
    let p = InductionParams {
        roller_diameter: 0.0,
        ..InductionParams::default()
    };
    let err = build_catalog(&induction(1.0, p)).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("roller_diameter"));
}

#[test]
fn moving_body_edges_follow_travel_direction() {
    let forward = MovingBody {
        part: "billet".into(),
        axis: Axis::X,
        travel: Travel::Forward,
        length: 10.0,
        rest: 0.0,
    };
    assert_eq!(forward.edges(5.0), (15.0, 5.0));
    assert_eq!(forward.placement(5.0), Vec3::new(5.0, 0.0, 0.0));

    let down = MovingBody {
        travel: Travel::Backward,
        axis: Axis::Z,
        ..forward
    };
    assert_eq!(down.edges(-20.0), (-20.0, -10.0));
    assert_eq!(down.placement(-20.0), Vec3::new(0.0, 0.0, -20.0));
}

#[test]
fn group_labels_are_ordered() {
    let labels: Vec<&str> = PartGroup::ALL.iter().map(|g| g.label()).collect();
    assert_eq!(
        labels,
        [
            "01_heating",
            "02_transport",
            "03_structure",
            "04_cooling",
            "05_control"
        ]
    );
}
