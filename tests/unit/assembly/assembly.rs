use approx::assert_abs_diff_eq;

use super::*;
use crate::cad::{CadService, MemoryCad};
use crate::foundation::core::Vec3;
use crate::params::{InductionParams, ProcessModeKind};

fn params(kind: ProcessModeKind) -> ParameterSet {
    ParameterSet::new(3.0, ProcessMode::from_kind(kind))
}

#[test]
fn induction_line_mass_and_power() {
    let info = SystemInfo::from_params(&params(ProcessModeKind::InductionHorizontal));
    // 0.13 m x 0.13 m x 12 m of steel.
    assert_abs_diff_eq!(info.body_mass_kg, 0.0169 * 12.0 * 7850.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        info.line_mass_kg,
        info.body_mass_kg + 8.0 * 45.0 + 18.0 * 25.0 + 850.0,
        epsilon = 1e-9
    );
    assert_eq!(info.power_kw, 1200.0);
    assert!(info.comment().contains("Installed power: 1200 kW"));
    assert!(info.comment().starts_with("BILLET INDUCTION HEATING LINE"));
}

#[test]
fn system_info_ignores_the_global_scale() {
    let a = SystemInfo::from_params(&ParameterSet::new(
        1.0,
        ProcessMode::from_kind(ProcessModeKind::CastingVertical),
    ));
    let b = SystemInfo::from_params(&params(ProcessModeKind::CastingVertical));
    assert_eq!(a, b);
    assert_eq!(a.roller_count, 32);
    assert_eq!(a.power_kw, FURNACE_POWER_KW);
}

#[test]
fn every_group_is_present() {
    let asm = Assembly::build(&params(ProcessModeKind::InductionHorizontal)).unwrap();
    let grouped = asm.grouped();
    assert_eq!(grouped.len(), PartGroup::ALL.len());
    assert_eq!(grouped[&PartGroup::Structure].len(), 4);
    assert_eq!(grouped[&PartGroup::Cooling].len(), 0);
    let total: usize = grouped.values().map(Vec::len).sum();
    assert_eq!(total, asm.parts().len());
    assert_eq!(asm.moving_part().unwrap().name, "billet");
}

#[test]
fn invalid_parameters_fail_before_composing() {
    let p = ParameterSet::new(
        1.0,
        ProcessMode::HorizontalInduction(InductionParams {
            coil_height: -1.0,
            ..InductionParams::default()
        }),
    );
    let err = Assembly::build(&p).unwrap_err();
    assert!(err.is_config(), "{err}");
}

#[test]
fn compose_mirrors_the_catalog() {
    let asm = Assembly::build(&params(ProcessModeKind::CastingVertical)).unwrap();
    let mut cad = MemoryCad::new();
    let composed = compose(&mut cad, &asm, "billet_line").unwrap();

    assert_eq!(composed.objects.len(), asm.parts().len());
    assert_eq!(cad.solids(composed.document).unwrap(), composed.object_ids());
    for (part, (name, id)) in asm.parts().iter().zip(&composed.objects) {
        assert_eq!(&part.name, name);
        assert_eq!(cad.color(*id).unwrap(), part.color);
    }

    let groups = cad.groups(composed.document).unwrap();
    let labels: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        labels,
        ["01_heating", "02_transport", "03_structure", "04_cooling", "05_control"]
    );
    let members: usize = groups.iter().map(|(_, m)| m.len()).sum();
    assert_eq!(members, asm.parts().len());

    assert_eq!(composed.labels_created, asm.catalog.annotations.len());
    assert_eq!(composed.labels_failed, 0);
    assert_eq!(
        cad.comment(composed.document).unwrap(),
        asm.info.comment()
    );
}

#[test]
fn moving_part_starts_at_its_rest_placement() {
    let asm = Assembly::build(&params(ProcessModeKind::CastingVertical)).unwrap();
    let mut cad = MemoryCad::new();
    let composed = compose(&mut cad, &asm, "d").unwrap();
    assert_eq!(composed.object("strand"), Some(composed.moving));
    let rest = asm.catalog.moving.rest;
    assert_eq!(cad.placement(composed.moving).unwrap(), Vec3::new(0.0, 0.0, rest));

    let (lo, hi) = cad.scene_mesh(composed.moving).unwrap().mesh.bounds().unwrap();
    assert_abs_diff_eq!(lo.z, rest, epsilon = 1e-9);
    assert_abs_diff_eq!(hi.z, rest + asm.catalog.moving.length, epsilon = 1e-9);
    assert_abs_diff_eq!(lo.x + hi.x, 0.0, epsilon = 1e-9);
}

#[test]
fn label_failures_are_counted_not_fatal() {
    let asm = Assembly::build(&params(ProcessModeKind::CastingVertical)).unwrap();
    assert!(!asm.catalog.annotations.is_empty());
    let mut cad = MemoryCad::new().without_labels();
    let composed = compose(&mut cad, &asm, "d").unwrap();
    assert_eq!(composed.labels_created, 0);
    assert_eq!(composed.labels_failed, asm.catalog.annotations.len());
    assert_eq!(composed.objects.len(), asm.parts().len());
}

#[test]
fn composing_twice_gives_identical_documents() {
    let asm = Assembly::build(&params(ProcessModeKind::InductionHorizontal)).unwrap();
    let mut cad = MemoryCad::new();
    let a = compose(&mut cad, &asm, "a").unwrap();
    let b = compose(&mut cad, &asm, "b").unwrap();
    assert_ne!(a.document, b.document);

    let names = |c: &ComposedAssembly| c.objects.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
    assert_eq!(names(&a), names(&b));
    for ((_, x), (_, y)) in a.objects.iter().zip(&b.objects) {
        assert_eq!(
            cad.scene_mesh(*x).unwrap().mesh,
            cad.scene_mesh(*y).unwrap().mesh
        );
    }
}
