use approx::assert_abs_diff_eq;

use super::*;

fn out_dir(name: &str) -> std::path::PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn unit_box(cad: &mut MemoryCad) -> ShapeId {
    cad.add_shape(Primitive::Cuboid {
        dx: 10.0,
        dy: 20.0,
        dz: 30.0,
    })
    .unwrap()
}

#[test]
fn non_positive_dimensions_are_rejected() {
    let mut cad = MemoryCad::new();
    let err = cad
        .add_shape(Primitive::Cylinder {
            radius: 0.0,
            height: 5.0,
        })
        .unwrap_err();
    assert!(err.to_string().contains("cylinder"), "{err}");
}

#[test]
fn object_names_are_unique_per_document() {
    let mut cad = MemoryCad::new();
    let a = cad.create_document("a").unwrap();
    let b = cad.create_document("b").unwrap();
    let s = unit_box(&mut cad);

    cad.add_object(a, "strand", s).unwrap();
    assert!(cad.add_object(a, "strand", s).is_err());
    cad.add_object(b, "strand", s).unwrap();
    assert_eq!(cad.document_count(), 2);
    assert_eq!(cad.document_name(b).unwrap(), "b");
}

#[test]
fn unknown_handles_are_reported() {
    let cad = MemoryCad::new();
    let err = cad.scene_mesh(ObjectId(7)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::UnknownHandle {
            kind: "object",
            id: 7
        }
    ));
}

#[test]
fn rotate_then_translate_moves_the_shape() {
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let s = unit_box(&mut cad);
    cad.rotate(s, Vec3::ZERO, Axis::Z, 90.0).unwrap();
    cad.translate(s, Vec3::new(100.0, 0.0, 0.0)).unwrap();
    let o = cad.add_object(doc, "box", s).unwrap();
    cad.set_placement(o, Vec3::new(0.0, 0.0, 5.0)).unwrap();

    let (lo, hi) = cad.scene_mesh(o).unwrap().mesh.bounds().unwrap();
    // 90° about Z maps +X to +Y and +Y to -X.
    assert_abs_diff_eq!(lo.x, 80.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hi.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(lo.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hi.y, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(lo.z, 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hi.z, 35.0, epsilon = 1e-9);
}

#[test]
fn rotation_about_an_off_origin_pivot() {
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let s = cad
        .add_shape(Primitive::Cuboid {
            dx: 1.0,
            dy: 1.0,
            dz: 1.0,
        })
        .unwrap();
    cad.rotate(s, Vec3::new(10.0, 0.0, 0.0), Axis::Z, 180.0)
        .unwrap();
    let o = cad.add_object(doc, "cube", s).unwrap();
    let (lo, hi) = cad.scene_mesh(o).unwrap().mesh.bounds().unwrap();
    assert_abs_diff_eq!(lo.x, 19.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hi.x, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(lo.y, -1.0, epsilon = 1e-9);
}

#[test]
fn cut_of_a_transformed_shape_is_unsupported() {
    let mut cad = MemoryCad::new();
    let a = cad
        .add_shape(Primitive::Cylinder {
            radius: 10.0,
            height: 4.0,
        })
        .unwrap();
    let b = cad
        .add_shape(Primitive::Cylinder {
            radius: 8.0,
            height: 4.0,
        })
        .unwrap();
    let tube = cad.cut(a, b).unwrap();
    assert_ne!(tube, a);

    cad.translate(b, Vec3::X).unwrap();
    let err = cad.cut(a, b).unwrap_err();
    assert!(matches!(err, ServiceError::Unsupported(_)));
}

#[test]
fn groups_move_members_between_collections() {
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let s = unit_box(&mut cad);
    let o = cad.add_object(doc, "coil_01", s).unwrap();
    let heating = cad.add_group(doc, "01_heating").unwrap();
    let control = cad.add_group(doc, "05_control").unwrap();

    cad.add_to_group(heating, o).unwrap();
    cad.add_to_group(control, o).unwrap();
    let groups = cad.groups(doc).unwrap();
    assert_eq!(
        groups,
        vec![
            ("01_heating".to_string(), vec![]),
            ("05_control".to_string(), vec!["coil_01".to_string()]),
        ]
    );

    let other = cad.create_document("other").unwrap();
    let foreign = cad.add_group(other, "01_heating").unwrap();
    assert!(cad.add_to_group(foreign, o).is_err());
}

#[test]
fn labels_are_numbered_and_excluded_from_solids() {
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let s = unit_box(&mut cad);
    let o = cad.add_object(doc, "panel", s).unwrap();
    let l1 = cad
        .add_label(doc, &Annotation::new("FURNACE", Vec3::new(1.0, 2.0, 3.0), 40.0))
        .unwrap();
    cad.add_label(doc, &Annotation::new("CRANE", Vec3::ZERO, 40.0))
        .unwrap();

    assert_eq!(cad.object_name(l1).unwrap(), "label_01");
    assert_eq!(cad.placement(l1).unwrap(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(cad.labels(doc).unwrap().len(), 2);
    assert_eq!(cad.solids(doc).unwrap(), vec![o]);
    assert!(matches!(
        cad.scene_mesh(l1),
        Err(ServiceError::Unsupported(_))
    ));
}

#[test]
fn kernel_without_labels_refuses_them() {
    let mut cad = MemoryCad::new().without_labels();
    let doc = cad.create_document("d").unwrap();
    let err = cad
        .add_label(doc, &Annotation::new("X", Vec3::ZERO, 1.0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unsupported(_)));
}

#[test]
fn recompute_counts_successful_passes() {
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let s = unit_box(&mut cad);
    cad.add_object(doc, "b", s).unwrap();
    cad.recompute(doc).unwrap();
    cad.recompute(doc).unwrap();
    assert_eq!(cad.recompute_count(doc).unwrap(), 2);
}

#[test]
fn save_writes_a_json_snapshot() {
    let dir = out_dir("cad_memory_save");
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("billet_line").unwrap();
    cad.set_comment(doc, "mass 1 kg").unwrap();
    let s = unit_box(&mut cad);
    let o = cad.add_object(doc, "billet", s).unwrap();
    cad.set_color(o, Rgb::new(0.5, 0.25, 0.0)).unwrap();
    let g = cad.add_group(doc, "02_transport").unwrap();
    cad.add_to_group(g, o).unwrap();
    cad.add_label(doc, &Annotation::new("BILLET", Vec3::ZERO, 10.0))
        .unwrap();

    let path = dir.join("nested").join("billet_line.json");
    cad.save(doc, &path).unwrap();

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["name"], "billet_line");
    assert_eq!(json["comment"], "mass 1 kg");
    assert_eq!(json["groups"][0], "02_transport");
    assert_eq!(json["objects"][0]["type"], "solid");
    assert_eq!(json["objects"][0]["group"], "02_transport");
    assert_eq!(json["objects"][1]["type"], "label");
    assert_eq!(json["objects"][1]["annotation"]["text"], "BILLET");
}

#[test]
fn step_export_has_one_brep_per_object() {
    let dir = out_dir("cad_memory_step");
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let a = unit_box(&mut cad);
    let b = cad
        .add_shape(Primitive::Torus {
            major_radius: 50.0,
            minor_radius: 5.0,
        })
        .unwrap();
    let oa = cad.add_object(doc, "mold", a).unwrap();
    let ob = cad.add_object(doc, "furnace_coil", b).unwrap();

    let path = dir.join("line.step");
    cad.export(&[oa, ob], &path, ExportFormat::Step).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("ISO-10303-21;"));
    assert!(text.trim_end().ends_with("END-ISO-10303-21;"));
    assert_eq!(text.matches("FACETED_BREP(").count(), 2);
    assert!(text.contains("FACETED_BREP('mold'"));
    assert!(text.contains("FILE_NAME('line.step'"));
    // A box contributes twelve facets.
    assert!(text.matches("POLY_LOOP(").count() > 12);
}

#[test]
fn obj_export_offsets_vertex_indices_per_object() {
    let dir = out_dir("cad_memory_obj");
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let a = unit_box(&mut cad);
    let b = unit_box(&mut cad);
    let oa = cad.add_object(doc, "a", a).unwrap();
    let ob = cad.add_object(doc, "b", b).unwrap();

    let path = dir.join("line.obj");
    cad.export(&[oa, ob], &path, ExportFormat::Obj).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 16);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 24);
    let max_index = text
        .lines()
        .filter_map(|l| l.strip_prefix("f "))
        .flat_map(|l| l.split_whitespace().map(|i| i.parse::<usize>().unwrap()))
        .max()
        .unwrap();
    assert_eq!(max_index, 16);
}
