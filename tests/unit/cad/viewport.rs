use super::*;
use crate::cad::MemoryCad;
use crate::geometry::Primitive;

fn out_path(name: &str) -> std::path::PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("capture.png")
}

fn one_box() -> (MemoryCad, DocumentId) {
    let mut cad = MemoryCad::new();
    let doc = cad.create_document("d").unwrap();
    let s = cad
        .add_shape(Primitive::Cuboid {
            dx: 100.0,
            dy: 100.0,
            dz: 100.0,
        })
        .unwrap();
    let o = cad.add_object(doc, "box", s).unwrap();
    cad.set_color(o, Rgb::new(1.0, 0.0, 0.0)).unwrap();
    (cad, doc)
}

#[test]
fn headless_viewport_is_unavailable() {
    let (cad, doc) = one_box();
    let mut v = HeadlessViewport;
    assert!(v.set_isometric_view().unwrap_err().is_unavailable());
    assert!(v.fit_view(&cad, doc).unwrap_err().is_unavailable());
    let err = v
        .capture_image(&cad, doc, Path::new("unused.png"), Resolution::new(8, 8))
        .unwrap_err();
    assert!(err.is_unavailable());
}

#[test]
fn fit_view_covers_the_projected_scene() {
    let (cad, doc) = one_box();
    let mut v = CpuViewport::new();
    v.fit_view(&cad, doc).unwrap();
    let front = v.camera().unwrap().view;
    assert!((front.width() - 100.0).abs() < 1e-9);
    assert!((front.height() - 100.0).abs() < 1e-9);

    v.set_isometric_view().unwrap();
    assert!(v.camera().is_none());
    v.fit_view(&cad, doc).unwrap();
    let iso = v.camera().unwrap().view;
    assert!(iso.width() > front.width());
}

#[test]
fn capture_writes_a_png_of_the_requested_size() {
    let (cad, doc) = one_box();
    let path = out_path("cad_viewport_capture");
    let mut v = CpuViewport::new();
    v.set_isometric_view().unwrap();
    v.capture_image(&cad, doc, &path, Resolution::new(64, 48))
        .unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (64, 48));
    let corner = img.get_pixel(0, 0).0;
    for (got, want) in corner.iter().zip(BACKGROUND) {
        assert!(got.abs_diff(want) <= 1, "{corner:?}");
    }
    // The red box fills the centre.
    let c = img.get_pixel(32, 24).0;
    assert!(c[0] > c[1] && c[0] > c[2], "{c:?}");
}

#[test]
fn oversized_capture_is_unsupported() {
    let (cad, doc) = one_box();
    let mut v = CpuViewport::new();
    let err = v
        .capture_image(
            &cad,
            doc,
            Path::new("never.png"),
            Resolution::new(100_000, 2),
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unsupported(_)));
}
