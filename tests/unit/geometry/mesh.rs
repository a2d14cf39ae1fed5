use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn cuboid_has_twelve_outward_faces() {
    let m = tessellate(&Solid::cuboid(2.0, 3.0, 4.0), DEFAULT_SEGMENTS);
    assert_eq!(m.positions.len(), 8);
    assert_eq!(m.triangles.len(), 12);

    let (lo, hi) = m.bounds().unwrap();
    assert_eq!(lo, Vec3::ZERO);
    assert_eq!(hi, Vec3::new(2.0, 3.0, 4.0));

    let centre = Vec3::new(1.0, 1.5, 2.0);
    for t in &m.triangles {
        let [a, ..] = m.triangle(*t);
        assert!(m.face_normal(*t).dot(a - centre) > 0.0, "inward face {t:?}");
    }
}

#[test]
fn cylinder_spans_its_height_along_z() {
    let m = tessellate(&Solid::cylinder(5.0, 10.0), 16);
    assert_eq!(m.triangles.len(), 16 * 4);
    let (lo, hi) = m.bounds().unwrap();
    assert_abs_diff_eq!(lo.z, 0.0);
    assert_abs_diff_eq!(hi.z, 10.0);
    assert_abs_diff_eq!(hi.x, 5.0);
}

#[test]
fn coaxial_bore_becomes_a_tube() {
    let solid = Solid::cylinder(10.0, 4.0).cut(Solid::cylinder(8.0, 4.0));
    let m = tessellate(&solid, 12);
    assert_eq!(m.triangles.len(), 12 * 8);
    let min_r = m
        .positions
        .iter()
        .map(|p| (p.x * p.x + p.y * p.y).sqrt())
        .fold(f64::INFINITY, f64::min);
    assert_abs_diff_eq!(min_r, 8.0, epsilon = 1e-9);
}

#[test]
fn other_cuts_keep_the_base_hull() {
    let solid = Solid::cuboid(1.0, 1.0, 1.0).cut(Solid::cylinder(0.2, 1.0));
    assert_eq!(
        tessellate(&solid, 8),
        tessellate(&Solid::cuboid(1.0, 1.0, 1.0), 8)
    );
}

#[test]
fn torus_stays_within_its_radii() {
    let m = tessellate(&Solid::torus(10.0, 2.0), 16);
    for p in &m.positions {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((8.0 - 1e-9..=12.0 + 1e-9).contains(&r));
        assert!(p.z.abs() <= 2.0 + 1e-9);
    }
}

#[test]
fn quarter_turn_about_y_points_z_along_x() {
    let q = rotation(Axis::Y, 90.0);
    let v = q * Vec3::Z;
    assert_abs_diff_eq!(v.x, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(v.z, 0.0, epsilon = 1e-12);
}

#[test]
fn append_reindexes_triangles() {
    let mut a = tessellate(&Solid::cuboid(1.0, 1.0, 1.0), 8);
    let b = a.clone();
    a.append(&b);
    assert_eq!(a.positions.len(), 16);
    assert_eq!(a.triangles[12], [8, 10, 11]);
}
