use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
    assert_eq!(Fps::integer(24).unwrap().as_f64(), 24.0);
}

#[test]
fn fps_formats_for_ffmpeg() {
    assert_eq!(Fps::integer(24).unwrap().to_ffmpeg_arg(), "24");
    assert_eq!(Fps::new(30000, 1001).unwrap().to_ffmpeg_arg(), "30000/1001");
}

#[test]
fn resolution_requires_even_non_zero() {
    assert!(Resolution::new(1920, 1080).validate().is_ok());
    assert!(Resolution::new(0, 1080).validate().is_err());
    assert!(Resolution::new(1921, 1080).validate().is_err());
}

#[test]
fn axis_units_are_orthonormal() {
    let [x, y, z] = [Axis::X, Axis::Y, Axis::Z].map(Axis::unit);
    assert_eq!(x.cross(y), z);
    assert_eq!(x.length(), 1.0);
    assert_eq!(y.dot(z), 0.0);
}

#[test]
fn rgb_lerp_hits_endpoints() {
    let a = Rgb::new(0.0, 0.5, 1.0);
    let b = Rgb::new(1.0, 0.5, 0.0);
    assert_eq!(Rgb::lerp(a, b, 0.0), a);
    assert_eq!(Rgb::lerp(a, b, 1.0), b);
    assert_eq!(Rgb::lerp(a, b, 0.5), Rgb::new(0.5, 0.5, 0.5));
}

#[test]
fn rgb_to_rgba8_clamps_and_is_opaque() {
    assert_eq!(Rgb::new(-1.0, 0.5, 2.0).to_rgba8(), [0, 128, 255, 255]);
}
