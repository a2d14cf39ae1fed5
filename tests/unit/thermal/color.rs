use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn endpoints_match_the_outer_stops() {
    assert_eq!(fraction_color(0.0), STOPS[0].1);
    assert!(fraction_color(1.0).max_channel_delta(STOPS[4].1) < 1e-12);
    assert_eq!(temperature_color(20.0, 20.0, 1200.0), STOPS[0].1);
    assert!(temperature_color(1200.0, 20.0, 1200.0).max_channel_delta(STOPS[4].1) < 1e-12);
}

#[test]
fn continuous_across_every_inner_boundary() {
    let eps = 1e-9;
    for (boundary, color) in &STOPS[1..4] {
        let below = fraction_color(boundary - eps);
        let above = fraction_color(boundary + eps);
        assert!(below.max_channel_delta(above) < 1e-6, "jump at {boundary}");
        assert!(fraction_color(*boundary).max_channel_delta(*color) < 1e-12);
    }
}

#[test]
fn out_of_range_input_is_clamped() {
    assert_eq!(fraction_color(-3.0), STOPS[0].1);
    assert!(fraction_color(7.0).max_channel_delta(STOPS[4].1) < 1e-12);
    assert_eq!(fraction_color(f64::NAN), STOPS[0].1);
}

#[test]
fn midpoint_of_a_band_is_linear() {
    let c = fraction_color(0.75);
    assert_abs_diff_eq!(c.r, 0.965, epsilon = 1e-12);
    assert_abs_diff_eq!(c.g, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(c.b, 0.065, epsilon = 1e-12);
}

#[test]
fn dense_sweep_has_no_visible_steps() {
    let n = 10_000;
    let mut prev = fraction_color(0.0);
    for i in 1..=n {
        let next = fraction_color(i as f64 / n as f64);
        assert!(prev.max_channel_delta(next) < 0.01);
        prev = next;
    }
}
