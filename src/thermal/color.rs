use crate::foundation::core::Rgb;

/// `(fraction, color)` gradient stops: cold gray → red → orange → yellow → pale yellow.
pub const STOPS: [(f64, Rgb); 5] = [
    (0.00, Rgb::new(0.55, 0.55, 0.55)),
    (0.25, Rgb::new(0.90, 0.05, 0.03)),
    (0.60, Rgb::new(0.95, 0.15, 0.03)),
    (0.90, Rgb::new(0.98, 0.85, 0.10)),
    (1.00, Rgb::new(0.98, 0.99, 0.355)),
];

/// Piecewise-linear color for a temperature fraction. Out-of-range input is clamped, NaN maps
/// to the cold end.
pub fn fraction_color(frac: f64) -> Rgb {
    let f = if frac.is_nan() {
        0.0
    } else {
        frac.clamp(0.0, 1.0)
    };
    for pair in STOPS.windows(2) {
        let [(f0, c0), (f1, c1)] = [pair[0], pair[1]];
        if f <= f1 {
            return Rgb::lerp(c0, c1, (f - f0) / (f1 - f0));
        }
    }
    STOPS[STOPS.len() - 1].1
}

/// Color of a temperature inside `[min, max]`.
pub fn temperature_color(temp: f64, min: f64, max: f64) -> Rgb {
    fraction_color((temp - min) / (max - min))
}

#[cfg(test)]
#[path = "../../tests/unit/thermal/color.rs"]
mod tests;
