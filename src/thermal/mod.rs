//! Cosmetic heat model driving the moving body: where it is on a frame and how hot it looks.

pub mod color;

use crate::foundation::core::{FrameIndex, Rgb, Vec3};
use crate::geometry::{MovingBody, coil_offsets, moving_body, spray_levels};
use crate::params::{ParameterSet, ProcessMode, ThermalParams};

pub use color::{fraction_color, temperature_color};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSign {
    Heating,
    Cooling,
}

/// A coil or spray zone, located by its center along the motion axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeatSource {
    pub center: f64,
    /// Influence radius for coils, Gaussian width for spray zones.
    pub influence_radius: f64,
    pub sign: SourceSign,
    /// Contribution in °C at full intensity.
    pub peak: f64,
}

/// One-sided coil window.
///
/// Ramps up as the leading edge approaches `center`, stays at 1 while the body straddles it and
/// ramps down to exactly 0 once the trailing edge reaches it.
pub fn heating_window(center: f64, front: f64, back: f64, radius: f64) -> f64 {
    let ramp_in = 1.0 - ((center - front) / radius).clamp(0.0, 1.0);
    let ramp_out = ((center - back) / radius).clamp(0.0, 1.0);
    ramp_in.min(ramp_out)
}

/// Two-sided spray weight around the leading edge.
pub fn cooling_weight(center: f64, front: f64, width: f64) -> f64 {
    let d = (center - front) / width;
    (-d * d).exp()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Profile {
    Heating { flash_width: f64, flash_peak: f64 },
    Cooling,
}

/// Per-frame state of the moving body. Never stored; recomputed from the index.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Frame {
    pub index: FrameIndex,
    pub time_fraction: f64,
    /// Trailing-edge (horizontal) or bottom-face (vertical) coordinate along the axis.
    pub coordinate: f64,
    pub position: Vec3,
    pub temperature: f64,
    pub color: Rgb,
}

/// Static sources plus motion bounds for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalModel {
    profile: Profile,
    body: MovingBody,
    sources: Vec<HeatSource>,
    start: f64,
    end: f64,
    thermal: ThermalParams,
}

impl ThermalModel {
    /// Derive the source list and motion bounds. The parameter set is expected to be
    /// validated already.
    pub fn new(params: &ParameterSet, thermal: ThermalParams) -> Self {
        let s = |mm: f64| params.s(mm);
        let body = moving_body(params);
        let length = body.length;
        match &params.mode {
            ProcessMode::HorizontalInduction(p) => {
                let half = s(p.coil_height) / 2.0;
                let sources: Vec<HeatSource> = coil_offsets(p, params.scale)
                    .into_iter()
                    .map(|x| HeatSource {
                        center: x + half,
                        influence_radius: s(p.influence_radius),
                        sign: SourceSign::Heating,
                        peak: p.boost_peak,
                    })
                    .collect();
                let margin = s(p.motion_margin);
                let (first, last) = center_range(&sources);
                Self {
                    profile: Profile::Heating {
                        flash_width: s(p.flash_width),
                        flash_peak: p.flash_peak,
                    },
                    body,
                    start: first - margin - length,
                    end: last + margin,
                    sources,
                    thermal,
                }
            }
            ProcessMode::VerticalCasting(p) => {
                let sources: Vec<HeatSource> = spray_levels(p, params.scale)
                    .into_iter()
                    .map(|z| HeatSource {
                        center: z,
                        influence_radius: s(p.spray_width),
                        sign: SourceSign::Cooling,
                        peak: p.spray_cooling_peak,
                    })
                    .collect();
                let margin = s(p.motion_margin);
                let (lowest, highest) = center_range(&sources);
                Self {
                    profile: Profile::Cooling,
                    body,
                    start: highest + margin,
                    end: lowest - margin - length,
                    sources,
                    thermal,
                }
            }
        }
    }

    pub fn body(&self) -> &MovingBody {
        &self.body
    }

    pub fn sources(&self) -> &[HeatSource] {
        &self.sources
    }

    /// `(start, end)` coordinates of the first and last frame.
    pub fn bounds(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// `index / (total - 1)`, clamped to `[0, 1]`; a single-frame run stays at 0.
    pub fn time_fraction(index: FrameIndex, total: u64) -> f64 {
        if total <= 1 {
            return 0.0;
        }
        (index.0 as f64 / (total - 1) as f64).clamp(0.0, 1.0)
    }

    pub fn coordinate_at(&self, t: f64) -> f64 {
        self.start + (self.end - self.start) * t
    }

    /// Temperature in °C of the body at coordinate `coord` and time fraction `t`.
    pub fn temperature_at(&self, coord: f64, t: f64) -> f64 {
        let ThermalParams {
            temp_min,
            temp_max,
            cooling_target,
            cooling_floor,
        } = self.thermal;

        match self.profile {
            Profile::Heating {
                flash_width,
                flash_peak,
            } => {
                let (front, back) = self.body.edges(coord);
                let base = temp_min + (temp_max - temp_min) * t;
                let boost: f64 = self
                    .sources
                    .iter()
                    .map(|s| s.peak * heating_window(s.center, front, back, s.influence_radius))
                    .sum();
                let flash = self
                    .sources
                    .iter()
                    .map(|s| cooling_weight(s.center, front, flash_width))
                    .fold(0.0, f64::max);
                (base + boost + flash * flash_peak).clamp(temp_min, temp_max)
            }
            Profile::Cooling => {
                let (front, _) = self.body.edges(coord);
                let base = temp_max - (temp_max - cooling_target) * t;
                let cooling: f64 = self
                    .sources
                    .iter()
                    .map(|s| s.peak * cooling_weight(s.center, front, s.influence_radius))
                    .sum();
                (base - cooling).clamp(cooling_floor, temp_max)
            }
        }
    }

    /// `(coordinate, temperature)` of one frame.
    pub fn temperature_and_position(&self, index: FrameIndex, total: u64) -> (f64, f64) {
        let t = Self::time_fraction(index, total);
        let coord = self.coordinate_at(t);
        (coord, self.temperature_at(coord, t))
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn frame(&self, index: FrameIndex, total: u64) -> Frame {
        let t = Self::time_fraction(index, total);
        let (coordinate, temperature) = self.temperature_and_position(index, total);
        Frame {
            index,
            time_fraction: t,
            coordinate,
            position: self.body.placement(coordinate),
            temperature,
            color: temperature_color(temperature, self.thermal.temp_min, self.thermal.temp_max),
        }
    }

    /// Inclusive temperature range the active profile can produce.
    pub fn temperature_bounds(&self) -> (f64, f64) {
        match self.profile {
            Profile::Heating { .. } => (self.thermal.temp_min, self.thermal.temp_max),
            Profile::Cooling => (self.thermal.cooling_floor, self.thermal.temp_max),
        }
    }
}

/// `(min, max)` source center; counts are validated to be >= 1 before this runs.
fn center_range(sources: &[HeatSource]) -> (f64, f64) {
    sources.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.center), hi.max(s.center))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/thermal/model.rs"]
mod tests;
