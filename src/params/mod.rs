//! Run configuration: one immutable value built from [`defaults`] and handed to every stage.

pub mod defaults;
mod mode;
pub mod paths;

use std::path::PathBuf;
use std::time::Duration;

use crate::cad::ExportFormat;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{LineError, LineResult};

pub use mode::{CastingParams, InductionParams, ProcessMode, ProcessModeKind};

/// Geometry inputs: the global scale plus the process variant with its part table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterSet {
    pub scale: f64,
    pub mode: ProcessMode,
}

impl ParameterSet {
    pub fn new(scale: f64, mode: ProcessMode) -> Self {
        Self { scale, mode }
    }

    /// Scale a length given in millimetres at scale 1.
    pub fn s(&self, mm: f64) -> f64 {
        mm * self.scale
    }

    /// Reject any length that does not stay finite and positive after scaling.
    ///
    /// Runs before any shape is requested so a bad table never yields a partial assembly.
    pub fn validate(&self) -> LineResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(LineError::config(format!(
                "scale must be finite and > 0 (got {})",
                self.scale
            )));
        }

        let dims = self
            .mode
            .dimensions()
            .into_iter()
            .chain(self.mode.derived_dimensions());
        for (name, mm) in dims {
            let scaled = self.s(mm);
            if !scaled.is_finite() || scaled <= 0.0 {
                return Err(LineError::config(format!(
                    "{name} resolves to {scaled} mm at scale {} (must be > 0)",
                    self.scale
                )));
            }
        }

        for (name, count) in self.mode.counts() {
            if count == 0 {
                return Err(LineError::config(format!("{name} must be >= 1")));
            }
        }

        match &self.mode {
            ProcessMode::VerticalCasting(p) => {
                check_non_negative("spray_cooling_peak", p.spray_cooling_peak)?;
                if !p.roller_pitch_ratio.is_finite() || p.roller_pitch_ratio <= 0.0 {
                    return Err(LineError::config("roller_pitch_ratio must be > 0"));
                }
            }
            ProcessMode::HorizontalInduction(p) => {
                check_non_negative("boost_peak", p.boost_peak)?;
                check_non_negative("flash_peak", p.flash_peak)?;
            }
        }
        Ok(())
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            scale: defaults::SCALE,
            mode: ProcessMode::from_kind(defaults::PROCESS_MODE),
        }
    }
}

fn check_non_negative(name: &str, v: f64) -> LineResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(LineError::config(format!("{name} must be >= 0 (got {v})")));
    }
    Ok(())
}

/// Temperature bounds in °C shared by both process variants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThermalParams {
    pub temp_min: f64,
    pub temp_max: f64,
    /// End-of-run temperature the cooling base profile descends to.
    pub cooling_target: f64,
    /// Lower clamp for the cooling profile.
    pub cooling_floor: f64,
}

impl ThermalParams {
    pub fn validate(&self) -> LineResult<()> {
        let all = [
            self.temp_min,
            self.temp_max,
            self.cooling_target,
            self.cooling_floor,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(LineError::config("temperatures must be finite"));
        }
        if self.temp_min >= self.temp_max {
            return Err(LineError::config("temp_min must be < temp_max"));
        }
        if self.cooling_floor > self.cooling_target || self.cooling_target > self.temp_max {
            return Err(LineError::config(
                "cooling bounds must satisfy cooling_floor <= cooling_target <= temp_max",
            ));
        }
        Ok(())
    }
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            temp_min: defaults::TEMP_MIN,
            temp_max: defaults::TEMP_MAX,
            cooling_target: defaults::COOLING_TARGET,
            cooling_floor: defaults::COOLING_FLOOR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationParams {
    pub frames: u64,
    pub fps: Fps,
    pub resolution: Resolution,
    /// Number of leading frames that refit the view before capture.
    pub refit_frames: u64,
}

impl AnimationParams {
    pub fn validate(&self) -> LineResult<()> {
        if self.frames == 0 {
            return Err(LineError::config("frames must be >= 1"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        self.resolution.validate()
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            frames: defaults::FRAMES,
            fps: Fps {
                num: defaults::FPS,
                den: 1,
            },
            resolution: Resolution::new(defaults::IMG_W, defaults::IMG_H),
            refit_frames: defaults::REFIT_FRAMES,
        }
    }
}

/// Where artifacts go and how external executables are located.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OutputParams {
    pub output_dir: PathBuf,
    pub document_name: String,
    pub frame_prefix: String,
    pub export_format: ExportFormat,
    pub encoder_env_var: String,
    pub encoder_default_path: PathBuf,
    pub encoder_timeout_secs: u64,
    pub font_env_var: String,
}

impl OutputParams {
    pub fn encoder_timeout(&self) -> Duration {
        Duration::from_secs(self.encoder_timeout_secs)
    }

    pub fn validate(&self) -> LineResult<()> {
        if self.document_name.trim().is_empty() {
            return Err(LineError::config("document_name must not be empty"));
        }
        if self.frame_prefix.is_empty() || self.frame_prefix.contains('%') {
            return Err(LineError::config(
                "frame_prefix must be non-empty and must not contain '%'",
            ));
        }
        if self.encoder_timeout_secs == 0 {
            return Err(LineError::config("encoder_timeout_secs must be >= 1"));
        }
        Ok(())
    }
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            document_name: defaults::DOCUMENT_NAME.to_string(),
            frame_prefix: defaults::FRAME_PREFIX.to_string(),
            export_format: ExportFormat::Step,
            encoder_env_var: defaults::ENCODER_ENV_VAR.to_string(),
            encoder_default_path: PathBuf::from(defaults::ENCODER_DEFAULT_PATH),
            encoder_timeout_secs: defaults::ENCODER_TIMEOUT_SECS,
            font_env_var: defaults::FONT_ENV_VAR.to_string(),
        }
    }
}

/// Everything one run needs.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    pub params: ParameterSet,
    pub thermal: ThermalParams,
    pub animation: AnimationParams,
    pub output: OutputParams,
}

impl RunConfig {
    pub fn validate(&self) -> LineResult<()> {
        self.params.validate()?;
        self.thermal.validate()?;
        self.animation.validate()?;
        self.output.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/config.rs"]
mod tests;
