//! Billetline builds a parametric billet-heating or continuous-casting line as a CAD assembly,
//! animates the billet through it and encodes the captured frames.
//!
//! Entry points:
//! - [`RunConfig`]: every tunable of a run, with defaults.
//! - [`run`]: one full run against a set of [`Services`].
//! - [`RunSummary`]: the per-stage record every run ends with.
#![forbid(unsafe_code)]

/// Parametric composition of the line inside a CAD document.
pub mod assembly;
/// CAD kernel and viewport seams plus the in-process implementations.
pub mod cad;
/// Run orchestration and the run summary.
pub mod driver;
/// External encoder invocations and the library GIF writer.
pub mod encode;
pub mod foundation;
/// Pure part catalogs and tessellation.
pub mod geometry;
/// Configuration tables.
pub mod params;
/// Cosmetic heat model of the moving body.
pub mod thermal;

pub use crate::cad::{CadService, CpuViewport, HeadlessViewport, MemoryCad, ServiceError, Viewport};
pub use crate::driver::{RunSummary, Services, Stage, StageOutcome, StageStatus, run};
pub use crate::encode::{ProcessRunner, SystemProcessRunner};
pub use crate::foundation::core::{Axis, Fps, FrameIndex, Resolution, Rgb, Vec3};
pub use crate::foundation::error::{LineError, LineResult};
pub use crate::params::{ProcessMode, ProcessModeKind, RunConfig};
