//! Run orchestration: build, compose, save/export, animate, encode, report.
//!
//! Only configuration errors leave [`run`] as `Err`. Every collaborator failure after that is
//! recorded as a stage outcome and the run carries on to its summary.

mod summary;

use std::path::{Path, PathBuf};

use crate::assembly::{Assembly, ComposedAssembly, compose};
use crate::cad::{CadService, ServiceError, Viewport};
use crate::encode::ProcessRunner;
use crate::encode::ffmpeg::{Ffmpeg, FrameSource, overlay_filter};
use crate::encode::gif::{list_frames, write_looping_gif};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::LineResult;
use crate::geometry::{OVERLAY_CAPTIONS, PartKind};
use crate::params::{ProcessMode, RunConfig, paths};
use crate::thermal::ThermalModel;

pub use summary::{RunSummary, Stage, StageOutcome, StageStatus};

pub const SUMMARY_FILE: &str = "run_summary.json";

/// Collaborators of a run plus the resolved external executables.
pub struct Services<'a> {
    pub cad: &'a mut dyn CadService,
    pub viewport: &'a mut dyn Viewport,
    pub runner: &'a mut dyn ProcessRunner,
    pub encoder: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

impl<'a> Services<'a> {
    /// Resolve encoder and font from the environment.
    pub fn new(
        cad: &'a mut dyn CadService,
        viewport: &'a mut dyn Viewport,
        runner: &'a mut dyn ProcessRunner,
        config: &RunConfig,
    ) -> Self {
        Self {
            cad,
            viewport,
            runner,
            encoder: paths::resolve_encoder(&config.output),
            font: paths::resolve_font(&config.output),
        }
    }
}

/// File stem of the animation outputs for a process variant.
pub fn animation_stem(mode: &ProcessMode) -> &'static str {
    match mode {
        ProcessMode::VerticalCasting(_) => "casting_vertical_animation",
        ProcessMode::HorizontalInduction(_) => "induction_heating_animation",
    }
}

/// Zero-pad width for frame numbers: at least 4, more when the run needs it.
pub fn frame_pad_width(frames: u64) -> usize {
    let last = frames.saturating_sub(1);
    last.to_string().len().max(4)
}

pub fn frame_file_name(prefix: &str, index: FrameIndex, pad: usize) -> String {
    format!("{prefix}{:0pad$}.png", index.0)
}

/// Execute one full run.
#[tracing::instrument(skip_all, fields(mode = config.params.mode.name()))]
pub fn run(config: &RunConfig, services: Services<'_>) -> LineResult<RunSummary> {
    config.validate()?;
    let assembly = Assembly::build(&config.params)?;
    let model = ThermalModel::new(&config.params, config.thermal);

    let components = PartKind::ALL
        .iter()
        .map(|k| (k.label().to_string(), assembly.catalog.count(*k)))
        .filter(|(_, n)| *n > 0)
        .collect();
    let mut summary = RunSummary::new(
        config.params.mode.name(),
        assembly.info.clone(),
        components,
    );
    tracing::info!(
        parts = assembly.parts().len(),
        sources = model.sources().len(),
        "configuration valid"
    );

    let Services {
        cad,
        viewport,
        runner,
        encoder,
        font,
    } = services;

    let composed = match compose(cad, &assembly, &config.output.document_name) {
        Ok(c) => {
            summary.labels_created = c.labels_created;
            summary.labels_failed = c.labels_failed;
            summary.completed(Stage::Compose, None);
            Some(c)
        }
        Err(e) => {
            summary.record(Stage::Compose, StageStatus::Failed, e.to_string());
            None
        }
    };

    if let Some(composed) = &composed {
        let mut run = Run {
            config,
            assembly: &assembly,
            model: &model,
            composed,
            cad,
            viewport,
            summary: &mut summary,
        };
        run.document_stages();
        if run.animate() {
            let mut ffmpeg = encoder
                .map(|program| Ffmpeg::new(runner, program, config.output.encoder_timeout()));
            run.encode(ffmpeg.as_mut(), font.as_deref());
        } else {
            for stage in [Stage::EncodeVideo, Stage::EncodeGif, Stage::FallbackGif] {
                summary.record(stage, StageStatus::Skipped, "no animation frames");
            }
        }
    } else {
        for stage in [Stage::Recompute, Stage::View, Stage::Save, Stage::Export, Stage::Animate] {
            summary.record(stage, StageStatus::Skipped, "no document");
        }
    }

    let summary_path = config.output.output_dir.join(SUMMARY_FILE);
    match summary.write_json(&summary_path) {
        Ok(()) => summary.completed(Stage::Summary, Some(&summary_path)),
        Err(e) => summary.record(Stage::Summary, StageStatus::Failed, format!("{e:#}")),
    }

    tracing::info!(
        outputs = summary.outputs.len(),
        failures = summary.failures().count(),
        "run completed"
    );
    Ok(summary)
}

struct Run<'r> {
    config: &'r RunConfig,
    assembly: &'r Assembly,
    model: &'r ThermalModel,
    composed: &'r ComposedAssembly,
    cad: &'r mut dyn CadService,
    viewport: &'r mut dyn Viewport,
    summary: &'r mut RunSummary,
}

impl Run<'_> {
    fn out_dir(&self) -> &Path {
        &self.config.output.output_dir
    }

    fn stem(&self) -> &'static str {
        animation_stem(&self.config.params.mode)
    }

    fn record_service(&mut self, stage: Stage, result: Result<Option<PathBuf>, ServiceError>) {
        match result {
            Ok(path) => self.summary.completed(stage, path.as_deref()),
            Err(e) if e.is_unavailable() => {
                self.summary.record(stage, StageStatus::Skipped, e.to_string())
            }
            Err(e) => self.summary.record(stage, StageStatus::Failed, e.to_string()),
        }
    }

    /// Recompute, view setup, native save and interchange export.
    fn document_stages(&mut self) {
        let config = self.config;
        let doc = self.composed.document;

        let r = self.cad.recompute(doc).map(|()| None);
        self.record_service(Stage::Recompute, r);

        let r = self
            .viewport
            .set_isometric_view()
            .and_then(|()| self.viewport.fit_view(&*self.cad, doc))
            .map(|()| None);
        self.record_service(Stage::View, r);

        let out = &config.output;
        let doc_path = out.output_dir.join(format!("{}.json", out.document_name));
        let r = self.cad.save(doc, &doc_path).map(|()| Some(doc_path));
        self.record_service(Stage::Save, r);

        let export_path = out.output_dir.join(format!(
            "{}.{}",
            out.document_name,
            out.export_format.extension()
        ));
        let r = self
            .cad
            .export(&self.composed.object_ids(), &export_path, out.export_format)
            .map(|()| Some(export_path));
        self.record_service(Stage::Export, r);
    }

    /// Remove frames left over from an earlier run so encoders only see this one.
    fn clear_stale_frames(&self) -> anyhow::Result<()> {
        use anyhow::Context as _;

        let dir = self.out_dir();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        for stale in list_frames(dir, &self.config.output.frame_prefix)? {
            std::fs::remove_file(&stale)
                .with_context(|| format!("remove stale frame '{}'", stale.display()))?;
        }
        Ok(())
    }

    /// Capture every frame. Returns whether the full sequence was written.
    fn animate(&mut self) -> bool {
        if self.summary.status(Stage::View) == Some(StageStatus::Skipped) {
            self.summary.record(
                Stage::Animate,
                StageStatus::Skipped,
                "viewport unavailable",
            );
            return false;
        }
        if let Err(e) = self.clear_stale_frames() {
            self.summary
                .record(Stage::Animate, StageStatus::Failed, format!("{e:#}"));
            return false;
        }

        let anim = self.config.animation;
        let pad = frame_pad_width(anim.frames);
        let assembly = self.assembly;
        let moving = &assembly.catalog.moving;
        let doc = self.composed.document;

        for i in 0..anim.frames {
            let frame = self.model.frame(FrameIndex(i), anim.frames);
            let path = self.out_dir().join(frame_file_name(
                &self.config.output.frame_prefix,
                frame.index,
                pad,
            ));
            let step = (|| -> Result<(), ServiceError> {
                self.cad
                    .set_placement(self.composed.moving, moving.placement(frame.coordinate))?;
                self.cad.set_color(self.composed.moving, frame.color)?;
                if i < anim.refit_frames {
                    self.viewport.fit_view(&*self.cad, doc)?;
                }
                self.cad.recompute(doc)?;
                self.viewport
                    .capture_image(&*self.cad, doc, &path, anim.resolution)
            })();
            if let Err(e) = step {
                let status = if e.is_unavailable() {
                    StageStatus::Skipped
                } else {
                    StageStatus::Failed
                };
                self.summary
                    .record(Stage::Animate, status, format!("frame {i}: {e}"));
                return false;
            }
            self.summary.frames_written += 1;
            tracing::debug!(
                frame = i,
                position = frame.coordinate,
                temperature = frame.temperature,
                path = %path.display(),
                "frame captured"
            );
        }
        self.summary.completed(Stage::Animate, None);
        true
    }

    /// Video, then palette GIF, then the library GIF when no GIF exists yet.
    fn encode(&mut self, mut ffmpeg: Option<&mut Ffmpeg<'_>>, font: Option<&Path>) {
        let anim = self.config.animation;
        let dir = self.out_dir().to_path_buf();
        let pad = frame_pad_width(anim.frames);
        let source = FrameSource::Sequence {
            dir: dir.clone(),
            pattern: format!("{}%0{pad}d.png", self.config.output.frame_prefix),
        };
        let mp4 = dir.join(format!("{}.mp4", self.stem()));
        let gif = dir.join(format!("{}.gif", self.stem()));
        for stale in [&mp4, &gif] {
            let _ = std::fs::remove_file(stale);
        }

        match ffmpeg.as_deref_mut() {
            Some(ff) => {
                tracing::info!(program = %ff.program().display(), "using encoder");
                match ff.video(&source, anim.fps, &mp4) {
                    Ok(()) => self.summary.completed(Stage::EncodeVideo, Some(&mp4)),
                    Err(e) => {
                        self.summary
                            .record(Stage::EncodeVideo, StageStatus::Failed, e.to_string())
                    }
                }
                let palette = dir.join("palette.png");
                match ff.palette_gif(&source, anim.fps, anim.resolution, &palette, &gif) {
                    Ok(()) => self.summary.completed(Stage::EncodeGif, Some(&gif)),
                    Err(e) => {
                        self.summary
                            .record(Stage::EncodeGif, StageStatus::Failed, e.to_string())
                    }
                }
            }
            None => {
                for stage in [Stage::EncodeVideo, Stage::EncodeGif] {
                    self.summary
                        .record(stage, StageStatus::Skipped, "ffmpeg not found");
                }
            }
        }

        if gif.is_file() {
            self.summary.record(
                Stage::FallbackGif,
                StageStatus::Skipped,
                "gif already encoded",
            );
        } else {
            let result = list_frames(&dir, &self.config.output.frame_prefix)
                .and_then(|frames| write_looping_gif(&frames, anim.fps, &gif));
            match result {
                Ok(n) => {
                    tracing::info!(frames = n, "gif written by the library encoder");
                    self.summary.completed(Stage::FallbackGif, Some(&gif));
                }
                Err(e) => self
                    .summary
                    .record(Stage::FallbackGif, StageStatus::Failed, e.to_string()),
            }
        }

        if matches!(self.config.params.mode, ProcessMode::VerticalCasting(_)) {
            self.labeled(ffmpeg, font, &mp4);
        }
    }

    /// Caption-panel variant of a successful video, then its palette GIF.
    fn labeled(&mut self, ffmpeg: Option<&mut Ffmpeg<'_>>, font: Option<&Path>, mp4: &Path) {
        let skip = |summary: &mut RunSummary, why: &str| {
            for stage in [Stage::LabeledVideo, Stage::LabeledGif] {
                summary.record(stage, StageStatus::Skipped, why);
            }
        };
        let Some(ff) = ffmpeg else {
            return skip(&mut *self.summary, "ffmpeg not found");
        };
        if self.summary.status(Stage::EncodeVideo) != Some(StageStatus::Completed) {
            return skip(&mut *self.summary, "no base video");
        }
        let Some(font) = font else {
            return skip(&mut *self.summary, "no caption font found");
        };

        let anim = self.config.animation;
        let dir = self.out_dir().to_path_buf();
        let labeled_mp4 = dir.join(format!("{}_labeled.mp4", self.stem()));
        let filter = overlay_filter(OVERLAY_CAPTIONS, font);
        if let Err(e) = ff.overlay(mp4, &filter, &labeled_mp4) {
            self.summary
                .record(Stage::LabeledVideo, StageStatus::Failed, e.to_string());
            self.summary
                .record(Stage::LabeledGif, StageStatus::Skipped, "no labeled video");
            return;
        }
        self.summary
            .completed(Stage::LabeledVideo, Some(&labeled_mp4));

        let labeled_gif = dir.join(format!("{}_labeled.gif", self.stem()));
        let palette = dir.join("palette_labeled.png");
        let source = FrameSource::Video(labeled_mp4);
        match ff.palette_gif(&source, anim.fps, anim.resolution, &palette, &labeled_gif) {
            Ok(()) => self
                .summary
                .completed(Stage::LabeledGif, Some(&labeled_gif)),
            Err(e) => self
                .summary
                .record(Stage::LabeledGif, StageStatus::Failed, e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/run.rs"]
mod tests;
