use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assembly::SystemInfo;

/// Steps of a run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Compose,
    Recompute,
    View,
    Save,
    Export,
    Animate,
    EncodeVideo,
    EncodeGif,
    FallbackGif,
    LabeledVideo,
    LabeledGif,
    Summary,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Compose => "compose",
            Self::Recompute => "recompute",
            Self::View => "view",
            Self::Save => "save",
            Self::Export => "export",
            Self::Animate => "animate",
            Self::EncodeVideo => "encode_video",
            Self::EncodeGif => "encode_gif",
            Self::FallbackGif => "fallback_gif",
            Self::LabeledVideo => "labeled_video",
            Self::LabeledGif => "labeled_gif",
            Self::Summary => "summary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Skipped,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
    /// Reason for a skip or the diagnostic of a failure; empty on success.
    pub detail: String,
}

/// Terminal state of a run. Always produced once configuration has validated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunSummary {
    pub mode: String,
    pub system: SystemInfo,
    /// `(component label, count)` for every kind present in the assembly.
    pub components: Vec<(String, usize)>,
    pub labels_created: usize,
    pub labels_failed: usize,
    pub frames_written: u64,
    pub outputs: Vec<PathBuf>,
    pub stages: Vec<StageOutcome>,
}

impl RunSummary {
    pub(crate) fn new(mode: &str, system: SystemInfo, components: Vec<(String, usize)>) -> Self {
        Self {
            mode: mode.to_string(),
            system,
            components,
            labels_created: 0,
            labels_failed: 0,
            frames_written: 0,
            outputs: Vec::new(),
            stages: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, status: StageStatus, detail: impl Into<String>) {
        let detail = detail.into();
        match status {
            StageStatus::Completed => tracing::info!(stage = stage.name(), "stage completed"),
            StageStatus::Skipped => {
                tracing::warn!(stage = stage.name(), "stage skipped: {detail}")
            }
            StageStatus::Failed => tracing::warn!(stage = stage.name(), "stage failed: {detail}"),
        }
        self.stages.push(StageOutcome {
            stage,
            status,
            detail,
        });
    }

    pub(crate) fn completed(&mut self, stage: Stage, output: Option<&Path>) {
        if let Some(p) = output {
            self.outputs.push(p.to_path_buf());
        }
        self.record(stage, StageStatus::Completed, "");
    }

    /// Status of the last outcome recorded for `stage`.
    pub fn status(&self, stage: Stage) -> Option<StageStatus> {
        self.stages
            .iter()
            .rev()
            .find(|o| o.stage == stage)
            .map(|o| o.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StageOutcome> {
        self.stages
            .iter()
            .filter(|o| o.status == StageStatus::Failed)
    }

    /// Human-readable completion report with next steps.
    pub fn report(&self) -> String {
        let rule = "=".repeat(80);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "BILLET LINE CREATED ({})", self.mode);
        let _ = writeln!(out, "{rule}\n");

        let _ = writeln!(out, "COMPONENTS:");
        for (label, n) in &self.components {
            let _ = writeln!(out, "  - {n} x {label}");
        }
        let _ = writeln!(
            out,
            "  body mass {:.0} kg, line mass {:.0} kg, installed power {:.0} kW",
            self.system.body_mass_kg, self.system.line_mass_kg, self.system.power_kw
        );
        if self.labels_failed > 0 {
            let _ = writeln!(out, "  {} labels could not be created", self.labels_failed);
        }

        let _ = writeln!(out, "\nOUTPUTS:");
        if self.outputs.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for p in &self.outputs {
            let _ = writeln!(out, "  - {}", p.display());
        }
        let _ = writeln!(out, "  {} frames captured", self.frames_written);

        let problems: Vec<&StageOutcome> = self
            .stages
            .iter()
            .filter(|o| o.status != StageStatus::Completed)
            .collect();
        if !problems.is_empty() {
            let _ = writeln!(out, "\nSTAGES NOT COMPLETED:");
            for o in problems {
                let status = match o.status {
                    StageStatus::Skipped => "skipped",
                    _ => "FAILED",
                };
                let _ = writeln!(out, "  - {} {status}: {}", o.stage.name(), o.detail);
            }
        }

        let _ = writeln!(out, "\nNEXT STEPS:");
        let _ = writeln!(out, "  1. Review the saved document and its groups.");
        let _ = writeln!(
            out,
            "  2. Import the exported model into your CAD package as multiple solid bodies."
        );
        let _ = writeln!(
            out,
            "  3. Edit the constants in params::defaults and run again to change the line."
        );
        let _ = writeln!(out, "\n{rule}");
        out
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        crate::cad::ensure_parent_dir(path)?;
        let json = serde_json::to_vec_pretty(self).context("serialize run summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("write run summary '{}'", path.display()))?;
        Ok(())
    }
}
