use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{LineError, LineResult};

use super::{Invocation, ProcessRunner, truncate_stderr};

/// Width of the caption panel drawn by [`overlay_filter`].
const PANEL_WIDTH: u32 = 500;
const CAPTION_FONT_SIZE: u32 = 26;
const CAPTION_STEP: u32 = 60;

/// Where an encode reads its frames from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameSource {
    /// Numbered images in `dir`; `pattern` is printf-style, e.g. `frame_%04d.png`.
    Sequence { dir: PathBuf, pattern: String },
    /// An already encoded video.
    Video(PathBuf),
}

impl FrameSource {
    fn working_dir(&self) -> Option<&Path> {
        match self {
            Self::Sequence { dir, .. } => Some(dir),
            Self::Video(_) => None,
        }
    }

    /// Input arguments; a sequence also carries its input frame rate.
    fn input_args(&self, fps: Fps, with_rate: bool) -> Vec<String> {
        match self {
            Self::Sequence { pattern, .. } => {
                let mut out = Vec::new();
                if with_rate {
                    out.extend(["-framerate".to_string(), fps.to_ffmpeg_arg()]);
                }
                out.extend(["-i".to_string(), pattern.clone()]);
                out
            }
            Self::Video(path) => vec!["-i".to_string(), path_arg(path)],
        }
    }
}

fn path_arg(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

/// Path as seen from `cwd`: relative when it lives under it.
fn relative_to(path: &Path, cwd: Option<&Path>) -> String {
    match cwd.and_then(|c| path.strip_prefix(c).ok()) {
        Some(rel) => path_arg(rel),
        None => path_arg(path),
    }
}

fn scale_chain(fps: Fps, res: Resolution) -> String {
    format!(
        "fps={},scale={}:{}:flags=lanczos",
        fps.to_ffmpeg_arg(),
        res.width,
        res.height
    )
}

/// `-y -framerate F -i frame_%04d.png -pix_fmt yuv420p out.mp4`
pub fn video_invocation(program: &Path, source: &FrameSource, fps: Fps, out: &Path) -> Invocation {
    let cwd = source.working_dir();
    let mut inv = Invocation::new(program)
        .arg("-y")
        .args(source.input_args(fps, true))
        .args(["-pix_fmt", "yuv420p"])
        .arg(relative_to(out, cwd));
    if let Some(dir) = cwd {
        inv = inv.current_dir(dir);
    }
    inv
}

/// First pass of the palette GIF: `palettegen` into `palette`.
pub fn palettegen_invocation(
    program: &Path,
    source: &FrameSource,
    fps: Fps,
    res: Resolution,
    palette: &Path,
) -> Invocation {
    let cwd = source.working_dir();
    let mut inv = Invocation::new(program)
        .arg("-y")
        .args(source.input_args(fps, false))
        .arg("-vf")
        .arg(format!("{},palettegen", scale_chain(fps, res)))
        .arg(relative_to(palette, cwd));
    if let Some(dir) = cwd {
        inv = inv.current_dir(dir);
    }
    inv
}

/// Second pass of the palette GIF: `paletteuse` with Sierra dithering.
pub fn paletteuse_invocation(
    program: &Path,
    source: &FrameSource,
    fps: Fps,
    res: Resolution,
    palette: &Path,
    out: &Path,
) -> Invocation {
    let cwd = source.working_dir();
    let with_rate = matches!(source, FrameSource::Sequence { .. });
    let mut inv = Invocation::new(program)
        .arg("-y")
        .args(source.input_args(fps, with_rate))
        .arg("-i")
        .arg(relative_to(palette, cwd))
        .arg("-lavfi")
        .arg(format!(
            "{},paletteuse=dither=sierra2_4a",
            scale_chain(fps, res)
        ))
        .arg(relative_to(out, cwd));
    if let Some(dir) = cwd {
        inv = inv.current_dir(dir);
    }
    inv
}

/// Re-encode `input` with `filter` applied.
pub fn overlay_invocation(program: &Path, input: &Path, filter: &str, out: &Path) -> Invocation {
    Invocation::new(program)
        .arg("-y")
        .arg("-i")
        .arg(path_arg(input))
        .arg("-vf")
        .arg(filter)
        .args(["-pix_fmt", "yuv420p"])
        .arg(path_arg(out))
}

/// Escape text for a single-quoted `drawtext` value inside a filtergraph.
///
/// Line breaks become the `\n` sequence `drawtext` expands itself.
pub fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ':' => out.push_str("\\:"),
            ',' => out.push_str("\\,"),
            '|' => out.push_str("\\|"),
            '\'' => out.push('\u{2019}'),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Translucent side panel with one `drawtext` per caption.
pub fn overlay_filter(captions: &[&str], font: &Path) -> String {
    let font = escape_drawtext(&font.to_string_lossy());
    let mut filter = format!(
        "drawbox=x=w-{}:y=40:w={PANEL_WIDTH}:h=h-80:color=black@0.6:t=fill",
        PANEL_WIDTH + 20
    );
    let mut y = 60;
    for caption in captions {
        filter.push_str(&format!(
            ",drawtext=fontfile='{font}':text='{}':x=w-{PANEL_WIDTH}+20:y={y}:fontsize={CAPTION_FONT_SIZE}:fontcolor=white",
            escape_drawtext(caption)
        ));
        y += CAPTION_STEP;
    }
    filter
}

/// Resolved `ffmpeg` bound to a runner and a per-invocation timeout.
pub struct Ffmpeg<'a> {
    runner: &'a mut dyn ProcessRunner,
    program: PathBuf,
    timeout: Duration,
}

impl<'a> Ffmpeg<'a> {
    pub fn new(runner: &'a mut dyn ProcessRunner, program: PathBuf, timeout: Duration) -> Self {
        Self {
            runner,
            program,
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&mut self, invocation: Invocation) -> LineResult<()> {
        tracing::debug!(command = %invocation, "running encoder");
        let outcome = self
            .runner
            .run(&invocation, self.timeout)
            .map_err(|e| LineError::encode(format!("{e:#}")))?;
        if outcome.timed_out {
            return Err(LineError::encode(format!(
                "ffmpeg timed out after {}s: {}",
                self.timeout.as_secs(),
                truncate_stderr(&outcome.stderr)
            )));
        }
        if !outcome.success() {
            let status = outcome
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            return Err(LineError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                truncate_stderr(&outcome.stderr)
            )));
        }
        Ok(())
    }

    pub fn video(&mut self, source: &FrameSource, fps: Fps, out: &Path) -> LineResult<()> {
        let inv = video_invocation(&self.program, source, fps, out);
        self.run(inv)
    }

    /// Two passes; the second only runs when the palette was produced.
    pub fn palette_gif(
        &mut self,
        source: &FrameSource,
        fps: Fps,
        res: Resolution,
        palette: &Path,
        out: &Path,
    ) -> LineResult<()> {
        let inv = palettegen_invocation(&self.program, source, fps, res, palette);
        self.run(inv)?;
        let inv = paletteuse_invocation(&self.program, source, fps, res, palette, out);
        self.run(inv)
    }

    pub fn overlay(&mut self, input: &Path, filter: &str, out: &Path) -> LineResult<()> {
        let inv = overlay_invocation(&self.program, input, filter, out);
        self.run(inv)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
