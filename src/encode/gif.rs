use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::cad::ensure_parent_dir;
use crate::foundation::core::Fps;
use crate::foundation::error::{LineError, LineResult};

/// Encode `frames` (in order) into an infinitely looping GIF. Returns the frame count.
pub fn write_looping_gif(frames: &[PathBuf], fps: Fps, out: &Path) -> LineResult<usize> {
    if frames.is_empty() {
        return Err(LineError::encode("no frames to encode"));
    }
    ensure_parent_dir(out)?;
    let file = File::create(out).with_context(|| format!("create gif '{}'", out.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| LineError::encode(format!("gif repeat: {e}")))?;

    let delay = Delay::from_numer_denom_ms(1000 * fps.den, fps.num);
    for path in frames {
        let rgba = image::open(path)
            .with_context(|| format!("read frame '{}'", path.display()))?
            .to_rgba8();
        encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
            .map_err(|e| LineError::encode(format!("gif frame '{}': {e}", path.display())))?;
    }
    Ok(frames.len())
}

/// Frames in `dir` named `<prefix><digits>.png`, sorted by name.
pub fn list_frames(dir: &Path, prefix: &str) -> LineResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list frames in '{}'", dir.display()))?;
    for entry in entries {
        let path = entry.with_context(|| format!("list frames in '{}'", dir.display()))?.path();
        if is_frame_name(&path, prefix) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

pub(crate) fn is_frame_name(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix(prefix))
        .and_then(|n| n.strip_suffix(".png"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
