//! Lookup chains for the external encoder executable and the caption font.
//!
//! The `*_with` variants take the environment and file probe as closures so the chains can be
//! exercised without touching the process environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::OutputParams;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

fn encoder_file_names() -> &'static [&'static str] {
    if cfg!(windows) {
        &["ffmpeg.exe"]
    } else {
        &["ffmpeg"]
    }
}

/// `$FFMPEG_EXE` → configured default path → first `ffmpeg` on `PATH`.
pub fn resolve_encoder(output: &OutputParams) -> Option<PathBuf> {
    resolve_encoder_with(output, |k| std::env::var_os(k), |p| p.is_file())
}

pub fn resolve_encoder_with(
    output: &OutputParams,
    var: impl Fn(&str) -> Option<OsString>,
    is_file: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    if let Some(explicit) = var(&output.encoder_env_var).map(PathBuf::from)
        && is_file(&explicit)
    {
        return Some(explicit);
    }
    if is_file(&output.encoder_default_path) {
        return Some(output.encoder_default_path.clone());
    }
    let search = var("PATH")?;
    std::env::split_paths(&search)
        .flat_map(|dir| encoder_file_names().iter().map(move |n| dir.join(n)))
        .find(|candidate| is_file(candidate))
}

/// `$BILLETLINE_FONT` → well-known system font locations.
pub fn resolve_font(output: &OutputParams) -> Option<PathBuf> {
    resolve_font_with(output, |k| std::env::var_os(k), |p| p.is_file())
}

pub fn resolve_font_with(
    output: &OutputParams,
    var: impl Fn(&str) -> Option<OsString>,
    is_file: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    if let Some(explicit) = var(&output.font_env_var).map(PathBuf::from)
        && is_file(&explicit)
    {
        return Some(explicit);
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| is_file(p))
}

#[cfg(test)]
#[path = "../../tests/unit/params/paths.rs"]
mod tests;
