//! Output file naming.

use std::path::{Path, PathBuf};

use crate::themes::ThemeProfile;

/// File-name prefix marking preview renders.
pub const PREVIEW_PREFIX: &str = "preview_";

/// Which part of the audio a render covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderScope {
    /// The first `seconds` of the audio.
    Preview { seconds: f64 },
    /// The whole waveform.
    Full,
}

impl RenderScope {
    /// Duration cut applied to the audio and the muxed output.
    pub fn limit_seconds(&self) -> Option<f64> {
        match self {
            Self::Preview { seconds } => Some(*seconds),
            Self::Full => None,
        }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self, Self::Preview { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Preview { .. } => "preview",
            Self::Full => "full",
        }
    }
}

/// The two files a render produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub silent: PathBuf,
    pub output: PathBuf,
}

fn map_file_name(path: &Path, f: impl FnOnce(&str) -> String) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => path.with_file_name(f(name)),
        None => path.to_path_buf(),
    }
}

impl OutputPaths {
    /// Theme default names inside `dir`.
    pub fn for_theme(profile: &ThemeProfile, dir: &Path) -> Self {
        Self {
            silent: dir.join(profile.silent_filename()),
            output: dir.join(profile.output_filename()),
        }
    }

    /// Theme default names for a scope; previews get the preview prefix.
    pub fn for_scope(profile: &ThemeProfile, dir: &Path, scope: RenderScope) -> Self {
        let paths = Self::for_theme(profile, dir);
        if scope.is_preview() {
            paths.preview()
        } else {
            paths
        }
    }

    /// Prefix both file names with [`PREVIEW_PREFIX`].
    pub fn preview(&self) -> Self {
        let prefix = |name: &str| format!("{}{}", PREVIEW_PREFIX, name);
        Self {
            silent: map_file_name(&self.silent, prefix),
            output: map_file_name(&self.output, prefix),
        }
    }

    /// Strip [`PREVIEW_PREFIX`] from both file names, if present.
    pub fn promoted(&self) -> Self {
        let strip = |name: &str| name.strip_prefix(PREVIEW_PREFIX).unwrap_or(name).to_string();
        Self {
            silent: map_file_name(&self.silent, strip),
            output: map_file_name(&self.output, strip),
        }
    }
}
