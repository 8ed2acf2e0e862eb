//! External tool detection.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Conversion tool used when nothing else is configured.
pub const DEFAULT_TOOL: &str = "ffmpeg";

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// ffmpeg-style tools are asked for `-version`, everything else for
/// `--version`. Only the first line of the output is kept.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use transforge_av::check_tool;
///
/// let info = check_tool(Path::new("ffmpeg"));
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(program: &Path) -> ToolInfo {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string());

    let version_arg = if name.starts_with("ffmpeg") || name.starts_with("ffprobe") {
        "-version"
    } else {
        "--version"
    };

    let result = Command::new(program)
        .arg(version_arg)
        .stdin(Stdio::null())
        .output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = if program.components().count() > 1 {
                Some(program.to_path_buf())
            } else {
                which::which(program).ok()
            };

            ToolInfo {
                name,
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name,
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Require that a tool is available on `PATH`, returning its path.
pub(crate) fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Resolve the program to launch for conversions.
///
/// A configured path wins when it exists. Otherwise `PATH` is searched for
/// the configured name (or [`DEFAULT_TOOL`]). When nothing is found the bare
/// name is returned, so each job fails to launch and reports it rather than
/// the whole run refusing to start.
pub fn resolve_tool(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        if path.exists() {
            return path.to_path_buf();
        }
    }

    let name = configured
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_TOOL.to_string());

    match require_tool(&name) {
        Ok(path) => path,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(tool = %name, "{}; jobs will fail to launch", _e);
            PathBuf::from(name)
        }
    }
}
