use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolConfig {
    /// Conversion program to launch (default: `ffmpeg` from PATH)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Extra arguments placed between the input and the output path
    #[serde(default)]
    pub options: Vec<String>,

    /// Pass the tool's stdout/stderr through instead of discarding it
    #[serde(default)]
    pub show_output: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Worker count used when `-j` is not given (default: logical CPUs)
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogConfig {
    /// Actor written into every job log line (default: the invoking user)
    #[serde(default)]
    pub actor: Option<String>,
}
