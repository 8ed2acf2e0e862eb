use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "transforge")]
#[command(
    author,
    version,
    about = "Transcode a batch of media files across a pool of worker threads"
)]
pub struct Cli {
    /// Output directory (created if it does not exist)
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "OUT_DIR",
        required_unless_present = "check_tools"
    )]
    pub output_dir: Option<PathBuf>,

    /// Output extension, without the leading dot
    #[arg(
        short = 'e',
        long = "ext",
        value_name = "OUT_EXT",
        value_parser = parse_extension,
        required_unless_present = "check_tools"
    )]
    pub ext: Option<String>,

    /// Number of worker threads (default: config, then logical CPUs)
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "THREADS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub jobs: Option<u32>,

    /// Source files to convert
    #[arg(value_name = "FILES", required_unless_present = "check_tools")]
    pub files: Vec<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Conversion tool to run (default: ffmpeg from PATH)
    #[arg(long, value_name = "PATH")]
    pub tool: Option<PathBuf>,

    /// Extra argument for the tool, placed before the output path (repeatable)
    #[arg(long = "opt", value_name = "ARG", allow_hyphen_values = true)]
    pub options: Vec<String>,

    /// Show the conversion tool's own output instead of discarding it
    #[arg(long)]
    pub show_tool_output: bool,

    /// Exit with a non-zero status when any job fails
    #[arg(long)]
    pub fail_on_job_error: bool,

    /// Actor written into the job log (default: the invoking user)
    #[arg(long, value_parser = parse_actor)]
    pub actor: Option<String>,

    /// Check that the conversion tool is available and exit
    #[arg(long)]
    pub check_tools: bool,
}

fn parse_extension(s: &str) -> Result<String, String> {
    transforge_common::paths::validate_extension(s)
        .map(|()| s.to_string())
        .map_err(|e| e.to_string())
}

fn parse_actor(s: &str) -> Result<String, String> {
    if s.trim().is_empty() || s.contains('\n') || s.contains(" : ") {
        return Err("actor must be non-empty and cannot contain a line break or \" : \"".into());
    }
    Ok(s.to_string())
}
