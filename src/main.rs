mod cli;

use transforge::{
    config,
    dispatch::{JobQueue, WorkerPool},
    joblog::{self, Logger},
};
use transforge_av::{check_tool, resolve_tool, FfmpegTranscoder, TranscodeSettings};
use transforge_common::{error::EXIT_SETUP, jobs_from_sources, Error};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries only the job log.
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "transforge=debug,transforge_av=debug,transforge_common=debug".to_string()
        } else {
            "transforge=warn,transforge_av=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let result = if cli.check_tools {
        check_tools(&cli)
    } else {
        run(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(err) = e.chain().find_map(|c| c.downcast_ref::<Error>()) {
                if err.is_infrastructure() {
                    tracing::error!("Run aborted: {}", err);
                }
            }
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Exit status for a failed run: the first transforge error in the cause
/// chain decides, anything else is a setup failure.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::exit_code)
        .unwrap_or(EXIT_SETUP)
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load_config_or_default(cli.config.as_deref())?;

    let output_dir = cli
        .output_dir
        .as_deref()
        .ok_or_else(|| Error::invalid_input("missing output directory (-o)"))?;
    let ext = cli
        .ext
        .as_deref()
        .ok_or_else(|| Error::invalid_input("missing output extension (-e)"))?;
    if cli.files.is_empty() {
        return Err(Error::invalid_input("no input files").into());
    }

    let threads = cli
        .jobs
        .map(|j| j as usize)
        .or(config.pool.threads)
        .unwrap_or_else(num_cpus::get);
    let pool = WorkerPool::new(threads)?;
    tracing::debug!(threads = pool.worker_count(), "Worker count resolved");

    std::fs::create_dir_all(output_dir)
        .map_err(Error::from)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let settings = TranscodeSettings {
        tool: resolve_tool(cli.tool.as_deref().or(config.tool.path.as_deref())),
        options: if cli.options.is_empty() {
            config.tool.options.clone()
        } else {
            cli.options.clone()
        },
        show_output: cli.show_tool_output || config.tool.show_output,
    };
    tracing::info!(
        tool = %settings.tool.display(),
        options = ?settings.options,
        "Conversion tool resolved"
    );

    let actor = joblog::resolve_actor(cli.actor.as_deref().or(config.log.actor.as_deref()));
    let logger = Arc::new(Logger::stdout(actor));
    let queue = Arc::new(JobQueue::new(jobs_from_sources(
        cli.files.iter(),
        output_dir,
        ext,
    )));

    let summary = pool.run(
        queue,
        Arc::new(FfmpegTranscoder::new(settings)),
        Arc::clone(&logger),
    )?;

    logger.info(&format!(
        "done: {} jobs, {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    ));

    if cli.fail_on_job_error {
        summary.ensure_no_failures()?;
    }

    Ok(())
}

fn check_tools(cli: &Cli) -> Result<()> {
    let config = config::load_config_or_default(cli.config.as_deref())?;
    let program = resolve_tool(cli.tool.as_deref().or(config.tool.path.as_deref()));

    println!("Checking conversion tool...\n");

    let tool = check_tool(&program);
    let status = if tool.available { "✓" } else { "✗" };
    print!("{} {}", status, tool.name);

    if let Some(ref version) = tool.version {
        print!(" ({})", version);
    }

    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }

    println!();
    println!();
    if tool.available {
        println!("Conversion tool is available!");
    } else {
        println!("Conversion tool is missing. Every job would fail to launch.");
    }

    Ok(())
}
