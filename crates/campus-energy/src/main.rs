mod bootstrap;

use std::process::ExitCode;

use anyhow::{Context, Result};
use energy_core::settings::Settings;
use energy_data::loader::CsvLoader;
use energy_data::pipeline::{run_pipeline, PipelineOutcome};
use energy_report::{write_report, ReportOptions};

/// How a run ended, short of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Completed,
    /// Nothing to analyse: missing directory or no loadable file.
    Halted,
}

impl RunStatus {
    fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::Halted => ExitCode::from(2),
        }
    }
}

fn main() -> Result<ExitCode> {
    let settings = Settings::load();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Campus energy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Output: {}",
        settings.data_dir.display(),
        settings.output_dir.display()
    );

    run(&settings).map(RunStatus::exit_code)
}

/// Load, aggregate and write.  Fatal errors come back as `Err`.
fn run(settings: &Settings) -> Result<RunStatus> {
    let outcome = run_pipeline(&settings.data_dir, &CsvLoader::new())
        .context("Aggregation failed; no output written")?;

    let result = match outcome {
        PipelineOutcome::Completed(result) => result,
        PipelineOutcome::Halted(reason) => {
            tracing::error!(
                "{} Script terminated due to missing or unreadable data.",
                reason
            );
            return Ok(RunStatus::Halted);
        }
    };

    for skipped in &result.skipped_files {
        tracing::debug!("Skipped {}", skipped.path.display());
    }

    let options = ReportOptions {
        chart: !settings.no_chart,
    };
    write_report(&settings.output_dir, &result, options).with_context(|| {
        format!(
            "Failed to write output files to {}",
            settings.output_dir.display()
        )
    })?;

    println!(
        "Done! Output files saved in {}",
        settings.output_dir.display()
    );
    Ok(RunStatus::Completed)
}
