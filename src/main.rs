use anyhow::Context;
use spec_compiler::{
    init_cli_logger, run_batch, BatchConfig, BatchOutcome, ConsoleProgress, SpecLogger,
};

fn main() -> anyhow::Result<()> {
    init_cli_logger();

    let config = BatchConfig::default();
    tracing::debug!("Batch config: {:?}", config);

    let logger = SpecLogger::console();
    let mut progress = ConsoleProgress::default();

    let outcome = run_batch(&config, &logger, &mut progress).with_context(|| {
        format!(
            "Spec compilation aborted ({} -> {})",
            config.input_dir.display(),
            config.output_dir.display()
        )
    })?;

    if let BatchOutcome::Completed(report) = outcome {
        if !report.is_success() {
            anyhow::bail!(
                "{} of {} specs failed to compile",
                report.failures.len(),
                report.total
            );
        }
    }

    Ok(())
}
