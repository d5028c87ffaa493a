// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Run the build step

use colored::Colorize;
use miette::Result;

use super::PluginArgs;
use crate::pipeline::{PipelineReport, StepOutcome};
use crate::plugin::Plugin;

/// Run the step with the given settings
pub async fn run(args: PluginArgs) -> Result<()> {
    let plugin = Plugin::new(args.settings(), args.toolchain());
    let report = plugin.exec().await?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    println!();
    for step in &report.steps {
        match step.outcome {
            StepOutcome::Succeeded => println!(
                "  {} {} ({:.2}s)",
                "✓".green(),
                step.kind.to_string().bold(),
                step.duration.as_secs_f64()
            ),
            StepOutcome::Tolerated => println!(
                "  {} {} {}",
                "⚠".yellow(),
                step.kind.to_string().bold(),
                "(failed, ignored)".dimmed()
            ),
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "Build step completed successfully in {:.2}s",
            report.duration.as_secs_f64()
        )
        .green()
    );
}
