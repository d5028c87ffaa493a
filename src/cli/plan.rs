// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Plan command - show what the step would run

use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::{OutputFormat, PluginArgs};
use crate::command::{self, PlannedCommand};
use crate::plugin::Plugin;

/// Everything the step would execute, secrets masked
#[derive(Debug, Serialize)]
pub struct StepPlan {
    pub daemon: PlannedCommand,
    pub probe: PlannedCommand,
    pub max_attempts: u32,
    pub interval_secs: u64,
    /// Longest total wait between probes before the step gives up
    pub wait_budget_secs: u64,
    /// `None` in dry-run mode or when credentials are missing
    pub login: Option<PlannedCommand>,
    pub missing_credentials: Vec<&'static str>,
    pub pipeline: Vec<PlannedCommand>,
    pub missing_tools: Vec<PathBuf>,
}

impl StepPlan {
    /// Build the plan without running anything
    pub fn new(plugin: &Plugin, cwd: PathBuf) -> Self {
        let settings = plugin.settings();
        let toolchain = plugin.toolchain();

        let missing_credentials = if settings.dry_run {
            Vec::new()
        } else {
            settings.login.missing()
        };
        let login = (!settings.dry_run && missing_credentials.is_empty())
            .then(|| command::docker_login(toolchain, &settings.login).planned());

        let tools_dir = settings.build.directory.clone().unwrap_or(cwd);

        Self {
            daemon: command::daemon(toolchain, &settings.daemon).planned(),
            probe: command::readiness_probe(toolchain).planned(),
            max_attempts: toolchain.poll.max_attempts,
            interval_secs: toolchain.poll.interval.as_secs(),
            wait_budget_secs: toolchain.poll.budget().as_secs(),
            login,
            missing_credentials,
            pipeline: plugin.plan().planned(),
            missing_tools: toolchain.missing_tools(&tools_dir),
        }
    }
}

/// Print the plan
pub async fn run(args: PluginArgs, format: OutputFormat) -> Result<()> {
    let plugin = Plugin::new(args.settings(), args.toolchain());
    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    let plan = StepPlan::new(&plugin, cwd);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan).into_diagnostic()?);
        }
        OutputFormat::Text => print_text(&plan),
    }

    Ok(())
}

fn render(cmd: &PlannedCommand) -> String {
    let mut line = cmd.program.display().to_string();
    for arg in &cmd.args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn print_text(plan: &StepPlan) {
    println!("{}", "Docker build step".bold());
    println!("{}", "═".repeat(50));
    println!();

    println!("  {} {}", "daemon".bold(), render(&plan.daemon));
    println!(
        "  {} {} {}",
        "probe".bold(),
        render(&plan.probe),
        format!(
            "[{} attempts, {}s apart, gives up after {}s]",
            plan.max_attempts, plan.interval_secs, plan.wait_budget_secs
        )
        .dimmed()
    );

    match &plan.login {
        Some(login) => println!("  {} {}", "login".bold(), render(login)),
        None if plan.missing_credentials.is_empty() => {
            println!("  {} {}", "login".bold(), "(skipped, dry run)".dimmed())
        }
        None => println!(
            "  {} {} {}",
            "✗".red(),
            "login".bold(),
            format!("missing {}", plan.missing_credentials.join(" and ")).red()
        ),
    }

    println!();
    println!(
        "Execution plan ({} command{}):",
        plan.pipeline.len(),
        if plan.pipeline.len() == 1 { "" } else { "s" }
    );
    println!();

    for (i, cmd) in plan.pipeline.iter().enumerate() {
        print!("  {}. {} ({})", i + 1, render(cmd), cmd.kind);
        if cmd.best_effort {
            print!(" {}", "[failure ignored]".dimmed());
        }
        if let Some(dir) = &cmd.current_dir {
            print!(" {}", format!("in {}", dir.display()).dimmed());
        }
        println!();
    }

    if !plan.missing_tools.is_empty() {
        println!();
        println!("{}", "Missing executables:".yellow().bold());
        for tool in &plan.missing_tools {
            println!("  {} {}", "⚠".yellow(), tool.display());
        }
    }
}
