// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! docker-build-step - Docker image build step for CI pipelines

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docker_build_step::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "docker_build_step=debug"
    } else {
        "docker_build_step=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = if cli.plan {
        docker_build_step::cli::plan::run(cli.args, cli.format).await
    } else {
        docker_build_step::cli::run::run(cli.args).await
    };

    // The miette report that follows carries the full message and output
    if let Err(ref e) = result {
        let code = e.code().map(|c| c.to_string()).unwrap_or_default();
        tracing::error!(code = %code, "Build step failed");
    }

    result
}
