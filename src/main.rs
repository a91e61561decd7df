/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/main.rs
 *
 * Entry point for `opsaix-deploy`. Parses the command line, loads the
 * optional config file, then hands a validated `DeploymentRequest` to the
 * orchestrator, which runs kubectl and helm for each cloud target in turn.
 * Every failure ends the process with exit code 1; `--help` exits 0.
 *
 * SPDX-License-Identifier: Apache-2.0
 */

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

mod cli;
mod clients;
mod config;
mod error;
mod executor;
mod model;
mod orchestrator;
mod overrides;
mod plan;
mod prerequisites;
mod profile;
mod report;
mod telemetry;

use crate::cli::Cli;
use crate::clients::{helm::Helm, kubectl::Kubectl};
use crate::config::DeployerConfig;
use crate::error::Error;
use crate::executor::Executor;
use crate::model::{DeploymentMode, DeploymentRequest};
use crate::orchestrator::Orchestrator;

fn announce(request: &DeploymentRequest) {
    let targets: Vec<String> = request
        .targets
        .iter()
        .map(|t| format!("{} {}/{}", t.role, t.provider, t.region))
        .collect();
    println!(
        "➡️  Deploying release '{}' to namespace '{}'{}: {}",
        request.release_base_name,
        request.namespace,
        if request.dry_run { " (dry run)" } else { "" },
        targets.join(", ")
    );
}

async fn run(cli: &Cli) -> Result<()> {
    let config = DeployerConfig::load_optional(cli.config.as_deref()).await?;
    let request = cli.into_request(&config)?;

    let kubectl = Kubectl::new(&config.kubectl_binary);
    let helm = Helm::new(&config.helm_binary);
    let executor = Executor::new(&kubectl, &helm, cli.chart(&config));
    let orchestrator = Orchestrator::new(executor, config.repositories.clone());

    announce(&request);

    match orchestrator.run(&request).await {
        Ok(results) => {
            for result in &results {
                println!("{}", report::render_result(result));
            }
            if request.mode == DeploymentMode::Multi {
                print!("{}", report::render_summary(&request, &results, None));
            }
            Ok(())
        }
        Err(Error::Orchestration {
            completed,
            failed,
            source,
        }) => {
            for result in &completed {
                println!("{}", report::render_result(result));
            }
            print!("{}", report::render_summary(&request, &completed, Some(failed.as_ref())));
            Err(Error::Orchestration {
                completed,
                failed,
                source,
            }
            .into())
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // clap reports usage errors with status 2; this tool uses 1 for every failure.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    telemetry::init(cli.verbose, cli.log_format);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(err) => {
                    eprintln!("\n❌ An error occurred: {}", err);
                    if err.is_usage() {
                        eprintln!("\n{}", Cli::command().render_usage());
                        eprintln!("For more information, try '--help'.");
                    }
                }
                None => eprintln!("\n❌ An error occurred: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
