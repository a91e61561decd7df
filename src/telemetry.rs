/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/telemetry.rs
 * Sets up `tracing` for the CLI. Logs go to stderr so stdout carries only
 * the deployment report. `RUST_LOG` overrides the -v derived level.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::cli::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. A second call keeps the first subscriber
/// and prints a warning to stderr.
pub fn init(verbose: u8, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        eprintln!("[opsaix-deploy] Failed to initialize logging.");
    }
}
