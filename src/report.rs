/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/report.rs
 * Human-readable output for finished deployments. Pure presentation: every
 * function renders to a String and the caller decides where it goes.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::model::{DeploymentRequest, DeploymentResult, DeploymentStatus};
use std::fmt::Write;

/// Full status report for an applied release.
pub fn render(result: &DeploymentResult) -> String {
    let ns = &result.namespace;
    let release = &result.release_name;
    let context = result
        .target
        .context
        .as_deref()
        .map_or_else(String::new, |c| format!(" --context {}", c));

    let mut out = String::new();
    let _ = writeln!(out, "✅ Deployment complete");
    let _ = writeln!(out, "   Namespace: {}", ns);
    let _ = writeln!(out, "   Release:   {}", release);
    let _ = writeln!(
        out,
        "   Cloud:     {} ({})",
        result.target.provider, result.target.region
    );
    for (title, snapshot) in [
        ("Pods", &result.pod_snapshot),
        ("Services", &result.service_snapshot),
        ("Ingress", &result.ingress_snapshot),
    ] {
        let _ = writeln!(out, "\n--- {} ---\n{}", title, snapshot.trim_end());
    }
    let _ = writeln!(out, "\nUseful commands:");
    let _ = writeln!(out, "  kubectl{} get pods -n {}", context, ns);
    let _ = writeln!(out, "  kubectl{} logs -n {} -l app.kubernetes.io/instance={} -f", context, ns, release);
    let _ = writeln!(out, "  helm status {} -n {}", release, ns);
    let _ = writeln!(out, "  helm uninstall {} -n {}", release, ns);
    out
}

/// Short confirmation for a dry run, followed by the rendered preview.
pub fn render_dry_run(result: &DeploymentResult) -> String {
    let mut out = format!(
        "✅ Dry run complete for release '{}' in namespace '{}' ({} / {}). No changes were applied.\n",
        result.release_name, result.namespace, result.target.provider, result.target.region
    );
    if !result.notes.trim().is_empty() {
        let _ = writeln!(out, "\n{}", result.notes.trim_end());
    }
    out
}

/// Report for one result; failed results are summarised, never detailed.
pub fn render_result(result: &DeploymentResult) -> String {
    match result.status {
        DeploymentStatus::Applied => render(result),
        DeploymentStatus::DryRunOnly => render_dry_run(result),
        DeploymentStatus::Failed => format!(
            "❌ Release '{}' on {} failed\n",
            result.release_name, result.target.provider
        ),
    }
}

/// One line per requested target. Targets after a failure show as skipped.
pub fn render_summary(
    request: &DeploymentRequest,
    completed: &[DeploymentResult],
    failed: Option<&DeploymentResult>,
) -> String {
    let mut out = String::from("\n--- Deployment Summary ---\n");
    for target in &request.targets {
        let outcome = completed
            .iter()
            .chain(failed)
            .find(|r| r.target.role == target.role);
        let (release, status) = match outcome {
            Some(r) => (r.release_name.clone(), r.status.to_string()),
            None => (
                target.role.release_name(&request.release_base_name),
                "skipped".to_string(),
            ),
        };
        let _ = writeln!(
            out,
            "{:<10} {:<6} {:<14} {:<24} {}",
            target.role, target.provider, target.region, release, status
        );
    }
    out.push_str("--- End of Summary ---\n");
    out
}
