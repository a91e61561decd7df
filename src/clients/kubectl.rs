/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/clients/kubectl.rs
 * Implements the `ClusterClient` trait on top of the `kubectl` CLI.
 * kubectl is expected to already have credentials for the target cluster;
 * this client only selects the context when one is configured.
 * SPDX-License-Identifier: Apache-2.0 */

use super::{command::execute_command, ClusterClient, ResourceKind};
use crate::error::CommandError;
use async_trait::async_trait;

/// Cluster client backed by the kubectl executable.
pub struct Kubectl {
    binary: String,
}

impl Kubectl {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Prefixes `--context <ctx>` when a context is pinned.
fn with_context(context: Option<&str>, rest: &[&str]) -> Vec<String> {
    let mut args = Vec::with_capacity(rest.len() + 2);
    if let Some(context) = context {
        args.push("--context".to_string());
        args.push(context.to_string());
    }
    args.extend(rest.iter().map(|s| s.to_string()));
    args
}

/// `kubectl create namespace <ns> --dry-run=client -o yaml`: renders the
/// manifest without touching the cluster.
pub fn render_namespace_args(namespace: &str, context: Option<&str>) -> Vec<String> {
    with_context(
        context,
        &["create", "namespace", namespace, "--dry-run=client", "-o", "yaml"],
    )
}

/// `kubectl apply -f -`, which creates or leaves the namespace unchanged.
pub fn apply_stdin_args(context: Option<&str>, dry_run: bool) -> Vec<String> {
    let mut args = with_context(context, &["apply", "-f", "-"]);
    if dry_run {
        args.push("--dry-run=client".to_string());
    }
    args
}

pub fn get_args(kind: ResourceKind, namespace: &str, context: Option<&str>) -> Vec<String> {
    let mut args = with_context(context, &["get", kind.as_str(), "-n", namespace]);
    if kind == ResourceKind::Pods {
        args.push("-o".to_string());
        args.push("wide".to_string());
    }
    args
}

#[async_trait]
impl ClusterClient for Kubectl {
    fn binary(&self) -> &str {
        &self.binary
    }

    async fn cluster_info(&self, context: Option<&str>) -> Result<String, CommandError> {
        execute_command(&self.binary, &with_context(context, &["cluster-info"]), None).await
    }

    async fn ensure_namespace(
        &self,
        namespace: &str,
        context: Option<&str>,
        dry_run: bool,
    ) -> Result<(), CommandError> {
        let manifest =
            execute_command(&self.binary, &render_namespace_args(namespace, context), None).await?;
        execute_command(
            &self.binary,
            &apply_stdin_args(context, dry_run),
            Some(&manifest),
        )
        .await?;
        Ok(())
    }

    async fn get(
        &self,
        kind: ResourceKind,
        namespace: &str,
        context: Option<&str>,
    ) -> Result<String, CommandError> {
        execute_command(&self.binary, &get_args(kind, namespace, context), None).await
    }
}
