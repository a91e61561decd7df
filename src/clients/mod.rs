/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/clients/mod.rs
 * Capability traits for the two external tools the deployer drives: the
 * cluster client (kubectl) and the package manager (helm). Only the handful
 * of operations the deployment flow needs are exposed. The real
 * implementations shell out; tests use the in-memory fakes.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::error::CommandError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub mod command;
pub mod helm;
pub mod kubectl;

#[cfg(test)]
pub mod fake;

/// Resource kinds captured in the post-apply status snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Pods,
    Services,
    Ingresses,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Pods => "pods",
            ResourceKind::Services => "svc",
            ResourceKind::Ingresses => "ingress",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Operations needed from the cluster client.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Executable name, used for PATH lookup and messages.
    fn binary(&self) -> &str;

    fn is_installed(&self) -> bool {
        which::which(self.binary()).is_ok()
    }

    /// Lightweight reachability probe against the given (or active) context.
    async fn cluster_info(&self, context: Option<&str>) -> Result<String, CommandError>;

    /// Creates `namespace` if absent. Calling it for an existing namespace
    /// succeeds without changes.
    async fn ensure_namespace(
        &self,
        namespace: &str,
        context: Option<&str>,
        dry_run: bool,
    ) -> Result<(), CommandError>;

    /// Tabular listing of `kind` in `namespace`.
    async fn get(
        &self,
        kind: ResourceKind,
        namespace: &str,
        context: Option<&str>,
    ) -> Result<String, CommandError>;
}

/// A single `upgrade --install` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallRequest {
    pub release: String,
    pub chart: String,
    pub namespace: String,
    pub context: Option<String>,
    /// Passed as `-f`, lower precedence than `set_values`.
    pub values_files: Vec<PathBuf>,
    /// Passed as `--set-string key=value`, values escaped.
    pub set_values: BTreeMap<String, String>,
    pub dry_run: bool,
}

/// Operations needed from the package manager.
#[async_trait]
pub trait PackageManager: Send + Sync {
    fn binary(&self) -> &str;

    fn is_installed(&self) -> bool {
        which::which(self.binary()).is_ok()
    }

    async fn repo_add(&self, name: &str, url: &str) -> Result<(), CommandError>;

    async fn repo_update(&self) -> Result<(), CommandError>;

    /// Installs the release if absent, upgrades it otherwise. Returns the
    /// tool's stdout (the rendered preview when `dry_run` is set).
    async fn upgrade_install(&self, request: &InstallRequest) -> Result<String, CommandError>;
}
