/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/model.rs
 * The data model for one invocation: the validated request, the cloud
 * targets it names and the per-target results. Nothing here outlives the
 * process; idempotency across runs comes from `helm upgrade --install`.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::profile::Provider;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_NAMESPACE: &str = "opsaix";
pub const DEFAULT_RELEASE: &str = "opsaix";
/// Region placeholder for targets the caller did not pin to a region.
pub const AUTO_REGION: &str = "auto";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeploymentMode {
    Single,
    Multi,
}

/// Position of a target in a multi-cloud run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Secondary,
    Tertiary,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Tertiary => "tertiary",
        }
    }

    /// Release identity for this role: the primary keeps the base name, the
    /// others get a suffix so they never collide inside one namespace.
    pub fn release_name(self, base: &str) -> String {
        match self {
            Role::Primary => base.to_string(),
            Role::Secondary | Role::Tertiary => format!("{}-{}", base, self.as_str()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One deployment destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudTarget {
    pub provider: Provider,
    pub region: String,
    pub role: Role,
    /// Cluster-client context to deploy through. `None` uses whatever
    /// context is currently active.
    pub context: Option<String>,
}

impl CloudTarget {
    pub fn new(provider: Provider, region: impl Into<String>, role: Role) -> Self {
        Self {
            provider,
            region: region.into(),
            role,
            context: None,
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

/// The validated intent for one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub mode: DeploymentMode,
    /// 1 to 3 targets, primary first.
    pub targets: Vec<CloudTarget>,
    pub namespace: String,
    pub release_base_name: String,
    pub values_file_override: Option<PathBuf>,
    pub dry_run: bool,
}

#[cfg(test)]
impl DeploymentRequest {
    /// A single-cloud request with default namespace and release name.
    pub fn single(target: CloudTarget) -> Self {
        Self {
            mode: DeploymentMode::Single,
            targets: vec![target],
            namespace: DEFAULT_NAMESPACE.to_string(),
            release_base_name: DEFAULT_RELEASE.to_string(),
            values_file_override: None,
            dry_run: false,
        }
    }

    /// A multi-cloud request with default namespace and release name.
    pub fn multi(targets: Vec<CloudTarget>) -> Self {
        Self {
            mode: DeploymentMode::Multi,
            targets,
            ..Self::single(CloudTarget::new(Provider::Aws, AUTO_REGION, Role::Primary))
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeploymentStatus {
    Applied,
    DryRunOnly,
    Failed,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeploymentStatus::Applied => "applied",
            DeploymentStatus::DryRunOnly => "dry-run",
            DeploymentStatus::Failed => "failed",
        };
        f.pad(label)
    }
}

/// Outcome of deploying to one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentResult {
    pub target: CloudTarget,
    pub namespace: String,
    pub release_name: String,
    pub status: DeploymentStatus,
    pub pod_snapshot: String,
    pub service_snapshot: String,
    pub ingress_snapshot: String,
    /// Whatever the package manager printed; for dry runs this is the preview.
    pub notes: String,
}

impl DeploymentResult {
    /// A result for a target whose deployment step failed.
    pub fn failed(target: CloudTarget, namespace: &str, release_name: &str) -> Self {
        Self {
            target,
            namespace: namespace.to_string(),
            release_name: release_name.to_string(),
            status: DeploymentStatus::Failed,
            pod_snapshot: String::new(),
            service_snapshot: String::new(),
            ingress_snapshot: String::new(),
            notes: String::new(),
        }
    }
}
