/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/error.rs
 * Error types for the deployer. Each concern gets its own enum so callers
 * can print an actionable message; `Error` gathers them at the top level.
 * Every variant ends the run with exit code 1, nothing is retried.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::model::DeploymentResult;
use std::path::PathBuf;
use thiserror::Error;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn describe_context(context: &Option<String>) -> String {
    match context {
        Some(context) => format!("context '{}'", context),
        None => "the current context".to_string(),
    }
}

/// An external tool could not be run or exited unsuccessfully.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("I/O error while talking to '{program}': {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program} {}' exited with {}: {stderr}", .args.join(" "), describe_exit(.code))]
    Failed {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },
}

#[derive(Debug, Error)]
#[error("unsupported cloud provider '{value}'; expected one of: aws, azure, gcp")]
pub struct UnsupportedProviderError {
    pub value: String,
}

#[derive(Debug, Error)]
pub enum PrerequisiteError {
    #[error("cluster client '{binary}' was not found on PATH; install kubectl and retry")]
    MissingClusterClient { binary: String },

    #[error("package manager '{binary}' was not found on PATH; install helm and retry")]
    MissingPackageManager { binary: String },

    #[error("cannot reach a Kubernetes cluster through {}: {message}", describe_context(.context))]
    ClusterUnreachable {
        context: Option<String>,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("failed to read values file {}: {source}", .path.display())]
    ValuesFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("values file {} is not valid YAML: {source}", .path.display())]
    ValuesParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to ensure namespace '{namespace}': {source}")]
    NamespaceEnsure {
        namespace: String,
        source: CommandError,
    },

    #[error("failed to prepare chart repositories: {source}")]
    RepositorySetup { source: CommandError },

    #[error("helm upgrade --install of release '{release}' in namespace '{namespace}' failed: {source}")]
    InstallOrUpgrade {
        release: String,
        namespace: String,
        source: CommandError,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    UnsupportedProvider(#[from] UnsupportedProviderError),

    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    /// A target failed mid-sequence. Targets in `completed` stay deployed.
    #[error("{} target '{}' failed: {source}", .failed.target.role, .failed.target.provider)]
    Orchestration {
        completed: Vec<DeploymentResult>,
        failed: Box<DeploymentResult>,
        source: DeploymentError,
    },
}

impl Error {
    /// Whether the user should be shown the usage line alongside the message.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::Usage(_) | Error::Validation(_) | Error::UnsupportedProvider(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failure_message_carries_tool_output() {
        let err = CommandError::Failed {
            program: "helm".to_string(),
            args: vec!["upgrade".to_string(), "--install".to_string()],
            code: Some(1),
            stderr: "Error: INSTALLATION FAILED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'helm upgrade --install' exited with status 1: Error: INSTALLATION FAILED"
        );
    }

    #[test]
    fn test_unreachable_names_context() {
        let current = PrerequisiteError::ClusterUnreachable {
            context: None,
            message: "connection refused".to_string(),
        };
        assert!(current.to_string().contains("the current context"));

        let named = PrerequisiteError::ClusterUnreachable {
            context: Some("eks-prod".to_string()),
            message: "connection refused".to_string(),
        };
        assert!(named.to_string().contains("context 'eks-prod'"));
    }
}
