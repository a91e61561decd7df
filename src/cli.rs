/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/cli.rs
 * This file defines the command-line interface of the deployer using the
 * `clap` crate, and the validation step that turns parsed flags into a
 * `DeploymentRequest`. Exactly one of two shapes is accepted:
 *   --cloud <p> --region <r>                          (single cloud)
 *   --multi-cloud --primary <p> [--secondary <p>] [--tertiary <p>]
 * SPDX-License-Identifier: Apache-2.0 */

use crate::config::DeployerConfig;
use crate::error::{Error, Result};
use crate::model::{
    CloudTarget, DeploymentMode, DeploymentRequest, Role, AUTO_REGION, DEFAULT_NAMESPACE,
    DEFAULT_RELEASE,
};
use crate::profile::{self, Provider};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Deploy the opsaix Helm chart to one or more cloud Kubernetes clusters.
#[derive(Parser, Debug)]
#[command(name = "opsaix-deploy", author, version, about, long_about = None)]
pub struct Cli {
    /// Cloud provider for a single-cloud deployment (aws, azure, gcp).
    #[arg(long, value_name = "PROVIDER")]
    pub cloud: Option<String>,

    /// Region of the single-cloud target. Required with --cloud.
    #[arg(long)]
    pub region: Option<String>,

    /// Deploy to up to three clouds in sequence.
    #[arg(long)]
    pub multi_cloud: bool,

    /// Provider of the primary target. Required with --multi-cloud.
    #[arg(long, value_name = "PROVIDER")]
    pub primary: Option<String>,

    /// Provider of the optional secondary target.
    #[arg(long, value_name = "PROVIDER")]
    pub secondary: Option<String>,

    /// Provider of the optional tertiary target.
    #[arg(long, value_name = "PROVIDER")]
    pub tertiary: Option<String>,

    /// Kubernetes namespace shared by every target.
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Release base name; secondary and tertiary targets get a suffix.
    #[arg(long, default_value = DEFAULT_RELEASE)]
    pub release: String,

    /// Base values file; the derived cloud settings override its keys.
    #[arg(long, value_name = "PATH")]
    pub values: Option<PathBuf>,

    /// Render and validate without changing the cluster.
    #[arg(long)]
    pub dry_run: bool,

    /// Chart location passed to helm.
    #[arg(long, env = "OPSAIX_CHART")]
    pub chart: Option<String>,

    /// kubectl context for the single-cloud (or primary) target.
    #[arg(long, env = "OPSAIX_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    /// kubectl context for the primary target.
    #[arg(long, value_name = "CONTEXT")]
    pub primary_context: Option<String>,

    /// kubectl context for the secondary target.
    #[arg(long, value_name = "CONTEXT")]
    pub secondary_context: Option<String>,

    /// kubectl context for the tertiary target.
    #[arg(long, value_name = "CONTEXT")]
    pub tertiary_context: Option<String>,

    /// Optional YAML configuration file.
    #[arg(long, env = "OPSAIX_DEPLOY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

fn provider(value: &str) -> Result<Provider> {
    Ok(profile::resolve(value)?.provider)
}

fn non_empty(flag: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Usage(format!("{} must not be empty", flag)));
    }
    Ok(())
}

impl Cli {
    /// Chart location: flag or env, then config file.
    pub fn chart(&self, config: &DeployerConfig) -> String {
        self.chart.clone().unwrap_or_else(|| config.chart.clone())
    }

    fn role_context(&self, role: Role, config: &DeployerConfig) -> Option<String> {
        let flag = match role {
            Role::Primary => &self.primary_context,
            Role::Secondary => &self.secondary_context,
            Role::Tertiary => &self.tertiary_context,
        };
        let fallback = match role {
            Role::Primary => self.kube_context.clone(),
            Role::Secondary | Role::Tertiary => None,
        };
        flag.clone()
            .or(fallback)
            .or_else(|| config.contexts.get(&role).cloned())
    }

    /// Validates the flag combination and builds the request.
    pub fn into_request(&self, config: &DeployerConfig) -> Result<DeploymentRequest> {
        non_empty("--namespace", &self.namespace)?;
        non_empty("--release", &self.release)?;

        let (mode, targets) = if self.multi_cloud {
            (DeploymentMode::Multi, self.multi_targets(config)?)
        } else {
            (DeploymentMode::Single, vec![self.single_target(config)?])
        };

        Ok(DeploymentRequest {
            mode,
            targets,
            namespace: self.namespace.clone(),
            release_base_name: self.release.clone(),
            values_file_override: self.values.clone(),
            dry_run: self.dry_run,
        })
    }

    fn single_target(&self, config: &DeployerConfig) -> Result<CloudTarget> {
        if self.primary.is_some()
            || self.secondary.is_some()
            || self.tertiary.is_some()
            || self.primary_context.is_some()
            || self.secondary_context.is_some()
            || self.tertiary_context.is_some()
        {
            return Err(Error::Usage(
                "--primary, --secondary, --tertiary and their contexts require --multi-cloud"
                    .to_string(),
            ));
        }

        let (cloud, region) = match (&self.cloud, &self.region) {
            (Some(cloud), Some(region)) => (cloud, region),
            (Some(_), None) => return Err(Error::Usage("--cloud requires --region".to_string())),
            (None, Some(_)) => return Err(Error::Usage("--region requires --cloud".to_string())),
            (None, None) => {
                return Err(Error::Usage(
                    "either --cloud with --region, or --multi-cloud with --primary, is required"
                        .to_string(),
                ))
            }
        };
        non_empty("--region", region)?;

        let context = self.role_context(Role::Primary, config);
        Ok(CloudTarget::new(provider(cloud)?, region.clone(), Role::Primary).with_context(context))
    }

    fn multi_targets(&self, config: &DeployerConfig) -> Result<Vec<CloudTarget>> {
        if self.cloud.is_some() || self.region.is_some() {
            return Err(Error::Usage(
                "--cloud and --region cannot be combined with --multi-cloud".to_string(),
            ));
        }
        let Some(primary) = &self.primary else {
            return Err(Error::Validation(
                "--multi-cloud requires --primary".to_string(),
            ));
        };

        let mut targets = Vec::with_capacity(3);
        for (role, value) in [
            (Role::Primary, Some(primary)),
            (Role::Secondary, self.secondary.as_ref()),
            (Role::Tertiary, self.tertiary.as_ref()),
        ] {
            if let Some(value) = value {
                targets.push(
                    CloudTarget::new(provider(value)?, AUTO_REGION, role)
                        .with_context(self.role_context(role, config)),
                );
            }
        }
        Ok(targets)
    }
}
