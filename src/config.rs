/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/config.rs
 * Optional YAML configuration for the deployer. Every field has a default,
 * so a run without a config file behaves exactly like one with an empty file.
 * Command-line flags and their environment fallbacks take precedence over
 * anything read here.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::model::Role;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CHART: &str = "./helm/opsaix";

/// A chart repository registered with helm before deploying.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChartRepository {
    pub name: String,
    pub url: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployerConfig {
    pub chart: String,
    pub kubectl_binary: String,
    pub helm_binary: String,
    pub repositories: Vec<ChartRepository>,
    /// Cluster-client context per multi-cloud role.
    pub contexts: BTreeMap<Role, String>,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            chart: DEFAULT_CHART.to_string(),
            kubectl_binary: "kubectl".to_string(),
            helm_binary: "helm".to_string(),
            repositories: Vec::new(),
            contexts: BTreeMap::new(),
        }
    }
}

impl DeployerConfig {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).context("Failed to parse deployer configuration")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub async fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }
}
