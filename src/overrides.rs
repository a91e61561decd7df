/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/overrides.rs
 * Builds the value overrides handed to helm for one target. Two layers:
 * the optional user values file at the bottom, the keys derived from the
 * target and its cloud profile on top. On a key conflict the derived layer
 * wins, mirroring helm's own `-f` then `--set-string` ordering.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::error::DeploymentError;
use crate::model::CloudTarget;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const KEY_CLOUD: &str = "global.cloud";
pub const KEY_REGION: &str = "global.region";
pub const KEY_INGRESS_CLASS: &str = "global.ingressClass";
pub const KEY_STORAGE_CLASS: &str = "global.storageClass";

/// The layered overrides for a single deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct OverrideSet {
    values_file: Option<PathBuf>,
    file_values: BTreeMap<String, String>,
    derived: BTreeMap<String, String>,
}

/// Keys every deployment sets from its target.
pub fn derived_values(target: &CloudTarget) -> BTreeMap<String, String> {
    let profile = target.provider.profile();
    BTreeMap::from([
        (KEY_CLOUD.to_string(), target.provider.as_str().to_string()),
        (KEY_REGION.to_string(), target.region.clone()),
        (
            KEY_INGRESS_CLASS.to_string(),
            profile.ingress_class_name.to_string(),
        ),
        (
            KEY_STORAGE_CLASS.to_string(),
            profile.storage_class_name.to_string(),
        ),
    ])
}

/// Flattens a YAML document into helm-style dotted keys (`a.b`, `list[0]`).
pub fn flatten(value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = scalar_to_string(key);
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(child, path, out);
            }
        }
        Value::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, format!("{}[{}]", prefix, index), out);
            }
        }
        Value::Tagged(tagged) => flatten_into(&tagged.value, prefix, out),
        scalar => {
            if !prefix.is_empty() {
                out.insert(prefix, scalar_to_string(scalar));
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

impl OverrideSet {
    /// Reads the optional values file and layers the target's keys on top.
    pub async fn build(
        values_file: Option<&Path>,
        target: &CloudTarget,
    ) -> Result<Self, DeploymentError> {
        let file_values = match values_file {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|source| {
                    DeploymentError::ValuesFile {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                let document: Value = serde_yaml::from_str(&raw).map_err(|source| {
                    DeploymentError::ValuesParse {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                flatten(&document)
            }
            None => BTreeMap::new(),
        };

        Ok(Self {
            values_file: values_file.map(Path::to_path_buf),
            file_values,
            derived: derived_values(target),
        })
    }

    /// Files to pass with `-f`.
    pub fn values_files(&self) -> Vec<PathBuf> {
        self.values_file.iter().cloned().collect()
    }

    /// Keys to pass with `--set-string`.
    pub fn set_values(&self) -> &BTreeMap<String, String> {
        &self.derived
    }

    /// The effective values after layering, derived keys last.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut merged = self.file_values.clone();
        merged.extend(self.derived.clone());
        merged
    }
}
