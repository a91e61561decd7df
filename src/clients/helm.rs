/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/clients/helm.rs
 * Implements the `PackageManager` trait on top of the `helm` CLI.
 * SPDX-License-Identifier: Apache-2.0 */

use super::{command::execute_command, InstallRequest, PackageManager};
use crate::error::CommandError;
use async_trait::async_trait;

/// Package manager backed by the helm executable.
pub struct Helm {
    binary: String,
}

impl Helm {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Escapes a value for helm's `--set` syntax, which splits on `,` and
/// treats `\` as an escape.
fn escape_set_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ',' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Builds `upgrade --install <release> <chart> --namespace <ns> ...`.
///
/// Values files come before `--set-string` flags; helm gives the flags the
/// last word, so the derived cloud overrides win over anything in a user file.
/// `--set-string` keeps values like `true` or `1` as strings.
pub fn upgrade_install_args(request: &InstallRequest) -> Vec<String> {
    let mut args = vec![
        "upgrade".to_string(),
        "--install".to_string(),
        request.release.clone(),
        request.chart.clone(),
        "--namespace".to_string(),
        request.namespace.clone(),
    ];
    if let Some(context) = &request.context {
        args.push("--kube-context".to_string());
        args.push(context.clone());
    }
    for file in &request.values_files {
        args.push("-f".to_string());
        args.push(file.display().to_string());
    }
    for (key, value) in &request.set_values {
        args.push("--set-string".to_string());
        args.push(format!("{}={}", key, escape_set_value(value)));
    }
    if request.dry_run {
        args.push("--dry-run".to_string());
    }
    args
}

#[async_trait]
impl PackageManager for Helm {
    fn binary(&self) -> &str {
        &self.binary
    }

    async fn repo_add(&self, name: &str, url: &str) -> Result<(), CommandError> {
        let args = ["repo", "add", name, url, "--force-update"].map(String::from);
        execute_command(&self.binary, &args, None).await?;
        Ok(())
    }

    async fn repo_update(&self) -> Result<(), CommandError> {
        let args = ["repo", "update"].map(String::from);
        execute_command(&self.binary, &args, None).await?;
        Ok(())
    }

    async fn upgrade_install(&self, request: &InstallRequest) -> Result<String, CommandError> {
        execute_command(&self.binary, &upgrade_install_args(request), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CloudTarget, Role};
    use crate::overrides::derived_values;
    use crate::profile::Provider;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn request() -> InstallRequest {
        InstallRequest {
            release: "opsaix".to_string(),
            chart: "./helm/opsaix".to_string(),
            namespace: "opsaix".to_string(),
            context: None,
            values_files: vec![],
            set_values: BTreeMap::new(),
            dry_run: false,
        }
    }

    #[test]
    fn test_minimal_invocation() {
        assert_eq!(
            upgrade_install_args(&request()),
            ["upgrade", "--install", "opsaix", "./helm/opsaix", "--namespace", "opsaix"]
        );
    }

    #[test]
    fn test_values_file_precedes_set_flags() {
        let mut req = request();
        req.values_files.push(PathBuf::from("custom.yaml"));
        req.set_values
            .insert("global.storageClass".to_string(), "gp3".to_string());
        req.set_values
            .insert("global.cloud".to_string(), "aws".to_string());
        req.dry_run = true;
        req.context = Some("eks-prod".to_string());

        let args = upgrade_install_args(&req);
        assert_eq!(
            &args[6..],
            [
                "--kube-context",
                "eks-prod",
                "-f",
                "custom.yaml",
                "--set-string",
                "global.cloud=aws",
                "--set-string",
                "global.storageClass=gp3",
                "--dry-run",
            ]
        );
    }

    #[test]
    fn test_region_cannot_inject_extra_keys() {
        let target = CloudTarget::new(Provider::Aws, "us-east-1,global.cloud=gcp", Role::Primary);
        let mut req = request();
        req.set_values = derived_values(&target);

        let args = upgrade_install_args(&req);
        assert!(args.contains(&"global.cloud=aws".to_string()));
        assert!(args.contains(&r"global.region=us-east-1\,global.cloud\=gcp".to_string()));
        assert!(!args.iter().any(|a| a == "--set"));
    }

    #[test]
    fn test_escape_set_value() {
        assert_eq!(escape_set_value("eu-west-1"), "eu-west-1");
        assert_eq!(escape_set_value("azure/application-gateway"), "azure/application-gateway");
        assert_eq!(escape_set_value(r"a\b"), r"a\\b");
        assert_eq!(escape_set_value("a,b=c"), r"a\,b\=c");
    }
}
