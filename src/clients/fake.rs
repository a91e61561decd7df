/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/clients/fake.rs
 * In-memory stand-ins for kubectl and helm. They keep namespace and release
 * state, record every call in order and can be told to fail, which is enough
 * to exercise the whole deployment flow without a cluster.
 * SPDX-License-Identifier: Apache-2.0 */

use super::{ClusterClient, InstallRequest, PackageManager, ResourceKind};
use crate::error::CommandError;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Ordered call log shared between fakes so tests can assert interleaving.
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn failed(program: &str, stderr: &str) -> CommandError {
    CommandError::Failed {
        program: program.to_string(),
        args: vec![],
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

fn record(log: &CallLog, entry: String) {
    log.lock().unwrap().push(entry);
}

pub struct FakeCluster {
    pub installed: bool,
    /// Contexts whose `cluster-info` fails.
    pub unreachable: BTreeSet<Option<String>>,
    pub fail_namespace: bool,
    pub namespaces: Mutex<BTreeSet<String>>,
    pub calls: CallLog,
}

impl FakeCluster {
    pub fn new(calls: CallLog) -> Self {
        Self {
            installed: true,
            unreachable: BTreeSet::new(),
            fail_namespace: false,
            namespaces: Mutex::new(BTreeSet::new()),
            calls,
        }
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.lock().unwrap().contains(namespace)
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    fn binary(&self) -> &str {
        "kubectl"
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn cluster_info(&self, context: Option<&str>) -> Result<String, CommandError> {
        record(
            &self.calls,
            format!("kubectl cluster-info {}", context.unwrap_or("-")),
        );
        if self.unreachable.contains(&context.map(str::to_string)) {
            return Err(failed("kubectl", "Unable to connect to the server"));
        }
        Ok("Kubernetes control plane is running".to_string())
    }

    async fn ensure_namespace(
        &self,
        namespace: &str,
        context: Option<&str>,
        dry_run: bool,
    ) -> Result<(), CommandError> {
        record(
            &self.calls,
            format!("kubectl ensure-namespace {} {}", namespace, context.unwrap_or("-")),
        );
        if self.fail_namespace {
            return Err(failed("kubectl", "forbidden"));
        }
        if !dry_run {
            self.namespaces.lock().unwrap().insert(namespace.to_string());
        }
        Ok(())
    }

    async fn get(
        &self,
        kind: ResourceKind,
        namespace: &str,
        _context: Option<&str>,
    ) -> Result<String, CommandError> {
        record(&self.calls, format!("kubectl get {} {}", kind, namespace));
        Ok(format!("NAME\nopsaix-{}-0", kind))
    }
}

pub struct FakePackageManager {
    pub installed: bool,
    /// Releases whose install fails.
    pub failing_releases: BTreeSet<String>,
    pub fail_repo_update: bool,
    /// Installed releases keyed by (namespace, release).
    pub releases: Mutex<BTreeMap<(String, String), InstallRequest>>,
    pub calls: CallLog,
}

impl FakePackageManager {
    pub fn new(calls: CallLog) -> Self {
        Self {
            installed: true,
            failing_releases: BTreeSet::new(),
            fail_repo_update: false,
            releases: Mutex::new(BTreeMap::new()),
            calls,
        }
    }

    pub fn release(&self, namespace: &str, release: &str) -> Option<InstallRequest> {
        self.releases
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), release.to_string()))
            .cloned()
    }
}

#[async_trait]
impl PackageManager for FakePackageManager {
    fn binary(&self) -> &str {
        "helm"
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn repo_add(&self, name: &str, url: &str) -> Result<(), CommandError> {
        record(&self.calls, format!("helm repo add {} {}", name, url));
        Ok(())
    }

    async fn repo_update(&self) -> Result<(), CommandError> {
        record(&self.calls, "helm repo update".to_string());
        if self.fail_repo_update {
            return Err(failed("helm", "repository unavailable"));
        }
        Ok(())
    }

    async fn upgrade_install(&self, request: &InstallRequest) -> Result<String, CommandError> {
        record(
            &self.calls,
            format!("helm upgrade {} {}", request.release, request.namespace),
        );
        if self.failing_releases.contains(&request.release) {
            return Err(failed("helm", "UPGRADE FAILED: timed out waiting for the condition"));
        }
        if request.dry_run {
            return Ok(format!("NAME: {}\nSTATUS: pending-install", request.release));
        }
        self.releases.lock().unwrap().insert(
            (request.namespace.clone(), request.release.clone()),
            request.clone(),
        );
        Ok(format!("Release \"{}\" has been upgraded.", request.release))
    }
}
