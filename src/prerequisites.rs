/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/prerequisites.rs
 * Environment checks run before any deployment: both tools on PATH, then a
 * reachable cluster for every context the run will use. The first failure
 * stops the checks.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::clients::{ClusterClient, PackageManager};
use crate::error::PrerequisiteError;
use crate::model::CloudTarget;
use tracing::{debug, info};

/// Distinct contexts in first-seen order; `None` is the active context.
pub fn contexts_for(targets: &[CloudTarget]) -> Vec<Option<String>> {
    let mut contexts: Vec<Option<String>> = Vec::new();
    for target in targets {
        if !contexts.contains(&target.context) {
            contexts.push(target.context.clone());
        }
    }
    contexts
}

pub async fn check_prerequisites(
    cluster: &dyn ClusterClient,
    helm: &dyn PackageManager,
    contexts: &[Option<String>],
) -> Result<(), PrerequisiteError> {
    if !cluster.is_installed() {
        return Err(PrerequisiteError::MissingClusterClient {
            binary: cluster.binary().to_string(),
        });
    }
    if !helm.is_installed() {
        return Err(PrerequisiteError::MissingPackageManager {
            binary: helm.binary().to_string(),
        });
    }

    for context in contexts {
        debug!(context = ?context, "probing cluster");
        cluster
            .cluster_info(context.as_deref())
            .await
            .map_err(|e| PrerequisiteError::ClusterUnreachable {
                context: context.clone(),
                message: e.to_string(),
            })?;
    }

    info!(contexts = contexts.len(), "prerequisites satisfied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::fake::{CallLog, FakeCluster, FakePackageManager};
    use crate::model::Role;
    use crate::profile::Provider;

    fn fakes() -> (FakeCluster, FakePackageManager, CallLog) {
        let log = CallLog::default();
        (
            FakeCluster::new(log.clone()),
            FakePackageManager::new(log.clone()),
            log,
        )
    }

    #[tokio::test]
    async fn test_all_checks_pass() {
        let (cluster, helm, log) = fakes();
        check_prerequisites(&cluster, &helm, &[None]).await.unwrap();
        assert_eq!(*log.lock().unwrap(), ["kubectl cluster-info -"]);
    }

    #[tokio::test]
    async fn test_missing_kubectl_checked_first() {
        let (mut cluster, mut helm, log) = fakes();
        cluster.installed = false;
        helm.installed = false;
        let err = check_prerequisites(&cluster, &helm, &[None]).await.unwrap_err();
        assert!(matches!(err, PrerequisiteError::MissingClusterClient { .. }));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_helm() {
        let (cluster, mut helm, log) = fakes();
        helm.installed = false;
        let err = check_prerequisites(&cluster, &helm, &[None]).await.unwrap_err();
        assert!(matches!(
            err,
            PrerequisiteError::MissingPackageManager { ref binary } if binary == "helm"
        ));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_context_stops_probing() {
        let (mut cluster, helm, log) = fakes();
        cluster.unreachable.insert(Some("aks-west".to_string()));
        let contexts = [
            Some("aks-west".to_string()),
            Some("gke-eu".to_string()),
        ];
        let err = check_prerequisites(&cluster, &helm, &contexts)
            .await
            .unwrap_err();
        match err {
            PrerequisiteError::ClusterUnreachable { context, message } => {
                assert_eq!(context.as_deref(), Some("aks-west"));
                assert!(message.contains("Unable to connect"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*log.lock().unwrap(), ["kubectl cluster-info aks-west"]);
    }

    #[test]
    fn test_contexts_deduplicated_in_order() {
        let targets = [
            CloudTarget::new(Provider::Aws, "auto", Role::Primary),
            CloudTarget::new(Provider::Azure, "auto", Role::Secondary)
                .with_context(Some("aks".to_string())),
            CloudTarget::new(Provider::Gcp, "auto", Role::Tertiary),
        ];
        assert_eq!(contexts_for(&targets), [None, Some("aks".to_string())]);
    }
}
