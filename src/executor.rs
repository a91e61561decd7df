/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/executor.rs
 * Deploys the chart to a single cloud target:
 *   1. resolve the cloud profile for the target's provider,
 *   2. ensure the namespace exists,
 *   3. layer the value overrides,
 *   4. run `helm upgrade --install` (optionally as a dry run),
 *   5. snapshot pods, services and ingresses after a real apply.
 * Any failure in steps 2 to 4 is returned immediately. Nothing is retried
 * or rolled back; re-running is safe because install-or-upgrade is keyed on
 * (namespace, release).
 * SPDX-License-Identifier: Apache-2.0 */

use crate::clients::{ClusterClient, InstallRequest, PackageManager, ResourceKind};
use crate::error::DeploymentError;
use crate::model::{CloudTarget, DeploymentRequest, DeploymentResult, DeploymentStatus};
use crate::overrides::OverrideSet;
use crate::plan::DeploymentPlan;
use tracing::{debug, info, instrument, warn};

pub struct Executor<'a> {
    cluster: &'a dyn ClusterClient,
    helm: &'a dyn PackageManager,
    chart: String,
}

impl<'a> Executor<'a> {
    pub fn new(
        cluster: &'a dyn ClusterClient,
        helm: &'a dyn PackageManager,
        chart: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            helm,
            chart: chart.into(),
        }
    }

    pub fn cluster(&self) -> &'a dyn ClusterClient {
        self.cluster
    }

    pub fn package_manager(&self) -> &'a dyn PackageManager {
        self.helm
    }

    /// Deploys `request`'s chart to `target` under `release_name`.
    pub async fn deploy(
        &self,
        target: &CloudTarget,
        request: &DeploymentRequest,
        release_name: &str,
    ) -> Result<DeploymentResult, DeploymentError> {
        self.execute(&DeploymentPlan::new(request, target, release_name))
            .await
    }

    #[instrument(skip_all, fields(
        role = %plan.target.role,
        provider = %plan.target.provider,
        release = %plan.release_name,
        namespace = %plan.namespace
    ))]
    async fn execute(&self, plan: &DeploymentPlan) -> Result<DeploymentResult, DeploymentError> {
        let profile = plan.target.provider.profile();
        debug!(
            ingress_class = profile.ingress_class_name,
            storage_class = profile.storage_class_name,
            "resolved cloud profile"
        );

        self.cluster
            .ensure_namespace(&plan.namespace, plan.context(), plan.dry_run)
            .await
            .map_err(|source| DeploymentError::NamespaceEnsure {
                namespace: plan.namespace.clone(),
                source,
            })?;

        let overrides = OverrideSet::build(plan.values_file.as_deref(), &plan.target).await?;
        debug!(values = ?overrides.merged(), "effective value overrides");

        let install = InstallRequest {
            release: plan.release_name.clone(),
            chart: self.chart.clone(),
            namespace: plan.namespace.clone(),
            context: plan.target.context.clone(),
            values_files: overrides.values_files(),
            set_values: overrides.set_values().clone(),
            dry_run: plan.dry_run,
        };
        let notes = self
            .helm
            .upgrade_install(&install)
            .await
            .map_err(|source| DeploymentError::InstallOrUpgrade {
                release: plan.release_name.clone(),
                namespace: plan.namespace.clone(),
                source,
            })?;

        let mut result = DeploymentResult {
            target: plan.target.clone(),
            namespace: plan.namespace.clone(),
            release_name: plan.release_name.clone(),
            status: DeploymentStatus::DryRunOnly,
            pod_snapshot: String::new(),
            service_snapshot: String::new(),
            ingress_snapshot: String::new(),
            notes,
        };

        if plan.dry_run {
            info!("dry run rendered, no changes applied");
            return Ok(result);
        }

        result.pod_snapshot = self.snapshot(ResourceKind::Pods, plan).await;
        result.service_snapshot = self.snapshot(ResourceKind::Services, plan).await;
        result.ingress_snapshot = self.snapshot(ResourceKind::Ingresses, plan).await;
        result.status = DeploymentStatus::Applied;
        info!("release applied");
        Ok(result)
    }

    async fn snapshot(&self, kind: ResourceKind, plan: &DeploymentPlan) -> String {
        match self.cluster.get(kind, &plan.namespace, plan.context()).await {
            Ok(listing) if listing.trim().is_empty() => {
                format!("No resources found in {} namespace.", plan.namespace)
            }
            Ok(listing) => listing,
            Err(e) => {
                warn!(kind = %kind, error = %e, "status query failed");
                format!("unavailable: {}", e)
            }
        }
    }
}
