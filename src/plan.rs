/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/plan.rs
 * A `DeploymentPlan` is everything the executor needs for one target,
 * computed up front from the request. Each target gets its own plan value;
 * nothing is carried over or patched between targets.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::model::{CloudTarget, DeploymentRequest};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentPlan {
    pub target: CloudTarget,
    pub namespace: String,
    pub release_name: String,
    pub values_file: Option<PathBuf>,
    pub dry_run: bool,
}

impl DeploymentPlan {
    /// Plan with an explicit release name.
    pub fn new(request: &DeploymentRequest, target: &CloudTarget, release_name: &str) -> Self {
        Self {
            target: target.clone(),
            namespace: request.namespace.clone(),
            release_name: release_name.to_string(),
            values_file: request.values_file_override.clone(),
            dry_run: request.dry_run,
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.target.context.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, AUTO_REGION};
    use crate::profile::Provider;

    #[test]
    fn test_plans_are_independent_per_target() {
        let mut request = DeploymentRequest::multi(vec![
            CloudTarget::new(Provider::Aws, AUTO_REGION, Role::Primary),
            CloudTarget::new(Provider::Gcp, AUTO_REGION, Role::Secondary)
                .with_context(Some("gke-eu".to_string())),
        ]);
        request.release_base_name = "foo".to_string();
        request.dry_run = true;

        let plans: Vec<_> = request
            .targets
            .iter()
            .map(|t| DeploymentPlan::new(&request, t, &t.role.release_name("foo")))
            .collect();

        assert_eq!(plans[0].release_name, "foo");
        assert_eq!(plans[0].context(), None);
        assert_eq!(plans[1].release_name, "foo-secondary");
        assert_eq!(plans[1].context(), Some("gke-eu"));
        assert!(plans.iter().all(|p| p.dry_run && p.namespace == "opsaix"));
    }
}
