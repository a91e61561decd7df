/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/orchestrator.rs
 * Drives a whole run: prerequisite checks, chart repositories, then one
 * executor call per target. Multi-cloud targets run strictly one after
 * another, primary first; a failing target ends the run and leaves the
 * targets before it deployed.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::config::ChartRepository;
use crate::error::{DeploymentError, Error, Result};
use crate::executor::Executor;
use crate::model::{DeploymentMode, DeploymentRequest, DeploymentResult, Role};
use crate::prerequisites::{check_prerequisites, contexts_for};
use tracing::{info, instrument};

pub struct Orchestrator<'a> {
    executor: Executor<'a>,
    repositories: Vec<ChartRepository>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(executor: Executor<'a>, repositories: Vec<ChartRepository>) -> Self {
        Self {
            executor,
            repositories,
        }
    }

    /// Checks the environment, then deploys according to `request.mode`.
    pub async fn run(&self, request: &DeploymentRequest) -> Result<Vec<DeploymentResult>> {
        check_prerequisites(
            self.executor.cluster(),
            self.executor.package_manager(),
            &contexts_for(&request.targets),
        )
        .await?;
        self.prepare_repositories().await?;

        match request.mode {
            DeploymentMode::Single => Ok(vec![self.deploy_single(request).await?]),
            DeploymentMode::Multi => self.deploy_multi(request).await,
        }
    }

    /// Registers configured chart repositories and refreshes their indexes.
    pub async fn prepare_repositories(&self) -> std::result::Result<(), DeploymentError> {
        if self.repositories.is_empty() {
            return Ok(());
        }
        let helm = self.executor.package_manager();
        for repo in &self.repositories {
            info!(name = %repo.name, url = %repo.url, "adding chart repository");
            helm.repo_add(&repo.name, &repo.url)
                .await
                .map_err(|source| DeploymentError::RepositorySetup { source })?;
        }
        helm.repo_update()
            .await
            .map_err(|source| DeploymentError::RepositorySetup { source })
    }

    pub async fn deploy_single(&self, request: &DeploymentRequest) -> Result<DeploymentResult> {
        let [target] = request.targets.as_slice() else {
            return Err(Error::Validation(format!(
                "single-cloud deployment needs exactly one target, got {}",
                request.targets.len()
            )));
        };
        Ok(self
            .executor
            .deploy(target, request, &request.release_base_name)
            .await?)
    }

    /// Deploys every target in order and returns their results. Stops at the
    /// first failure without touching targets that already succeeded.
    #[instrument(skip_all, fields(targets = request.targets.len()))]
    pub async fn deploy_multi(&self, request: &DeploymentRequest) -> Result<Vec<DeploymentResult>> {
        validate_sequence(request)?;

        let mut completed = Vec::with_capacity(request.targets.len());
        for target in &request.targets {
            let release_name = target.role.release_name(&request.release_base_name);
            info!(role = %target.role, provider = %target.provider, release = %release_name, "deploying target");
            match self.executor.deploy(target, request, &release_name).await {
                Ok(result) => completed.push(result),
                Err(source) => {
                    let failed =
                        DeploymentResult::failed(target.clone(), &request.namespace, &release_name);
                    return Err(Error::Orchestration {
                        completed,
                        failed: Box::new(failed),
                        source,
                    });
                }
            }
        }
        Ok(completed)
    }
}

/// Targets must start with the primary and follow primary, secondary,
/// tertiary order without repeats.
fn validate_sequence(request: &DeploymentRequest) -> Result<()> {
    match request.targets.first() {
        Some(first) if first.role == Role::Primary => {}
        _ => {
            return Err(Error::Validation(
                "multi-cloud deployment requires a primary target (--primary)".to_string(),
            ))
        }
    }
    if request.targets.len() > 3 {
        return Err(Error::Validation(format!(
            "at most three cloud targets are supported, got {}",
            request.targets.len()
        )));
    }
    if request.targets.windows(2).any(|w| w[0].role >= w[1].role) {
        return Err(Error::Validation(
            "targets must be ordered primary, secondary, tertiary".to_string(),
        ));
    }
    Ok(())
}
