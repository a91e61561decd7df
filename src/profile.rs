/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/profile.rs
 * The closed set of supported cloud providers and the fixed infrastructure
 * profile each one maps to. The table values are part of the chart's external
 * contract: the ingress controller and storage provisioner names must match
 * what the managed Kubernetes offerings ship with.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::error::UnsupportedProviderError;
use std::fmt;
use std::str::FromStr;

/// A cloud provider the chart can be deployed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    /// Every supported provider, in the order they are listed to users.
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    /// The lowercase identifier used on the command line and in `global.cloud`.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
        }
    }

    /// The fixed profile for this provider.
    pub fn profile(self) -> CloudProfile {
        match self {
            Provider::Aws => CloudProfile {
                provider: self,
                ingress_class_name: "aws-load-balancer-controller",
                storage_class_name: "gp3",
            },
            Provider::Azure => CloudProfile {
                provider: self,
                ingress_class_name: "azure/application-gateway",
                storage_class_name: "managed-premium",
            },
            Provider::Gcp => CloudProfile {
                provider: self,
                ingress_class_name: "gce",
                storage_class_name: "standard-rwo",
            },
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = UnsupportedProviderError;

    /// Matching is exact: `AWS` or ` aws` are rejected just like `oracle`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| UnsupportedProviderError {
                value: value.to_string(),
            })
    }
}

/// Infrastructure selectors the chart needs for a given provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CloudProfile {
    pub provider: Provider,
    pub ingress_class_name: &'static str,
    pub storage_class_name: &'static str,
}

/// Resolves a raw provider identifier to its profile.
pub fn resolve(provider: &str) -> Result<CloudProfile, UnsupportedProviderError> {
    provider.parse::<Provider>().map(Provider::profile)
}
