// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster inventory file registered at startup.
//!
//! ```yaml
//! clusters:
//!   - name: eu-1
//!     description: Primary EU cluster
//!     kubeconfigPath: /etc/multikube/eu-1.yaml
//! ```

use crate::error::{MultikubeError, Result};
use crate::provisioning::{ClusterService, RegisterCluster};
use crate::types::Principal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Inventory {
    #[serde(default)]
    pub clusters: Vec<InventoryEntry>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kubeconfig_path: PathBuf,
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            MultikubeError::ConfigurationError(format!(
                "cannot read inventory {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| MultikubeError::ConfigurationError(format!("invalid inventory: {}", e)))
    }

    /// Register every entry, logging and skipping the ones that fail.
    /// Returns how many clusters were registered.
    pub async fn register_all(&self, service: &ClusterService, principal: &Principal) -> usize {
        let mut registered = 0;
        for entry in &self.clusters {
            let kubeconfig = match fs::read_to_string(&entry.kubeconfig_path) {
                Ok(k) => k,
                Err(e) => {
                    error!(
                        "Skipping cluster '{}': cannot read {}: {}",
                        entry.name,
                        entry.kubeconfig_path.display(),
                        e
                    );
                    continue;
                }
            };

            let request = RegisterCluster {
                name: entry.name.clone(),
                description: entry.description.clone(),
                kubeconfig,
            };
            match service.register_cluster(principal, request).await {
                Ok(cluster) => {
                    info!("Cluster '{}' registered as {}", cluster.name, cluster.status);
                    registered += 1;
                }
                Err(e) => error!("Failed to register cluster '{}': {}", entry.name, e),
            }
        }
        registered
    }
}
