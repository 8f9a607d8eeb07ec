// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The operations the service performs against registered clusters.

use crate::error::Result;
use crate::kubernetes::apply::{ApplyOutcome, ApplyRegistry};
use crate::kubernetes::client::{create_cluster_client, Timeouts};
use crate::kubernetes::manifests::Manifest;
use crate::kubernetes::namespaces::{create_namespace, probe_namespaces};
use crate::types::Cluster;
use crate::vault::CredentialVault;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

#[cfg(test)]
use mockall::automock;

/// Remote side of a registered cluster
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Create the namespace `name` in the cluster
    async fn create_namespace(&self, cluster: &Cluster, name: &str) -> Result<()>;

    /// Create-or-replace a single manifest inside `namespace`
    async fn apply(
        &self,
        cluster: &Cluster,
        namespace: &str,
        manifest: &Manifest,
    ) -> Result<ApplyOutcome>;

    /// One bounded read confirming reachability and authorization
    async fn probe(&self, cluster: &Cluster) -> Result<()>;
}

/// [`ClusterApi`] backed by a fresh `kube::Client` per call, built from the
/// cluster's decrypted kubeconfig.
pub struct KubeClusterApi {
    vault: Arc<CredentialVault>,
    registry: ApplyRegistry,
    probe_timeouts: Timeouts,
}

impl KubeClusterApi {
    pub fn new(vault: Arc<CredentialVault>, registry: ApplyRegistry, probe_timeouts: Timeouts) -> Self {
        Self {
            vault,
            registry,
            probe_timeouts,
        }
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn create_namespace(&self, cluster: &Cluster, name: &str) -> Result<()> {
        let client = create_cluster_client(&self.vault, cluster, None).await?;
        create_namespace(&client, name).await
    }

    #[instrument(skip(self, cluster, manifest), fields(cluster = %cluster.name, kind = %manifest.kind))]
    async fn apply(
        &self,
        cluster: &Cluster,
        namespace: &str,
        manifest: &Manifest,
    ) -> Result<ApplyOutcome> {
        self.registry.ensure_supported(manifest)?;
        let client = create_cluster_client(&self.vault, cluster, None).await?;
        self.registry.apply(&client, namespace, manifest).await
    }

    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    async fn probe(&self, cluster: &Cluster) -> Result<()> {
        let client = create_cluster_client(&self.vault, cluster, Some(self.probe_timeouts)).await?;
        probe_namespaces(&client).await
    }
}
