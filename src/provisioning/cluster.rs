// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provider-side cluster lifecycle: registration, verification and allocation.

use crate::constants::SYSTEM_TENANT_NAME;
use crate::error::{MultikubeError, Result};
use crate::status::ClusterVerifier;
use crate::store::Store;
use crate::types::{Cluster, ClusterAllocation, ClusterStatus, NewCluster, Principal, Role};
use crate::vault::CredentialVault;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCluster {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plaintext kubeconfig; encrypted before it is stored
    #[serde(skip_serializing)]
    pub kubeconfig: String,
}

pub struct ClusterService {
    store: Arc<dyn Store>,
    vault: Arc<CredentialVault>,
    verifier: Arc<ClusterVerifier>,
}

impl ClusterService {
    pub fn new(
        store: Arc<dyn Store>,
        vault: Arc<CredentialVault>,
        verifier: Arc<ClusterVerifier>,
    ) -> Self {
        Self {
            store,
            vault,
            verifier,
        }
    }

    /// Store a new cluster and verify it once right away.
    #[instrument(skip(self, principal, request), fields(cluster = %request.name.trim()))]
    pub async fn register_cluster(
        &self,
        principal: &Principal,
        request: RegisterCluster,
    ) -> Result<Cluster> {
        principal.require_role(Role::Provider)?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(MultikubeError::ValidationError(
                "cluster name must not be empty".to_string(),
            ));
        }
        if request.kubeconfig.trim().is_empty() {
            return Err(MultikubeError::ValidationError(
                "kubeconfig must not be empty".to_string(),
            ));
        }
        if self.store.find_cluster_by_name(name).await?.is_some() {
            return Err(MultikubeError::ValidationError(format!(
                "a cluster named '{}' already exists",
                name
            )));
        }

        let cluster = self
            .store
            .insert_cluster(NewCluster {
                name: name.to_string(),
                description: request.description,
                kubeconfig_encrypted: Some(self.vault.encrypt(&request.kubeconfig)?),
                provider_user_id: principal.user_id,
                status: ClusterStatus::PendingVerification,
            })
            .await?;
        info!("Registered cluster '{}' with id {}", cluster.name, cluster.id);

        self.verifier.verify(cluster).await
    }

    pub async fn verify_cluster(&self, principal: &Principal, cluster_id: i64) -> Result<Cluster> {
        let cluster = self.owned_cluster(principal, cluster_id).await?;
        self.verifier.verify(cluster).await
    }

    #[instrument(skip(self, principal))]
    pub async fn allocate_cluster(
        &self,
        principal: &Principal,
        cluster_id: i64,
        tenant_id: i64,
    ) -> Result<ClusterAllocation> {
        let cluster = self.owned_cluster(principal, cluster_id).await?;
        if !cluster.is_active() {
            return Err(MultikubeError::ValidationError(format!(
                "cluster '{}' is {} and can only be allocated when ACTIVE",
                cluster.name, cluster.status
            )));
        }
        if self.store.find_allocation(cluster_id).await?.is_some() {
            return Err(MultikubeError::Conflict(format!(
                "cluster '{}' is already allocated",
                cluster.name
            )));
        }

        let tenant = self
            .store
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| MultikubeError::NotFound(format!("tenant {}", tenant_id)))?;
        if tenant.name.eq_ignore_ascii_case(SYSTEM_TENANT_NAME) {
            return Err(MultikubeError::ValidationError(format!(
                "clusters cannot be allocated to the {} tenant",
                SYSTEM_TENANT_NAME
            )));
        }

        let allocation = self.store.insert_allocation(cluster_id, tenant_id).await?;
        info!("Allocated cluster '{}' to tenant '{}'", cluster.name, tenant.name);
        Ok(allocation)
    }

    #[instrument(skip(self, principal))]
    pub async fn deallocate_cluster(&self, principal: &Principal, cluster_id: i64) -> Result<()> {
        let cluster = self.owned_cluster(principal, cluster_id).await?;
        if self.store.find_allocation(cluster_id).await?.is_none() {
            return Err(MultikubeError::NotFound(format!(
                "allocation for cluster {}",
                cluster_id
            )));
        }
        if self.store.cluster_has_namespaces(cluster_id).await? {
            return Err(MultikubeError::IllegalState(format!(
                "cluster '{}' still has namespaces",
                cluster.name
            )));
        }

        self.store.delete_allocation(cluster_id).await?;
        info!("Deallocated cluster '{}'", cluster.name);
        Ok(())
    }

    /// Clusters of other providers look exactly like missing ones.
    async fn owned_cluster(&self, principal: &Principal, cluster_id: i64) -> Result<Cluster> {
        principal.require_role(Role::Provider)?;
        self.store
            .get_cluster(cluster_id)
            .await?
            .filter(|c| c.provider_user_id == principal.user_id)
            .ok_or_else(|| MultikubeError::NotFound(format!("cluster {}", cluster_id)))
    }
}
