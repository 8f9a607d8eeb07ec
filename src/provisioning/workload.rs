// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tenant workloads: single manifests applied into an existing tenant namespace.

use crate::error::{MultikubeError, Result};
use crate::kubernetes::manifests::Manifest;
use crate::kubernetes::ClusterApi;
use crate::store::Store;
use crate::types::{Namespace, NewWorkload, Principal, ResourceStatus, Role, Workload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkload {
    /// Display name; the manifest's `metadata.name` when blank
    pub name: String,
    pub manifest: String,
}

pub struct WorkloadService {
    store: Arc<dyn Store>,
    api: Arc<dyn ClusterApi>,
}

impl WorkloadService {
    pub fn new(store: Arc<dyn Store>, api: Arc<dyn ClusterApi>) -> Self {
        Self { store, api }
    }

    /// Apply a manifest into one of the caller's namespaces and record the outcome.
    ///
    /// A remote failure is recorded on the returned workload as `ERROR`. Only
    /// rejected requests and an unsupported kind come back as errors, and
    /// nothing is stored for them.
    #[instrument(skip(self, principal, request))]
    pub async fn create_workload(
        &self,
        principal: &Principal,
        namespace_id: i64,
        request: CreateWorkload,
    ) -> Result<Workload> {
        let namespace = self.tenant_namespace(principal, namespace_id).await?;
        let manifest = Manifest::parse(&request.manifest)?;

        if self
            .store
            .workload_exists(namespace.id, &manifest.name, &manifest.kind)
            .await?
        {
            return Err(MultikubeError::ValidationError(format!(
                "a resource with name '{}' and kind '{}' already exists in this namespace",
                manifest.name, manifest.kind
            )));
        }

        let cluster = self
            .store
            .get_cluster(namespace.cluster_id)
            .await?
            .ok_or_else(|| {
                MultikubeError::IllegalState(format!(
                    "namespace '{}' refers to missing cluster {}",
                    namespace.name, namespace.cluster_id
                ))
            })?;

        info!(
            "Applying workload {}/{} in namespace '{}'",
            manifest.kind, manifest.name, namespace.name
        );
        let (status, status_details) = match self.api.apply(&cluster, &namespace.name, &manifest).await {
            Ok(_) => (ResourceStatus::Active, None),
            Err(e @ MultikubeError::UnsupportedKind(_)) => return Err(e),
            Err(e) => {
                error!(
                    "Failed to apply workload {}/{} in namespace '{}': {}",
                    manifest.kind, manifest.name, namespace.name, e
                );
                (ResourceStatus::Error, Some(e.to_string()))
            }
        };

        let name = match request.name.trim() {
            "" => manifest.name.clone(),
            n => n.to_string(),
        };
        self.store
            .insert_workload(NewWorkload {
                namespace_id: namespace.id,
                name,
                k8s_kind: manifest.kind,
                k8s_name: manifest.name,
                manifest: manifest.raw,
                status,
                status_details,
                created_by_user_id: principal.user_id,
            })
            .await
    }

    pub async fn list_workloads(&self, principal: &Principal, namespace_id: i64) -> Result<Vec<Workload>> {
        let namespace = self.tenant_namespace(principal, namespace_id).await?;
        self.store.list_workloads(namespace.id).await
    }

    /// Namespaces of other tenants look exactly like missing ones.
    async fn tenant_namespace(&self, principal: &Principal, namespace_id: i64) -> Result<Namespace> {
        principal.require_role(Role::Tenant)?;
        let tenant_id = principal.require_tenant_id()?;
        self.store
            .get_namespace(namespace_id)
            .await?
            .filter(|n| n.tenant_id == tenant_id)
            .ok_or_else(|| MultikubeError::NotFound(format!("namespace {}", namespace_id)))
    }
}
