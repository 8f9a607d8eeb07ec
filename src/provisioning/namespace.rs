// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tenant namespace provisioning.
//!
//! One attempt, no retries. The local record is written in `CREATING` before
//! anything happens remotely, then every manifest is attempted and recorded on
//! its own, and the final state is saved once at the end. Remote changes are
//! never rolled back; the stored configuration rows are the audit trail of
//! what was attempted and how each attempt went.

use crate::error::{MultikubeError, Result};
use crate::kubernetes::manifests::{self, Manifest};
use crate::kubernetes::ClusterApi;
use crate::store::Store;
use crate::types::{
    Cluster, Namespace, NamespaceConfiguration, NamespaceStatus, NewNamespace, Principal, Role,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

const MAX_NAMESPACE_NAME_LEN: usize = 63;

/// A tenant's request for a new namespace
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateNamespace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cluster_id: i64,
    /// Optional ResourceQuota manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_quota: Option<String>,
    /// Optional LimitRange manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_range: Option<String>,
}

pub struct NamespaceProvisioner {
    store: Arc<dyn Store>,
    api: Arc<dyn ClusterApi>,
}

impl NamespaceProvisioner {
    pub fn new(store: Arc<dyn Store>, api: Arc<dyn ClusterApi>) -> Self {
        Self { store, api }
    }

    /// Create a namespace for the principal's tenant.
    ///
    /// Returns an error only when the request is rejected before anything was
    /// recorded, or when the final save fails. Remote failures end up in the
    /// returned namespace as `FAILED_CREATION` with per-manifest details.
    #[instrument(skip(self, principal, request), fields(namespace = %request.name, cluster_id = request.cluster_id))]
    pub async fn create_namespace(
        &self,
        principal: &Principal,
        request: CreateNamespace,
    ) -> Result<Namespace> {
        let (cluster, tenant_id, manifests) = self.validate(principal, &request).await?;

        let mut namespace = self
            .store
            .insert_namespace(NewNamespace {
                name: request.name.clone(),
                description: request.description.clone(),
                tenant_id,
                cluster_id: cluster.id,
                status: NamespaceStatus::Creating,
            })
            .await?;

        info!("Creating namespace '{}' in cluster '{}'", namespace.name, cluster.name);
        if let Err(e) = self.api.create_namespace(&cluster, &namespace.name).await {
            error!(
                "Failed to create namespace '{}' in cluster '{}': {}",
                namespace.name, cluster.name, e
            );
            namespace.status = NamespaceStatus::FailedCreation;
            namespace.status_details = Some(format!("Failed to create namespace: {}", e));
            return self.store.save_namespace(&namespace).await;
        }

        for manifest in &manifests {
            let config = self.apply_and_record(&cluster, &namespace, manifest).await;
            namespace.configurations.push(config);
        }

        finalize(&mut namespace);
        match namespace.status {
            NamespaceStatus::Active => info!(
                "Successfully created and configured namespace '{}'",
                namespace.name
            ),
            _ => error!(
                "Namespace '{}' created with failures: {}",
                namespace.name,
                namespace.status_details.as_deref().unwrap_or_default()
            ),
        }

        self.store.save_namespace(&namespace).await
    }

    /// Every check that must pass before anything is recorded or sent.
    /// Returns the target cluster, the tenant id and the manifests to apply in order.
    async fn validate(
        &self,
        principal: &Principal,
        request: &CreateNamespace,
    ) -> Result<(Cluster, i64, Vec<Manifest>)> {
        principal.require_role(Role::Tenant)?;
        let tenant_id = principal.require_tenant_id()?;
        if self.store.get_tenant(tenant_id).await?.is_none() {
            return Err(MultikubeError::IllegalState(format!(
                "authenticated user's tenant {} not found",
                tenant_id
            )));
        }

        let cluster_id = request.cluster_id;
        if !self.store.is_allocated_to(cluster_id, tenant_id).await? {
            return Err(MultikubeError::AccessDenied(format!(
                "cluster {} is not allocated to your tenant",
                cluster_id
            )));
        }

        validate_namespace_name(&request.name)?;
        if self.store.namespace_exists(&request.name, cluster_id).await? {
            return Err(MultikubeError::ValidationError(format!(
                "a namespace named '{}' already exists in this cluster",
                request.name
            )));
        }

        let cluster = self
            .store
            .get_cluster(cluster_id)
            .await?
            .ok_or_else(|| MultikubeError::NotFound(format!("cluster {}", cluster_id)))?;

        let mut to_apply = manifests::baseline_manifests(&request.name, &principal.username)?;
        to_apply.extend(optional_manifest(request.resource_quota.as_deref(), "ResourceQuota")?);
        to_apply.extend(optional_manifest(request.limit_range.as_deref(), "LimitRange")?);

        Ok((cluster, tenant_id, to_apply))
    }

    async fn apply_and_record(
        &self,
        cluster: &Cluster,
        namespace: &Namespace,
        manifest: &Manifest,
    ) -> NamespaceConfiguration {
        debug!(
            "Applying {}/{} for namespace '{}'",
            manifest.kind, manifest.name, namespace.name
        );
        match self.api.apply(cluster, &namespace.name, manifest).await {
            Ok(_) => NamespaceConfiguration::applied(namespace.id, manifest),
            Err(e) => {
                error!(
                    "Failed to apply {}/{} in namespace '{}': {}",
                    manifest.kind, manifest.name, namespace.name, e
                );
                NamespaceConfiguration::failed(namespace.id, manifest, e.to_string())
            }
        }
    }
}

/// Derive the final status from the recorded configuration outcomes:
/// `ACTIVE` only if every configuration applied.
fn finalize(namespace: &mut Namespace) {
    let failed: Vec<String> = namespace
        .failed_configurations()
        .map(|c| format!("{}/{}", c.k8s_kind, c.k8s_name))
        .collect();

    if failed.is_empty() {
        namespace.status = NamespaceStatus::Active;
        namespace.status_details = None;
    } else {
        namespace.status = NamespaceStatus::FailedCreation;
        namespace.status_details = Some(format!(
            "Failed during resource application: {} of {} configurations failed: {}",
            failed.len(),
            namespace.configurations.len(),
            failed.join(", ")
        ));
    }
}

/// Parse an optional user manifest; blank text means "not supplied".
fn optional_manifest(raw: Option<&str>, expected_kind: &str) -> Result<Option<Manifest>> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };

    let manifest = Manifest::parse(raw)?;
    if manifest.kind != expected_kind {
        return Err(MultikubeError::ValidationError(format!(
            "expected a {} manifest, got {}",
            expected_kind, manifest.kind
        )));
    }
    Ok(Some(manifest))
}

/// Namespace names must be RFC 1123 DNS labels.
pub fn validate_namespace_name(name: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid = !name.is_empty()
        && name.len() <= MAX_NAMESPACE_NAME_LEN
        && valid_chars
        && !name.starts_with('-')
        && !name.ends_with('-');

    if valid {
        Ok(())
    } else {
        Err(MultikubeError::ValidationError(format!(
            "invalid namespace name '{}': must be a DNS-1123 label",
            name
        )))
    }
}
