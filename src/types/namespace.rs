// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kubernetes::manifests::Manifest;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamespaceStatus {
    Requested,
    Creating,
    Active,
    Deleting,
    Deleted,
    FailedCreation,
    FailedDeletion,
    Unknown,
}

/// Outcome of applying one manifest
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Processing,
    Active,
    Error,
    Deleting,
}

/// Stored flag for the last apply; nothing compares it against the live cluster
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    #[default]
    Unknown,
    InSync,
    DriftDetected,
}

/// A tenant workspace inside an allocated cluster
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tenant_id: i64,
    pub cluster_id: i64,
    pub status: NamespaceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
    #[serde(default)]
    pub configurations: Vec<NamespaceConfiguration>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Namespace {
    pub fn failed_configurations(&self) -> impl Iterator<Item = &NamespaceConfiguration> {
        self.configurations
            .iter()
            .filter(|c| c.status == ResourceStatus::Error)
    }
}

/// Fields supplied when a namespace record is first stored
#[derive(Clone, Debug)]
pub struct NewNamespace {
    pub name: String,
    pub description: Option<String>,
    pub tenant_id: i64,
    pub cluster_id: i64,
    pub status: NamespaceStatus,
}

/// One manifest applied to a namespace, together with the outcome of that attempt.
///
/// `id` stays 0 until the parent namespace is saved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceConfiguration {
    pub id: i64,
    pub namespace_id: i64,
    pub name: String,
    pub k8s_kind: String,
    pub k8s_name: String,
    pub manifest: String,
    pub status: ResourceStatus,
    pub sync_status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NamespaceConfiguration {
    /// Record an apply attempt of `manifest` that succeeded.
    pub fn applied(namespace_id: i64, manifest: &Manifest) -> Self {
        Self::from_manifest(namespace_id, manifest, ResourceStatus::Active, None)
    }

    /// Record an apply attempt of `manifest` that failed with `details`.
    pub fn failed(namespace_id: i64, manifest: &Manifest, details: String) -> Self {
        Self::from_manifest(namespace_id, manifest, ResourceStatus::Error, Some(details))
    }

    fn from_manifest(
        namespace_id: i64,
        manifest: &Manifest,
        status: ResourceStatus,
        status_details: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            namespace_id,
            name: manifest.name.clone(),
            k8s_kind: manifest.kind.clone(),
            k8s_name: manifest.name.clone(),
            manifest: manifest.raw.clone(),
            status,
            // The flag is set on every recorded attempt; drift is never checked.
            sync_status: SyncStatus::InSync,
            status_details,
            created_at: now,
            updated_at: now,
        }
    }
}
