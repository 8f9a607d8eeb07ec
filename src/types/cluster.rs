// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterStatus {
    /// Initial status upon registration
    PendingVerification,
    /// Verified and reachable
    Active,
    /// Verification failed or connectivity was lost
    Unreachable,
    Degraded,
    /// Manually set to inactive by the provider
    Inactive,
    Deleting,
    /// The stored credential is missing or cannot be decrypted
    Error,
}

impl ClusterStatus {
    /// Whether the periodic sweep should re-verify a cluster in this status.
    /// Degraded, inactive and deleting clusters wait for a human.
    pub fn is_verifiable(&self) -> bool {
        matches!(
            self,
            ClusterStatus::Active
                | ClusterStatus::Unreachable
                | ClusterStatus::PendingVerification
                | ClusterStatus::Error
        )
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusterStatus::PendingVerification => "PENDING_VERIFICATION",
            ClusterStatus::Active => "ACTIVE",
            ClusterStatus::Unreachable => "UNREACHABLE",
            ClusterStatus::Degraded => "DEGRADED",
            ClusterStatus::Inactive => "INACTIVE",
            ClusterStatus::Deleting => "DELETING",
            ClusterStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// A registered remote Kubernetes cluster
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64 ciphertext of the kubeconfig; never serialized out
    #[serde(skip_serializing, default)]
    pub kubeconfig_encrypted: Option<String>,
    pub provider_user_id: i64,
    pub status: ClusterStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cluster {
    pub fn is_active(&self) -> bool {
        self.status == ClusterStatus::Active
    }
}

/// Fields supplied when a cluster is first stored
#[derive(Clone, Debug)]
pub struct NewCluster {
    pub name: String,
    pub description: Option<String>,
    pub kubeconfig_encrypted: Option<String>,
    pub provider_user_id: i64,
    pub status: ClusterStatus,
}
