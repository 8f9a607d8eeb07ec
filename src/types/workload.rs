// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ResourceStatus;

/// A tenant-supplied resource applied into one of the tenant's namespaces
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    pub id: i64,
    pub namespace_id: i64,
    pub name: String,
    pub k8s_kind: String,
    pub k8s_name: String,
    pub manifest: String,
    pub status: ResourceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
    pub created_by_user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a workload record is first stored
#[derive(Clone, Debug)]
pub struct NewWorkload {
    pub namespace_id: i64,
    pub name: String,
    pub k8s_kind: String,
    pub k8s_name: String,
    pub manifest: String,
    pub status: ResourceStatus,
    pub status_details: Option<String>,
    pub created_by_user_id: i64,
}
