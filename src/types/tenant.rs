// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MultikubeError, Result};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i64,
    pub name: String,
}

/// Exclusive assignment of one cluster to one tenant
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAllocation {
    pub id: i64,
    pub cluster_id: i64,
    pub tenant_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Registers and allocates clusters
    Provider,
    /// Provisions namespaces on clusters allocated to its tenant
    Tenant,
}

/// The authenticated caller of an operation
#[derive(Clone, Debug, PartialEq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub tenant_id: Option<i64>,
    pub role: Role,
}

impl Principal {
    pub fn provider(user_id: i64, username: &str) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            tenant_id: None,
            role: Role::Provider,
        }
    }

    pub fn tenant(user_id: i64, username: &str, tenant_id: i64) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            tenant_id: Some(tenant_id),
            role: Role::Tenant,
        }
    }

    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(MultikubeError::AccessDenied(format!(
                "user '{}' does not have the {:?} role",
                self.username, role
            )))
        }
    }

    /// The tenant of a tenant operator. Missing means the session layer handed
    /// over an inconsistent principal, which the caller cannot fix.
    pub fn require_tenant_id(&self) -> Result<i64> {
        self.tenant_id.ok_or_else(|| {
            MultikubeError::IllegalState(format!(
                "authenticated user '{}' has no tenant",
                self.username
            ))
        })
    }
}
