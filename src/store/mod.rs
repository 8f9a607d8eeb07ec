// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Persistence of service records.
//!
//! Every save is a full overwrite of the stored record. Uniqueness violations
//! surface as [`crate::error::MultikubeError::Conflict`].

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{
    Cluster, ClusterAllocation, Namespace, NewCluster, NewNamespace, NewWorkload, Tenant, Workload,
};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_clusters(&self) -> Result<Vec<Cluster>>;
    async fn get_cluster(&self, id: i64) -> Result<Option<Cluster>>;
    async fn find_cluster_by_name(&self, name: &str) -> Result<Option<Cluster>>;
    /// Insert a new cluster; the name must be unique
    async fn insert_cluster(&self, cluster: NewCluster) -> Result<Cluster>;
    /// Overwrite an existing cluster record
    async fn save_cluster(&self, cluster: &Cluster) -> Result<Cluster>;

    async fn get_tenant(&self, id: i64) -> Result<Option<Tenant>>;
    async fn insert_tenant(&self, name: &str) -> Result<Tenant>;

    async fn find_allocation(&self, cluster_id: i64) -> Result<Option<ClusterAllocation>>;
    async fn is_allocated_to(&self, cluster_id: i64, tenant_id: i64) -> Result<bool>;
    /// Allocate a cluster; a cluster holds at most one allocation
    async fn insert_allocation(&self, cluster_id: i64, tenant_id: i64) -> Result<ClusterAllocation>;
    async fn delete_allocation(&self, cluster_id: i64) -> Result<()>;

    async fn namespace_exists(&self, name: &str, cluster_id: i64) -> Result<bool>;
    async fn cluster_has_namespaces(&self, cluster_id: i64) -> Result<bool>;
    async fn get_namespace(&self, id: i64) -> Result<Option<Namespace>>;
    /// Insert a namespace without configurations; (name, cluster) must be unique
    async fn insert_namespace(&self, namespace: NewNamespace) -> Result<Namespace>;
    /// Overwrite a namespace together with its configuration rows, assigning
    /// ids to rows that have none yet
    async fn save_namespace(&self, namespace: &Namespace) -> Result<Namespace>;

    async fn workload_exists(&self, namespace_id: i64, k8s_name: &str, k8s_kind: &str) -> Result<bool>;
    async fn list_workloads(&self, namespace_id: i64) -> Result<Vec<Workload>>;
    /// Insert a workload; (namespace, k8s name, k8s kind) must be unique
    async fn insert_workload(&self, workload: NewWorkload) -> Result<Workload>;
}
