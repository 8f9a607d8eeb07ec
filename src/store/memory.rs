// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-process [`Store`] keeping everything in maps behind a single lock.

use crate::error::{MultikubeError, Result};
use crate::store::Store;
use crate::types::{
    Cluster, ClusterAllocation, Namespace, NewCluster, NewNamespace, NewWorkload, Tenant, Workload,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct State {
    next_id: i64,
    clusters: BTreeMap<i64, Cluster>,
    tenants: BTreeMap<i64, Tenant>,
    allocations: BTreeMap<i64, ClusterAllocation>,
    namespaces: BTreeMap<i64, Namespace>,
    workloads: BTreeMap<i64, Workload>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn workload_taken(&self, namespace_id: i64, k8s_name: &str, k8s_kind: &str) -> bool {
        self.workloads.values().any(|w| {
            w.namespace_id == namespace_id && w.k8s_name == k8s_name && w.k8s_kind == k8s_kind
        })
    }

    fn namespace_name_taken(&self, name: &str, cluster_id: i64, except_id: i64) -> bool {
        self.namespaces
            .values()
            .any(|n| n.id != except_id && n.cluster_id == cluster_id && n.name == name)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tenant under a fixed id
    #[cfg(test)]
    pub(crate) async fn put_tenant(&self, tenant: Tenant) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(tenant.id);
        state.tenants.insert(tenant.id, tenant);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        Ok(self.state.read().await.clusters.values().cloned().collect())
    }

    async fn get_cluster(&self, id: i64) -> Result<Option<Cluster>> {
        Ok(self.state.read().await.clusters.get(&id).cloned())
    }

    async fn find_cluster_by_name(&self, name: &str) -> Result<Option<Cluster>> {
        Ok(self
            .state
            .read()
            .await
            .clusters
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn insert_cluster(&self, cluster: NewCluster) -> Result<Cluster> {
        let mut state = self.state.write().await;
        if state.clusters.values().any(|c| c.name == cluster.name) {
            return Err(MultikubeError::Conflict(format!(
                "a cluster named '{}' already exists",
                cluster.name
            )));
        }

        let now = Utc::now();
        let stored = Cluster {
            id: state.next_id(),
            name: cluster.name,
            description: cluster.description,
            kubeconfig_encrypted: cluster.kubeconfig_encrypted,
            provider_user_id: cluster.provider_user_id,
            status: cluster.status,
            created_at: now,
            updated_at: now,
        };
        state.clusters.insert(stored.id, stored.clone());
        debug!("Inserted cluster {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    async fn save_cluster(&self, cluster: &Cluster) -> Result<Cluster> {
        let mut state = self.state.write().await;
        if !state.clusters.contains_key(&cluster.id) {
            return Err(MultikubeError::NotFound(format!("cluster {}", cluster.id)));
        }
        if state
            .clusters
            .values()
            .any(|c| c.id != cluster.id && c.name == cluster.name)
        {
            return Err(MultikubeError::Conflict(format!(
                "a cluster named '{}' already exists",
                cluster.name
            )));
        }

        let mut stored = cluster.clone();
        stored.updated_at = Utc::now();
        state.clusters.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_tenant(&self, id: i64) -> Result<Option<Tenant>> {
        Ok(self.state.read().await.tenants.get(&id).cloned())
    }

    async fn insert_tenant(&self, name: &str) -> Result<Tenant> {
        let mut state = self.state.write().await;
        if state.tenants.values().any(|t| t.name == name) {
            return Err(MultikubeError::Conflict(format!(
                "a tenant named '{}' already exists",
                name
            )));
        }
        let tenant = Tenant {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn find_allocation(&self, cluster_id: i64) -> Result<Option<ClusterAllocation>> {
        Ok(self.state.read().await.allocations.get(&cluster_id).cloned())
    }

    async fn is_allocated_to(&self, cluster_id: i64, tenant_id: i64) -> Result<bool> {
        Ok(self
            .state
            .read()
            .await
            .allocations
            .get(&cluster_id)
            .is_some_and(|a| a.tenant_id == tenant_id))
    }

    async fn insert_allocation(&self, cluster_id: i64, tenant_id: i64) -> Result<ClusterAllocation> {
        let mut state = self.state.write().await;
        if state.allocations.contains_key(&cluster_id) {
            return Err(MultikubeError::Conflict(format!(
                "cluster {} is already allocated",
                cluster_id
            )));
        }
        let allocation = ClusterAllocation {
            id: state.next_id(),
            cluster_id,
            tenant_id,
            created_at: Utc::now(),
        };
        state.allocations.insert(cluster_id, allocation.clone());
        Ok(allocation)
    }

    async fn delete_allocation(&self, cluster_id: i64) -> Result<()> {
        self.state
            .write()
            .await
            .allocations
            .remove(&cluster_id)
            .map(|_| ())
            .ok_or_else(|| MultikubeError::NotFound(format!("allocation for cluster {}", cluster_id)))
    }

    async fn namespace_exists(&self, name: &str, cluster_id: i64) -> Result<bool> {
        Ok(self
            .state
            .read()
            .await
            .namespace_name_taken(name, cluster_id, 0))
    }

    async fn cluster_has_namespaces(&self, cluster_id: i64) -> Result<bool> {
        Ok(self
            .state
            .read()
            .await
            .namespaces
            .values()
            .any(|n| n.cluster_id == cluster_id))
    }

    async fn get_namespace(&self, id: i64) -> Result<Option<Namespace>> {
        Ok(self.state.read().await.namespaces.get(&id).cloned())
    }

    async fn insert_namespace(&self, namespace: NewNamespace) -> Result<Namespace> {
        let mut state = self.state.write().await;
        if state.namespace_name_taken(&namespace.name, namespace.cluster_id, 0) {
            return Err(MultikubeError::Conflict(format!(
                "namespace '{}' already exists on cluster {}",
                namespace.name, namespace.cluster_id
            )));
        }

        let now = Utc::now();
        let stored = Namespace {
            id: state.next_id(),
            name: namespace.name,
            description: namespace.description,
            tenant_id: namespace.tenant_id,
            cluster_id: namespace.cluster_id,
            status: namespace.status,
            status_details: None,
            configurations: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.namespaces.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save_namespace(&self, namespace: &Namespace) -> Result<Namespace> {
        let mut state = self.state.write().await;
        if !state.namespaces.contains_key(&namespace.id) {
            return Err(MultikubeError::NotFound(format!("namespace {}", namespace.id)));
        }
        if state.namespace_name_taken(&namespace.name, namespace.cluster_id, namespace.id) {
            return Err(MultikubeError::Conflict(format!(
                "namespace '{}' already exists on cluster {}",
                namespace.name, namespace.cluster_id
            )));
        }

        let mut seen = HashSet::new();
        for config in &namespace.configurations {
            if !seen.insert((config.k8s_name.as_str(), config.k8s_kind.as_str())) {
                return Err(MultikubeError::Conflict(format!(
                    "configuration {}/{} recorded twice for namespace '{}'",
                    config.k8s_kind, config.k8s_name, namespace.name
                )));
            }
        }

        let now = Utc::now();
        let mut stored = namespace.clone();
        stored.updated_at = now;
        for config in stored.configurations.iter_mut() {
            if config.id == 0 {
                config.id = state.next_id();
            }
            config.namespace_id = stored.id;
            config.updated_at = now;
        }
        state.namespaces.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn workload_exists(&self, namespace_id: i64, k8s_name: &str, k8s_kind: &str) -> Result<bool> {
        Ok(self
            .state
            .read()
            .await
            .workload_taken(namespace_id, k8s_name, k8s_kind))
    }

    async fn list_workloads(&self, namespace_id: i64) -> Result<Vec<Workload>> {
        Ok(self
            .state
            .read()
            .await
            .workloads
            .values()
            .filter(|w| w.namespace_id == namespace_id)
            .cloned()
            .collect())
    }

    async fn insert_workload(&self, workload: NewWorkload) -> Result<Workload> {
        let mut state = self.state.write().await;
        if state.workload_taken(workload.namespace_id, &workload.k8s_name, &workload.k8s_kind) {
            return Err(MultikubeError::Conflict(format!(
                "workload {}/{} already exists in namespace {}",
                workload.k8s_kind, workload.k8s_name, workload.namespace_id
            )));
        }

        let now = Utc::now();
        let stored = Workload {
            id: state.next_id(),
            namespace_id: workload.namespace_id,
            name: workload.name,
            k8s_kind: workload.k8s_kind,
            k8s_name: workload.k8s_name,
            manifest: workload.manifest,
            status: workload.status,
            status_details: workload.status_details,
            created_by_user_id: workload.created_by_user_id,
            created_at: now,
            updated_at: now,
        };
        debug!("Stored workload {} in namespace {}", stored.id, stored.namespace_id);
        state.workloads.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
