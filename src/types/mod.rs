// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Records kept by the service about clusters, tenants and their namespaces.

pub mod cluster;
pub mod namespace;
pub mod tenant;
pub mod workload;

pub use cluster::{Cluster, ClusterStatus, NewCluster};
pub use namespace::{
    Namespace, NamespaceConfiguration, NamespaceStatus, NewNamespace, ResourceStatus, SyncStatus,
};
pub use tenant::{ClusterAllocation, Principal, Role, Tenant};
pub use workload::{NewWorkload, Workload};
