// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provider and tenant operations that change what exists on remote clusters.

pub mod cluster;
pub mod namespace;
pub mod workload;

pub use cluster::{ClusterService, RegisterCluster};
pub use namespace::{validate_namespace_name, CreateNamespace, NamespaceProvisioner};
pub use workload::{CreateWorkload, WorkloadService};
