// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, manifests, apply and namespace management.

pub mod apply;
pub mod client;
pub mod manifests;
pub mod namespaces;
pub mod remote;

pub use apply::{ApplyHandler, ApplyOutcome, ApplyRegistry, TypedApply};
pub use client::{create_cluster_client, Timeouts};
pub use manifests::Manifest;
pub use namespaces::{create_namespace, probe_namespaces};
pub use remote::{ClusterApi, KubeClusterApi};
