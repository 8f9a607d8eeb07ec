// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by [`crate::config::Config`]
pub mod env {
    pub const ENCRYPTION_KEY: &str = "MULTIKUBE_ENCRYPTION_KEY";
    pub const ENCRYPTION_IV: &str = "MULTIKUBE_ENCRYPTION_IV";
    pub const STATUS_CHECK_RATE_MS: &str = "MULTIKUBE_STATUS_CHECK_RATE_MS";
    pub const PROBE_CONNECT_TIMEOUT_SECS: &str = "MULTIKUBE_PROBE_CONNECT_TIMEOUT_SECS";
    pub const PROBE_READ_TIMEOUT_SECS: &str = "MULTIKUBE_PROBE_READ_TIMEOUT_SECS";
    pub const CLUSTERS_FILE: &str = "MULTIKUBE_CLUSTERS_FILE";
}

/// Cluster status sweep configuration
pub mod status {
    /// Default interval between two sweeps (5 minutes)
    pub const DEFAULT_CHECK_RATE_MS: u64 = 300_000;
}

/// Connectivity probe limits
pub mod probe {
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const READ_TIMEOUT_SECS: u64 = 10;
    /// Server-side timeout passed along with the probe list call
    pub const SERVER_TIMEOUT_SECS: u32 = 5;
}

/// Names of the baseline resources created in every tenant namespace
pub mod baseline {
    pub const NETWORK_POLICY_NAME: &str = "default-deny-ingress";
    pub const ADMIN_ROLE_NAME: &str = "namespace-admin-role";
    pub const ADMIN_BINDING_PREFIX: &str = "admin-binding-";
    /// Used when nothing of the username survives sanitizing
    pub const FALLBACK_BINDING_SUFFIX: &str = "user";
    /// Longest DNS-1123 subdomain, the limit for object names
    pub const MAX_OBJECT_NAME_LEN: usize = 253;
}

/// Tenant that clusters can never be allocated to
pub const SYSTEM_TENANT_NAME: &str = "System";

/// Value of the `app.kubernetes.io/managed-by` label on generated resources
pub const MANAGER_NAME: &str = "multikube";
