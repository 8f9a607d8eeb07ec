// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Baseline manifests for tenant namespaces and validation of user-supplied ones.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::baseline::{
    ADMIN_BINDING_PREFIX, ADMIN_ROLE_NAME, FALLBACK_BINDING_SUFFIX, MAX_OBJECT_NAME_LEN,
    NETWORK_POLICY_NAME,
};
use crate::constants::MANAGER_NAME;
use crate::error::{MultikubeError, Result};

/// A single resource document, reduced to what the service tracks about it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub kind: String,
    pub name: String,
    /// The document text exactly as it will be sent
    pub raw: String,
}

impl Manifest {
    /// Parse manifest text, requiring a top-level `kind` and a `metadata.name`.
    pub fn parse(raw: &str) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(raw)
            .map_err(|e| MultikubeError::ManifestError(format!("failed to parse YAML: {}", e)))?;

        let kind = doc
            .get("kind")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                MultikubeError::ManifestError("manifest must contain a 'kind' field".to_string())
            })?;

        let metadata = doc.get("metadata").filter(|m| m.is_object()).ok_or_else(|| {
            MultikubeError::ManifestError("manifest must contain a 'metadata' block".to_string())
        })?;

        let name = metadata
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                MultikubeError::ManifestError(
                    "manifest metadata must contain a 'name' field".to_string(),
                )
            })?;

        Ok(Self {
            kind: kind.to_string(),
            name: name.to_string(),
            raw: raw.to_string(),
        })
    }

    fn render(kind: &str, name: String, doc: &Value) -> Result<Self> {
        let raw = serde_yaml::to_string(doc)
            .map_err(|e| MultikubeError::ManifestError(format!("failed to render {}: {}", kind, e)))?;
        Ok(Self {
            kind: kind.to_string(),
            name,
            raw,
        })
    }
}

fn metadata(name: &str, namespace: &str) -> Value {
    json!({
        "name": name,
        "namespace": namespace,
        "labels": { "app.kubernetes.io/managed-by": MANAGER_NAME },
    })
}

/// NetworkPolicy selecting every pod in `namespace` with no ingress rules, so all
/// ingress is denied. Egress is left untouched.
pub fn default_network_policy(namespace: &str) -> Result<Manifest> {
    let doc = json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "NetworkPolicy",
        "metadata": metadata(NETWORK_POLICY_NAME, namespace),
        "spec": {
            "podSelector": {},
            "policyTypes": ["Ingress"],
        },
    });
    Manifest::render("NetworkPolicy", NETWORK_POLICY_NAME.to_string(), &doc)
}

/// Role granting every verb on every resource within `namespace`.
pub fn default_admin_role(namespace: &str) -> Result<Manifest> {
    let doc = json!({
        "apiVersion": "rbac.authorization.k8s.io/v1",
        "kind": "Role",
        "metadata": metadata(ADMIN_ROLE_NAME, namespace),
        "rules": [{
            "apiGroups": ["*"],
            "resources": ["*"],
            "verbs": ["*"],
        }],
    });
    Manifest::render("Role", ADMIN_ROLE_NAME.to_string(), &doc)
}

/// RoleBinding attaching the admin role to `username`.
pub fn admin_role_binding(namespace: &str, username: &str) -> Result<Manifest> {
    let name = admin_binding_name(username);
    let doc = json!({
        "apiVersion": "rbac.authorization.k8s.io/v1",
        "kind": "RoleBinding",
        "metadata": metadata(&name, namespace),
        "subjects": [{
            "kind": "User",
            "name": username,
            "apiGroup": "rbac.authorization.k8s.io",
        }],
        "roleRef": {
            "kind": "Role",
            "name": ADMIN_ROLE_NAME,
            "apiGroup": "rbac.authorization.k8s.io",
        },
    });
    Manifest::render("RoleBinding", name, &doc)
}

/// The baseline every new namespace receives, in the order it is applied.
pub fn baseline_manifests(namespace: &str, username: &str) -> Result<Vec<Manifest>> {
    Ok(vec![
        default_network_policy(namespace)?,
        default_admin_role(namespace)?,
        admin_role_binding(namespace, username)?,
    ])
}

/// Binding name for a user.
///
/// Lowercased, anything outside `[a-z0-9]` becomes `-`, and the result is
/// trimmed of dashes and capped so the whole name stays a DNS-1123 subdomain.
pub fn admin_binding_name(username: &str) -> String {
    let sanitized: String = username
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();

    // Only ASCII is left, so byte truncation is safe.
    let max = MAX_OBJECT_NAME_LEN - ADMIN_BINDING_PREFIX.len();
    let mut suffix = sanitized.trim_matches('-');
    if suffix.len() > max {
        suffix = suffix[..max].trim_end_matches('-');
    }
    if suffix.is_empty() {
        suffix = FALLBACK_BINDING_SUFFIX;
    }
    format!("{}{}", ADMIN_BINDING_PREFIX, suffix)
}
