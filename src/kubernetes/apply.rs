// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-then-replace apply of single manifests, dispatched by kind.
//!
//! The API server has no upsert for these resources. Each apply first tries a
//! create; a 409 Conflict means the object already exists and the same manifest
//! is sent again as a full replace. Every other error is returned unchanged.

use crate::error::{MultikubeError, Result};
use crate::kubernetes::manifests::Manifest;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{LimitRange, ResourceQuota};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::{Role, RoleBinding};
use k8s_openapi::NamespaceResourceScope;
use kube::{api::PostParams, Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// What an apply ended up doing on the remote side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Replaced,
}

/// Applies manifests of one kind
#[async_trait]
pub trait ApplyHandler: Send + Sync {
    async fn apply(&self, client: &Client, namespace: &str, manifest: &Manifest)
        -> Result<ApplyOutcome>;
}

/// Handler for a namespaced `k8s-openapi` type
pub struct TypedApply<K>(PhantomData<fn() -> K>);

impl<K> TypedApply<K> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for TypedApply<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K> ApplyHandler for TypedApply<K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    async fn apply(
        &self,
        client: &Client,
        namespace: &str,
        manifest: &Manifest,
    ) -> Result<ApplyOutcome> {
        let mut obj: K = serde_yaml::from_str(&manifest.raw).map_err(|e| {
            MultikubeError::ManifestError(format!(
                "{} {} is not a valid {}: {}",
                manifest.kind, manifest.name, manifest.kind, e
            ))
        })?;
        // Tenants only ever write into the namespace being provisioned.
        obj.meta_mut().namespace = Some(namespace.to_string());

        let api: Api<K> = Api::namespaced(client.clone(), namespace);
        create_or_replace(&api, &manifest.name, &obj).await
    }
}

/// Create `obj`, falling back to a replace when it already exists.
pub async fn create_or_replace<K>(api: &Api<K>, name: &str, obj: &K) -> Result<ApplyOutcome>
where
    K: Resource + Clone + Debug + Serialize + DeserializeOwned,
{
    match api.create(&PostParams::default(), obj).await {
        Ok(_) => Ok(ApplyOutcome::Created),
        Err(kube::Error::Api(err)) if err.code == 409 => {
            debug!("{} already exists. Replacing.", name);
            api.replace(name, &PostParams::default(), obj).await?;
            Ok(ApplyOutcome::Replaced)
        }
        Err(e) => Err(e.into()),
    }
}

/// Apply handlers keyed by manifest kind
#[derive(Clone)]
pub struct ApplyRegistry {
    handlers: HashMap<String, Arc<dyn ApplyHandler>>,
}

impl ApplyRegistry {
    /// A registry that supports no kind at all
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Add or replace the handler for `kind`
    pub fn register(mut self, kind: &str, handler: impl ApplyHandler + 'static) -> Self {
        self.handlers.insert(kind.to_string(), Arc::new(handler));
        self
    }

    pub fn supports(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Supported kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Fails with [`MultikubeError::UnsupportedKind`] before any request is made
    /// when no handler is registered for the manifest's kind.
    pub fn ensure_supported(&self, manifest: &Manifest) -> Result<()> {
        if self.supports(&manifest.kind) {
            Ok(())
        } else {
            Err(MultikubeError::UnsupportedKind(manifest.kind.clone()))
        }
    }

    #[instrument(skip(self, client, manifest), fields(kind = %manifest.kind, name = %manifest.name))]
    pub async fn apply(
        &self,
        client: &Client,
        namespace: &str,
        manifest: &Manifest,
    ) -> Result<ApplyOutcome> {
        let handler = self
            .handlers
            .get(&manifest.kind)
            .ok_or_else(|| MultikubeError::UnsupportedKind(manifest.kind.clone()))?;

        let outcome = handler.apply(client, namespace, manifest).await?;
        info!(
            "Applied {} {} in namespace {}: {:?}",
            manifest.kind, manifest.name, namespace, outcome
        );
        Ok(outcome)
    }
}

impl Default for ApplyRegistry {
    /// The baseline and quota kinds plus Deployment workloads
    fn default() -> Self {
        Self::empty()
            .register("Role", TypedApply::<Role>::new())
            .register("RoleBinding", TypedApply::<RoleBinding>::new())
            .register("NetworkPolicy", TypedApply::<NetworkPolicy>::new())
            .register("ResourceQuota", TypedApply::<ResourceQuota>::new())
            .register("LimitRange", TypedApply::<LimitRange>::new())
            .register("Deployment", TypedApply::<Deployment>::new())
    }
}
