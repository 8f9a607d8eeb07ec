// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace creation and the namespace-list connectivity probe

use crate::constants::{probe, MANAGER_NAME};
use crate::error::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ListParams, ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Create a namespace in the cluster.
///
/// An already existing namespace is an error: a tenant never takes over a
/// namespace it did not create.
#[instrument(skip(client))]
pub async fn create_namespace(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    info!("Creating namespace {}", namespace);
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([(
                "app.kubernetes.io/managed-by".to_string(),
                MANAGER_NAME.to_string(),
            )])),
            ..Default::default()
        },
        ..Default::default()
    };
    namespaces.create(&PostParams::default(), &ns).await?;
    info!("Namespace {} created successfully", namespace);
    Ok(())
}

/// Cheap, bounded read proving the cluster is reachable and the credential is
/// authorized: list at most one namespace with a server-side timeout.
#[instrument(skip(client))]
pub async fn probe_namespaces(client: &Client) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let lp = ListParams::default()
        .limit(1)
        .timeout(probe::SERVER_TIMEOUT_SECS);

    let list = namespaces.list(&lp).await?;
    debug!("Probe listed {} namespace(s)", list.items.len());
    Ok(())
}
