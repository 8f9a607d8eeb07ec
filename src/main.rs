// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use multikube::config::Config;
use multikube::inventory::Inventory;
use multikube::kubernetes::{ApplyRegistry, KubeClusterApi, Timeouts};
use multikube::provisioning::ClusterService;
use multikube::status::{ClusterStatusScheduler, ClusterVerifier};
use multikube::store::{MemoryStore, Store};
use multikube::types::Principal;
use multikube::vault::CredentialVault;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting multikube");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: status_check_interval={:?}",
        config.status_check_interval
    );

    let vault = Arc::new(CredentialVault::new(
        config.encryption_key.as_bytes(),
        config.encryption_iv.as_bytes(),
    )?);
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let api = Arc::new(KubeClusterApi::new(
        vault.clone(),
        ApplyRegistry::default(),
        Timeouts {
            connect: config.probe_connect_timeout,
            read: config.probe_read_timeout,
        },
    ));
    let verifier = Arc::new(ClusterVerifier::new(store.clone(), api, vault.clone()));

    if let Some(path) = &config.clusters_file {
        let inventory = Inventory::load(path)?;
        let service = ClusterService::new(store.clone(), vault, verifier.clone());
        let registered = inventory
            .register_all(&service, &Principal::provider(1, "bootstrap"))
            .await;
        info!(
            "Registered {} of {} clusters from {}",
            registered,
            inventory.clusters.len(),
            path.display()
        );
    }

    let scheduler = ClusterStatusScheduler::new(store, verifier, config.status_check_interval);

    tokio::select! {
        result = scheduler.run() => {
            warn!("Status worker stopped unexpectedly");
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping");
        }
    }

    Ok(())
}
