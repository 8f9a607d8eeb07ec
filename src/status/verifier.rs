// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Connectivity verification of a single registered cluster.

use crate::error::Result;
use crate::kubernetes::client::decrypt_kubeconfig;
use crate::kubernetes::ClusterApi;
use crate::store::Store;
use crate::types::{Cluster, ClusterStatus};
use crate::vault::CredentialVault;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Probes a cluster and records the resulting status.
///
/// * credential missing or undecryptable: `ERROR`
/// * probe succeeds: `ACTIVE`
/// * probe fails for any reason: `UNREACHABLE`
///
/// The new status is saved exactly once per call, whichever path was taken.
/// Remote error text only ever reaches the log.
pub struct ClusterVerifier {
    store: Arc<dyn Store>,
    api: Arc<dyn ClusterApi>,
    vault: Arc<CredentialVault>,
}

impl ClusterVerifier {
    pub fn new(store: Arc<dyn Store>, api: Arc<dyn ClusterApi>, vault: Arc<CredentialVault>) -> Self {
        Self { store, api, vault }
    }

    #[instrument(skip(self, cluster), fields(cluster = %cluster.name))]
    pub async fn verify(&self, mut cluster: Cluster) -> Result<Cluster> {
        let previous = cluster.status;
        cluster.status = self.probe_status(&cluster).await;

        if previous != cluster.status {
            info!(
                "Cluster {} changed status from {} to {}",
                cluster.id, previous, cluster.status
            );
        }

        self.store.save_cluster(&cluster).await
    }

    async fn probe_status(&self, cluster: &Cluster) -> ClusterStatus {
        if decrypt_kubeconfig(&self.vault, cluster).is_err() {
            warn!("Cannot verify cluster {}: stored credential is unusable", cluster.id);
            return ClusterStatus::Error;
        }

        match self.api.probe(cluster).await {
            Ok(()) => {
                info!("Successfully verified connectivity for cluster {}", cluster.id);
                ClusterStatus::Active
            }
            Err(e) => {
                warn!("Failed to verify connectivity for cluster {}: {}", cluster.id, e);
                ClusterStatus::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MultikubeError;
    use crate::kubernetes::remote::MockClusterApi;
    use crate::store::MockStore;
    use chrono::Utc;

    fn vault() -> Arc<CredentialVault> {
        Arc::new(CredentialVault::new(b"0123456789abcdef", b"fedcba9876543210").unwrap())
    }

    fn make_cluster(vault: &CredentialVault, status: ClusterStatus) -> Cluster {
        Cluster {
            id: 3,
            name: "eu-1".to_string(),
            description: None,
            kubeconfig_encrypted: Some(vault.encrypt("apiVersion: v1\nkind: Config\n").unwrap()),
            provider_user_id: 1,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn store_expecting(status: ClusterStatus) -> MockStore {
        let mut store = MockStore::new();
        store
            .expect_save_cluster()
            .withf(move |c| c.status == status)
            .times(1)
            .returning(|c| Ok(c.clone()));
        store
    }

    #[tokio::test]
    async fn test_reachable_cluster_becomes_active() {
        let vault = vault();
        let mut api = MockClusterApi::new();
        api.expect_probe().times(1).returning(|_| Ok(()));

        let verifier = ClusterVerifier::new(
            Arc::new(store_expecting(ClusterStatus::Active)),
            Arc::new(api),
            vault.clone(),
        );
        let cluster = verifier
            .verify(make_cluster(&vault, ClusterStatus::PendingVerification))
            .await
            .unwrap();

        assert_eq!(cluster.status, ClusterStatus::Active);
    }

    #[tokio::test]
    async fn test_unreachable_cluster() {
        let vault = vault();
        let mut api = MockClusterApi::new();
        api.expect_probe()
            .times(1)
            .returning(|_| Err(MultikubeError::KubeconfigError("connection refused".to_string())));

        let verifier = ClusterVerifier::new(
            Arc::new(store_expecting(ClusterStatus::Unreachable)),
            Arc::new(api),
            vault.clone(),
        );
        let cluster = verifier
            .verify(make_cluster(&vault, ClusterStatus::Active))
            .await
            .unwrap();

        assert_eq!(cluster.status, ClusterStatus::Unreachable);
    }

    #[tokio::test]
    async fn test_unreachable_cluster_recovers() {
        let vault = vault();
        let mut api = MockClusterApi::new();
        api.expect_probe().times(1).returning(|_| Ok(()));

        let verifier = ClusterVerifier::new(
            Arc::new(store_expecting(ClusterStatus::Active)),
            Arc::new(api),
            vault.clone(),
        );
        let cluster = verifier
            .verify(make_cluster(&vault, ClusterStatus::Unreachable))
            .await
            .unwrap();

        assert_eq!(cluster.status, ClusterStatus::Active);
    }

    #[tokio::test]
    async fn test_undecryptable_credential_is_error_without_probe() {
        let vault = vault();
        let mut api = MockClusterApi::new();
        api.expect_probe().times(0);

        let mut cluster = make_cluster(&vault, ClusterStatus::Active);
        let foreign = CredentialVault::new(b"ffffffffffffffffffffffff", b"fedcba9876543210").unwrap();
        cluster.kubeconfig_encrypted = Some(foreign.encrypt("apiVersion: v1\nkind: Config\n").unwrap());

        let verifier = ClusterVerifier::new(
            Arc::new(store_expecting(ClusterStatus::Error)),
            Arc::new(api),
            vault,
        );
        let cluster = verifier.verify(cluster).await.unwrap();

        assert_eq!(cluster.status, ClusterStatus::Error);
    }

    #[tokio::test]
    async fn test_missing_credential_is_error() {
        let vault = vault();
        let mut api = MockClusterApi::new();
        api.expect_probe().times(0);

        let mut cluster = make_cluster(&vault, ClusterStatus::PendingVerification);
        cluster.kubeconfig_encrypted = None;

        let verifier = ClusterVerifier::new(
            Arc::new(store_expecting(ClusterStatus::Error)),
            Arc::new(api),
            vault,
        );
        assert_eq!(
            verifier.verify(cluster).await.unwrap().status,
            ClusterStatus::Error
        );
    }

    #[tokio::test]
    async fn test_save_failure_is_returned() {
        let vault = vault();
        let mut api = MockClusterApi::new();
        api.expect_probe().returning(|_| Ok(()));
        let mut store = MockStore::new();
        store
            .expect_save_cluster()
            .times(1)
            .returning(|c| Err(MultikubeError::NotFound(format!("cluster {}", c.id))));

        let verifier = ClusterVerifier::new(Arc::new(store), Arc::new(api), vault.clone());
        let err = verifier
            .verify(make_cluster(&vault, ClusterStatus::Active))
            .await
            .unwrap_err();

        assert!(matches!(err, MultikubeError::NotFound(_)));
    }
}
