// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote cluster client creation from stored kubeconfigs

use crate::error::{MultikubeError, Result};
use crate::types::Cluster;
use crate::vault::CredentialVault;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Connect and read timeouts applied to a client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

/// Decrypt the kubeconfig stored on a cluster record.
///
/// A missing credential and a credential that fails to decrypt both come back
/// as [`MultikubeError::CredentialError`].
pub fn decrypt_kubeconfig(vault: &CredentialVault, cluster: &Cluster) -> Result<String> {
    match vault.decrypt_optional(cluster.kubeconfig_encrypted.as_deref()) {
        Ok(Some(kubeconfig)) => Ok(kubeconfig),
        Ok(None) => {
            warn!("Cluster {} has no stored kubeconfig", cluster.id);
            Err(MultikubeError::CredentialError)
        }
        Err(e) => {
            warn!("Failed to decrypt kubeconfig for cluster {}", cluster.id);
            Err(e)
        }
    }
}

/// Create a short-lived client for a registered cluster
#[instrument(skip(vault, cluster), fields(cluster = %cluster.name))]
pub async fn create_cluster_client(
    vault: &CredentialVault,
    cluster: &Cluster,
    timeouts: Option<Timeouts>,
) -> Result<Client> {
    let kubeconfig = decrypt_kubeconfig(vault, cluster)?;
    create_client_from_kubeconfig(&kubeconfig, timeouts).await
}

/// Create a Kubernetes client from a kubeconfig string
pub async fn create_client_from_kubeconfig(
    kubeconfig: &str,
    timeouts: Option<Timeouts>,
) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig).map_err(|e| {
        MultikubeError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
    })?;

    let mut client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                MultikubeError::KubeconfigError(format!("Failed to create config: {}", e))
            })?;

    if let Some(t) = timeouts {
        debug!(
            "Using connect timeout {:?} and read timeout {:?}",
            t.connect, t.read
        );
        client_config.connect_timeout = Some(t.connect);
        client_config.read_timeout = Some(t.read);
    }

    Client::try_from(client_config)
        .map_err(|e| MultikubeError::KubeconfigError(format!("Failed to create client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClusterStatus;
    use chrono::Utc;

    fn vault() -> CredentialVault {
        CredentialVault::new(b"0123456789abcdef", b"fedcba9876543210").unwrap()
    }

    fn make_cluster(kubeconfig_encrypted: Option<String>) -> Cluster {
        Cluster {
            id: 1,
            name: "eu-1".to_string(),
            description: None,
            kubeconfig_encrypted,
            provider_user_id: 1,
            status: ClusterStatus::PendingVerification,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_decrypt_kubeconfig() {
        let vault = vault();
        let cluster = make_cluster(Some(vault.encrypt("apiVersion: v1").unwrap()));
        assert_eq!(decrypt_kubeconfig(&vault, &cluster).unwrap(), "apiVersion: v1");
    }

    #[test]
    fn test_decrypt_kubeconfig_missing() {
        let err = decrypt_kubeconfig(&vault(), &make_cluster(None)).unwrap_err();
        assert!(matches!(err, MultikubeError::CredentialError));
    }

    #[test]
    fn test_decrypt_kubeconfig_garbage() {
        let cluster = make_cluster(Some("garbage".to_string()));
        let err = decrypt_kubeconfig(&vault(), &cluster).unwrap_err();
        assert!(matches!(err, MultikubeError::CredentialError));
    }

    #[tokio::test]
    async fn test_create_client_rejects_invalid_kubeconfig() {
        let Err(err) = create_client_from_kubeconfig("clusters: [", None).await else {
            panic!("an unparseable kubeconfig must not produce a client");
        };
        assert!(matches!(err, MultikubeError::KubeconfigError(_)));
    }
}
