// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Worker loop that keeps cluster statuses current.

use crate::status::verifier::ClusterVerifier;
use crate::store::Store;
use crate::types::Cluster;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

/// Counts from one sweep over all clusters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Re-verifies every cluster in a verifiable status on a fixed interval.
/// Clusters are checked one after the other; a failing cluster is logged and
/// the sweep moves on.
pub struct ClusterStatusScheduler {
    store: Arc<dyn Store>,
    verifier: Arc<ClusterVerifier>,
    interval: Duration,
}

impl ClusterStatusScheduler {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<ClusterVerifier>, interval: Duration) -> Self {
        Self {
            store,
            verifier,
            interval,
        }
    }

    /// Run forever; the first sweep starts immediately. A sweep that overruns
    /// the interval delays the next one instead of triggering a burst.
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Status worker started, sweeping every {:?}", self.interval);

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    #[instrument(skip(self))]
    pub async fn sweep(&self) -> SweepReport {
        info!("Starting cluster status sweep");
        let mut report = SweepReport::default();

        let clusters = match self.store.list_clusters().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load clusters for status sweep: {}", e);
                return report;
            }
        };

        if clusters.is_empty() {
            info!("No clusters found to check");
            return report;
        }

        for cluster in clusters {
            if !cluster.status.is_verifiable() {
                debug!(
                    "Skipping cluster {} with status {}",
                    cluster.id, cluster.status
                );
                report.skipped += 1;
                continue;
            }

            report.checked += 1;
            if !self.verify(cluster).await {
                report.failed += 1;
            }
        }

        info!(
            "Finished cluster status sweep: {} checked, {} skipped, {} failed",
            report.checked, report.skipped, report.failed
        );
        report
    }

    async fn verify(&self, cluster: Cluster) -> bool {
        let id = cluster.id;
        match self.verifier.verify(cluster).await {
            Ok(updated) => {
                info!("Status check complete for cluster {}: {}", id, updated.status);
                true
            }
            Err(e) => {
                error!("Unexpected error during status check for cluster {}: {}", id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MultikubeError;
    use crate::kubernetes::remote::MockClusterApi;
    use crate::store::{MemoryStore, MockStore};
    use crate::types::{ClusterStatus, NewCluster};
    use crate::vault::CredentialVault;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HOUR: Duration = Duration::from_secs(3600);

    fn vault() -> Arc<CredentialVault> {
        Arc::new(CredentialVault::new(b"0123456789abcdef", b"fedcba9876543210").unwrap())
    }

    async fn seed(store: &MemoryStore, vault: &CredentialVault, name: &str, status: ClusterStatus) -> i64 {
        store
            .insert_cluster(NewCluster {
                name: name.to_string(),
                description: None,
                kubeconfig_encrypted: Some(vault.encrypt("apiVersion: v1\n").unwrap()),
                provider_user_id: 1,
                status,
            })
            .await
            .unwrap()
            .id
    }

    fn scheduler(store: Arc<dyn Store>, api: MockClusterApi, vault: Arc<CredentialVault>) -> ClusterStatusScheduler {
        let verifier = Arc::new(ClusterVerifier::new(store.clone(), Arc::new(api), vault));
        ClusterStatusScheduler::new(store, verifier, HOUR)
    }

    #[tokio::test]
    async fn test_sweep_skips_manual_statuses() {
        let vault = vault();
        let store = Arc::new(MemoryStore::new());
        let all = [
            ("pending", ClusterStatus::PendingVerification),
            ("active", ClusterStatus::Active),
            ("unreachable", ClusterStatus::Unreachable),
            ("error", ClusterStatus::Error),
            ("degraded", ClusterStatus::Degraded),
            ("inactive", ClusterStatus::Inactive),
            ("deleting", ClusterStatus::Deleting),
        ];
        for (name, status) in all {
            seed(&store, &vault, name, status).await;
        }

        let mut api = MockClusterApi::new();
        api.expect_probe()
            .times(4)
            .withf(|c| c.status.is_verifiable())
            .returning(|_| Ok(()));

        let scheduler = scheduler(store.clone(), api, vault);
        let report = scheduler.sweep().await;

        assert_eq!(
            report,
            SweepReport {
                checked: 4,
                skipped: 3,
                failed: 0
            }
        );
        for cluster in store.list_clusters().await.unwrap() {
            match cluster.name.as_str() {
                "degraded" => assert_eq!(cluster.status, ClusterStatus::Degraded),
                "inactive" => assert_eq!(cluster.status, ClusterStatus::Inactive),
                "deleting" => assert_eq!(cluster.status, ClusterStatus::Deleting),
                _ => assert_eq!(cluster.status, ClusterStatus::Active),
            }
        }
    }

    #[tokio::test]
    async fn test_sweep_continues_past_unreachable_cluster() {
        let vault = vault();
        let store = Arc::new(MemoryStore::new());
        seed(&store, &vault, "bad", ClusterStatus::Active).await;
        seed(&store, &vault, "good", ClusterStatus::Active).await;

        let mut api = MockClusterApi::new();
        api.expect_probe().times(2).returning(|c| {
            if c.name == "bad" {
                Err(MultikubeError::KubeconfigError("timed out".to_string()))
            } else {
                Ok(())
            }
        });

        let scheduler = scheduler(store.clone(), api, vault);
        let report = scheduler.sweep().await;
        assert_eq!(report.checked, 2);
        assert_eq!(report.failed, 0);

        let bad = store.find_cluster_by_name("bad").await.unwrap().unwrap();
        let good = store.find_cluster_by_name("good").await.unwrap().unwrap();
        assert_eq!(bad.status, ClusterStatus::Unreachable);
        assert_eq!(good.status, ClusterStatus::Active);
    }

    #[tokio::test]
    async fn test_sweep_continues_past_store_failure() {
        let vault = vault();
        let cluster = |id: i64| Cluster {
            id,
            name: format!("c{}", id),
            description: None,
            kubeconfig_encrypted: Some(vault.encrypt("apiVersion: v1\n").unwrap()),
            provider_user_id: 1,
            status: ClusterStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let clusters = vec![cluster(1), cluster(2)];

        let mut store = MockStore::new();
        store
            .expect_list_clusters()
            .times(1)
            .returning(move || Ok(clusters.clone()));
        store.expect_save_cluster().times(2).returning(|c| {
            if c.id == 1 {
                Err(MultikubeError::NotFound("cluster 1".to_string()))
            } else {
                Ok(c.clone())
            }
        });

        let mut api = MockClusterApi::new();
        api.expect_probe().times(2).returning(|_| Ok(()));

        let scheduler = scheduler(Arc::new(store), api, vault.clone());
        let report = scheduler.sweep().await;

        assert_eq!(
            report,
            SweepReport {
                checked: 2,
                skipped: 0,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_sweep_survives_list_failure() {
        let mut store = MockStore::new();
        store
            .expect_list_clusters()
            .returning(|| Err(MultikubeError::IllegalState("database gone".to_string())));

        let scheduler = scheduler(Arc::new(store), MockClusterApi::new(), vault());
        assert_eq!(scheduler.sweep().await, SweepReport::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweeps_immediately_and_then_every_interval() {
        let vault = vault();
        let store = Arc::new(MemoryStore::new());
        seed(&store, &vault, "eu-1", ClusterStatus::PendingVerification).await;

        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let mut api = MockClusterApi::new();
        api.expect_probe().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let worker = tokio::spawn(scheduler(store.clone(), api, vault).run());

        time::sleep(HOUR / 2).await;
        assert_eq!(probes.load(Ordering::SeqCst), 1);
        let cluster = store.find_cluster_by_name("eu-1").await.unwrap().unwrap();
        assert_eq!(cluster.status, ClusterStatus::Active);

        time::sleep(HOUR).await;
        assert_eq!(probes.load(Ordering::SeqCst), 2);

        worker.abort();
    }
}
