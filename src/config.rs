// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{env as keys, probe, status};

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Symmetric key used to encrypt kubeconfigs at rest
    pub encryption_key: String,
    /// Initialization vector paired with the encryption key
    pub encryption_iv: String,
    /// Interval between two cluster status sweeps
    pub status_check_interval: Duration,
    pub probe_connect_timeout: Duration,
    pub probe_read_timeout: Duration,
    /// Optional cluster inventory registered at startup
    pub clusters_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let encryption_key = env::var(keys::ENCRYPTION_KEY)
            .with_context(|| format!("{} environment variable not set", keys::ENCRYPTION_KEY))?;
        let encryption_iv = env::var(keys::ENCRYPTION_IV)
            .with_context(|| format!("{} environment variable not set", keys::ENCRYPTION_IV))?;

        Ok(Config {
            encryption_key,
            encryption_iv,
            status_check_interval: Duration::from_millis(parse_or(
                keys::STATUS_CHECK_RATE_MS,
                status::DEFAULT_CHECK_RATE_MS,
            )),
            probe_connect_timeout: Duration::from_secs(parse_or(
                keys::PROBE_CONNECT_TIMEOUT_SECS,
                probe::CONNECT_TIMEOUT_SECS,
            )),
            probe_read_timeout: Duration::from_secs(parse_or(
                keys::PROBE_READ_TIMEOUT_SECS,
                probe::READ_TIMEOUT_SECS,
            )),
            clusters_file: env::var(keys::CLUSTERS_FILE).ok().map(PathBuf::from),
        })
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
