// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster connectivity verification and the periodic status worker.

pub mod scheduler;
pub mod verifier;

pub use scheduler::{ClusterStatusScheduler, SweepReport};
pub use verifier::ClusterVerifier;
