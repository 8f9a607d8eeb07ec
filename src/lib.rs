// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod inventory;
pub mod kubernetes;
pub mod provisioning;
pub mod status;
pub mod store;
pub mod types;
pub mod vault;

#[cfg(test)]
pub mod test_utils;
