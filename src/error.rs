// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MultikubeError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// Never carries the underlying cause, so nothing about the stored
    /// credential leaks through error messages.
    #[error("Failed to process stored cluster credential")]
    CredentialError,

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Invalid manifest: {0}")]
    ManifestError(String),

    #[error("Unsupported kind for apply: {0}")]
    UnsupportedKind(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),
}

impl MultikubeError {
    /// Errors the caller caused and can correct; these map to a 4xx-style rejection.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MultikubeError::ManifestError(_)
                | MultikubeError::UnsupportedKind(_)
                | MultikubeError::ValidationError(_)
                | MultikubeError::AccessDenied(_)
                | MultikubeError::NotFound(_)
                | MultikubeError::Conflict(_)
        )
    }

    /// True when the remote API answered with the given HTTP status code.
    pub fn is_api_status(&self, code: u16) -> bool {
        matches!(self, MultikubeError::KubeError(kube::Error::Api(err)) if err.code == code)
    }
}

pub type Result<T> = std::result::Result<T, MultikubeError>;
