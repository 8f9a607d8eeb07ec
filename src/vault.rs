// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! At-rest encryption of cluster kubeconfigs.
//!
//! AES-CBC with PKCS#7 padding, base64 transport encoding. The key selects
//! AES-128/192/256 by its length. Every credential is encrypted under the same
//! key and IV, so equal kubeconfigs produce equal ciphertexts.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use openssl::symm::{self, Cipher};
use std::fmt;
use tracing::debug;

use crate::error::{MultikubeError, Result};

const IV_LEN: usize = 16;

pub struct CredentialVault {
    cipher: Cipher,
    key: Vec<u8>,
    iv: [u8; IV_LEN],
}

impl CredentialVault {
    /// Build a vault from raw key and IV bytes.
    ///
    /// Fails with [`MultikubeError::ConfigurationError`] unless the key is 16, 24
    /// or 32 bytes and the IV is exactly 16 bytes.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        let cipher = match key.len() {
            16 => Cipher::aes_128_cbc(),
            24 => Cipher::aes_192_cbc(),
            32 => Cipher::aes_256_cbc(),
            other => {
                return Err(MultikubeError::ConfigurationError(format!(
                    "encryption key must be 16, 24, or 32 bytes long for AES, got {}",
                    other
                )))
            }
        };
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| {
            MultikubeError::ConfigurationError(format!(
                "initialization vector must be {} bytes long for AES, got {}",
                IV_LEN,
                iv.len()
            ))
        })?;

        Ok(Self {
            cipher,
            key: key.to_vec(),
            iv,
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let encrypted = symm::encrypt(self.cipher, &self.key, Some(&self.iv), plaintext.as_bytes())
            .map_err(|e| {
                debug!("Credential encryption failed: {}", e);
                MultikubeError::CredentialError
            })?;
        Ok(STANDARD.encode(encrypted))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| MultikubeError::CredentialError)?;
        let decrypted = symm::decrypt(self.cipher, &self.key, Some(&self.iv), &raw)
            .map_err(|_| MultikubeError::CredentialError)?;
        String::from_utf8(decrypted).map_err(|_| MultikubeError::CredentialError)
    }

    /// [`Self::encrypt`] lifted over an optional value; `None` stays `None`.
    pub fn encrypt_optional(&self, plaintext: Option<&str>) -> Result<Option<String>> {
        plaintext.map(|p| self.encrypt(p)).transpose()
    }

    /// [`Self::decrypt`] lifted over an optional value; `None` stays `None`.
    pub fn decrypt_optional(&self, ciphertext: Option<&str>) -> Result<Option<String>> {
        ciphertext.map(|c| self.decrypt(c)).transpose()
    }
}

impl fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault")
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}
