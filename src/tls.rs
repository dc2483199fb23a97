// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Trust material for the daemon's self-signed certificate.
//!
//! The daemon writes `cert.pem` and `key.pem` into its `ssl` data directory.
//! The certificate is trusted as a root by both the HTTPS client and the
//! notification websocket; when the key is present the pair is also presented
//! as client identity.

use std::{fs, path::Path};

use log::debug;

use crate::{config::ClientConfig, error::JmRpcError};

const CERT_FILE: &str = "cert.pem";
const KEY_FILE: &str = "key.pem";

#[derive(Clone, Default)]
pub struct TlsSettings {
    cert_pem: Option<Vec<u8>>,
    key_pem: Option<Vec<u8>>,
    accept_invalid_hostnames: bool,
}

impl TlsSettings {
    /// Reads the trust material named by the configuration. Called once at
    /// client construction.
    pub fn load(config: &ClientConfig) -> Result<Self, JmRpcError> {
        let mut settings = Self {
            accept_invalid_hostnames: config.accept_invalid_hostnames,
            ..Self::default()
        };
        if let Some(dir) = &config.ssl_dir {
            settings.cert_pem = Some(read_pem(&dir.join(CERT_FILE))?);
            let key_path = dir.join(KEY_FILE);
            if key_path.exists() {
                settings.key_pem = Some(read_pem(&key_path)?);
            }
            debug!(
                dir:% = dir.display(),
                client_identity = settings.key_pem.is_some();
                "Loaded daemon TLS material"
            );
        }
        Ok(settings)
    }

    pub fn is_default(&self) -> bool {
        self.cert_pem.is_none() && !self.accept_invalid_hostnames
    }

    pub fn apply_to_http(&self, mut builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder, JmRpcError> {
        if let Some(cert) = &self.cert_pem {
            let root = reqwest::Certificate::from_pem(cert).map_err(|e| JmRpcError::Tls(e.to_string()))?;
            builder = builder.add_root_certificate(root);
            if let Some(key) = &self.key_pem {
                let identity =
                    reqwest::Identity::from_pkcs8_pem(cert, key).map_err(|e| JmRpcError::Tls(e.to_string()))?;
                builder = builder.identity(identity);
            }
        }
        Ok(builder.danger_accept_invalid_hostnames(self.accept_invalid_hostnames))
    }

    pub fn websocket_connector(&self) -> Result<native_tls::TlsConnector, JmRpcError> {
        let mut builder = native_tls::TlsConnector::builder();
        if let Some(cert) = &self.cert_pem {
            builder.add_root_certificate(native_tls::Certificate::from_pem(cert)?);
            if let Some(key) = &self.key_pem {
                builder.identity(native_tls::Identity::from_pkcs8(cert, key)?);
            }
        }
        builder.danger_accept_invalid_hostnames(self.accept_invalid_hostnames);
        Ok(builder.build()?)
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, JmRpcError> {
    fs::read(path).map_err(|e| JmRpcError::Tls(format!("Could not read {}: {}", path.display(), e)))
}
