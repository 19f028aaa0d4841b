//! Values exchanged between the session and the async commands.
//!
//! # Terminology
//! - **Request**: side effect asked for by the session, see [`Request`]
//! - **Command**: async task that carries out a request, see [`crate::commands::Command`]
//! - **Message**: result of a command, fed back into the session, see [`Message`]

use std::path::PathBuf;

use crate::secret::{SecretData, SecretSummary};

/// Side effect requested by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListNamespaces,
    ListSecrets { namespace: String },
    /// Write the manifest for `name`, then encrypt it.
    Save { name: String, data: SecretData },
}

impl Request {
    /// Spinner label while the request is in flight.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ListNamespaces => "Loading namespaces...",
            Self::ListSecrets { .. } => "Loading secrets...",
            Self::Save { .. } => "Saving and encrypting...",
        }
    }
}

/// Result of a command. Each command produces exactly one.
#[derive(Debug, Clone)]
pub enum Message {
    NamespacesLoaded(Vec<String>),
    SecretsLoaded {
        namespace: String,
        secrets: Vec<SecretSummary>,
    },
    QueryFailed(String),
    /// Manifest written and encrypted.
    Saved(PathBuf),
    SaveFailed(String),
    EncryptFailed(String),
}
