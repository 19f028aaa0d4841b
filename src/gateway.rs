//! Read-only queries against the cluster.

mod cluster;

use async_trait::async_trait;
use color_eyre::Result;

use crate::secret::SecretSummary;

pub use cluster::ClusterGateway;

/// Source of namespaces and secrets.
///
/// Only called from commands, never from the event loop, so a slow
/// cluster cannot block key handling.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    async fn list_secrets(&self, namespace: &str) -> Result<Vec<SecretSummary>>;
}
