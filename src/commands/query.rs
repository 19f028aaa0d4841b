use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::commands::Command;
use crate::gateway::ResourceGateway;
use crate::message::Message;

/// Fetch the namespace names.
pub struct ListNamespacesCmd {
    pub(super) gateway: Arc<dyn ResourceGateway>,
}

#[async_trait]
impl Command for ListNamespacesCmd {
    fn name(&self) -> String {
        "Loading namespaces".to_string()
    }

    async fn execute(self: Box<Self>, tx: UnboundedSender<Message>) -> Result<()> {
        let message = match self.gateway.list_namespaces().await {
            Ok(namespaces) => Message::NamespacesLoaded(namespaces),
            Err(e) => {
                warn!(error = ?e, "Namespace query failed");
                Message::QueryFailed(format!("{e:#}"))
            }
        };
        tx.send(message)?;
        Ok(())
    }
}

/// Fetch the secrets of one namespace, including their data.
pub struct ListSecretsCmd {
    pub(super) gateway: Arc<dyn ResourceGateway>,
    pub(super) namespace: String,
}

#[async_trait]
impl Command for ListSecretsCmd {
    fn name(&self) -> String {
        format!("Loading secrets in '{}'", self.namespace)
    }

    async fn execute(self: Box<Self>, tx: UnboundedSender<Message>) -> Result<()> {
        let message = match self.gateway.list_secrets(&self.namespace).await {
            Ok(secrets) => Message::SecretsLoaded {
                namespace: self.namespace,
                secrets,
            },
            Err(e) => {
                warn!(namespace = %self.namespace, error = ?e, "Secret query failed");
                Message::QueryFailed(format!("{e:#}"))
            }
        };
        tx.send(message)?;
        Ok(())
    }
}
