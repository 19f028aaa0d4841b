//! Async commands pattern for side effects.
//!
//! Commands carry out the [`Request`]s returned by the session. The App
//! spawns them off the event loop; each one sends exactly one [`Message`]
//! back when it finishes.

mod query;
mod save;

use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::gateway::ResourceGateway;
use crate::message::{Message, Request};
use crate::pipeline::Pipeline;

pub use query::{ListNamespacesCmd, ListSecretsCmd};
pub use save::SaveSecretCmd;

/// Async command that performs side effects.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logging.
    fn name(&self) -> String;

    /// Execute the command.
    ///
    /// Failures of the operation itself are reported as a [`Message`].
    /// An `Err` only means the result could not be delivered.
    async fn execute(self: Box<Self>, tx: UnboundedSender<Message>) -> Result<()>;
}

/// Everything commands need to reach the outside world.
#[derive(Clone)]
pub struct Backend {
    gateway: Arc<dyn ResourceGateway>,
    pipeline: Pipeline,
}

impl Backend {
    pub fn new(gateway: Arc<dyn ResourceGateway>, pipeline: Pipeline) -> Self {
        Self { gateway, pipeline }
    }

    pub fn command_for(&self, request: Request) -> Box<dyn Command> {
        match request {
            Request::ListNamespaces => Box::new(ListNamespacesCmd {
                gateway: self.gateway.clone(),
            }),
            Request::ListSecrets { namespace } => Box::new(ListSecretsCmd {
                gateway: self.gateway.clone(),
                namespace,
            }),
            Request::Save { name, data } => Box::new(SaveSecretCmd {
                pipeline: self.pipeline.clone(),
                name,
                data,
            }),
        }
    }
}
