use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::commands::Command;
use crate::message::Message;
use crate::pipeline::{Pipeline, PipelineError};
use crate::secret::SecretData;

/// Write the secret manifest and encrypt it with sops.
pub struct SaveSecretCmd {
    pub(super) pipeline: Pipeline,
    pub(super) name: String,
    pub(super) data: SecretData,
}

#[async_trait]
impl Command for SaveSecretCmd {
    fn name(&self) -> String {
        format!("Saving '{}'", self.name)
    }

    async fn execute(self: Box<Self>, tx: UnboundedSender<Message>) -> Result<()> {
        let Self {
            pipeline,
            name,
            data,
        } = *self;
        let message = match pipeline.persist_and_encrypt(&name, data).await {
            Ok(path) => Message::Saved(path),
            Err(e) => {
                error!(secret = %name, error = %e, "Save failed");
                match e {
                    PipelineError::Persist { .. } => Message::SaveFailed(e.to_string()),
                    PipelineError::Encrypt { .. } => Message::EncryptFailed(e.to_string()),
                }
            }
        };
        tx.send(message)?;
        Ok(())
    }
}
