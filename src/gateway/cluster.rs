use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::gateway::ResourceGateway;
use crate::secret::{SecretData, SecretSummary};

/// Kubernetes API gateway.
///
/// The client is built on first use, so starting the app without cluster
/// access only fails once the user asks for cluster data.
pub struct ClusterGateway {
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
    client: OnceCell<Client>,
}

impl ClusterGateway {
    pub fn new(kubeconfig: Option<PathBuf>, context: Option<String>) -> Self {
        Self {
            kubeconfig,
            context,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                let config = self.load_config().await?;
                info!(cluster = %config.cluster_url, "Connecting to cluster");
                Client::try_from(config).wrap_err("Could not create Kubernetes client")
            })
            .await
    }

    async fn load_config(&self) -> Result<Config> {
        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..Default::default()
        };

        match (&self.kubeconfig, &self.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .wrap_err_with(|| format!("Could not read kubeconfig {}", path.display()))?;
                Ok(Config::from_custom_kubeconfig(kubeconfig, &options).await?)
            }
            (None, Some(_)) => Ok(Config::from_kubeconfig(&options).await?),
            (None, None) => Ok(Config::infer().await?),
        }
    }
}

#[async_trait]
impl ResourceGateway for ClusterGateway {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client().await?.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .wrap_err("Could not list namespaces")?;

        let names: Vec<String> = list
            .items
            .into_iter()
            .filter_map(|namespace| namespace.metadata.name)
            .collect();
        debug!(count = names.len(), "Listed namespaces");
        Ok(names)
    }

    async fn list_secrets(&self, namespace: &str) -> Result<Vec<SecretSummary>> {
        let api: Api<Secret> = Api::namespaced(self.client().await?.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .wrap_err_with(|| format!("Could not list secrets in {namespace}"))?;

        let secrets: Vec<SecretSummary> = list.items.into_iter().filter_map(summarize).collect();
        debug!(namespace, count = secrets.len(), "Listed secrets");
        Ok(secrets)
    }
}

/// The API returns raw bytes; re-encode them so fetched and edited data share one shape.
fn summarize(secret: Secret) -> Option<SecretSummary> {
    let name = secret.metadata.name?;
    let data: SecretData = secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, STANDARD.encode(value.0)))
        .collect();
    Some(SecretSummary { name, data })
}
