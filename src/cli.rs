use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "lazysecret",
    version,
    about = "Create and edit sops-encrypted Kubernetes secrets"
)]
pub struct Args {
    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the kubeconfig file
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context (e.g., "prod")
    #[arg(long)]
    pub context: Option<String>,

    /// sops configuration passed to `sops --config`
    #[arg(long)]
    pub sops_config: Option<PathBuf>,

    /// Directory to write the secret manifest to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(long)]
    pub theme: Option<String>,
}
