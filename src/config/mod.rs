pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::cli::Args;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// How manifests get encrypted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SopsConfig {
    /// Executable to run, looked up on `PATH` unless absolute.
    pub binary: String,
    /// Passed to sops as `--config`.
    pub config: PathBuf,
}

impl Default for SopsConfig {
    fn default() -> Self {
        Self {
            binary: "sops".to_string(),
            config: PathBuf::from(".sops.yaml"),
        }
    }
}

/// Cluster connection. Unset fields fall back to the usual kubeconfig lookup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusterConfig {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeConfig,
    pub keybindings: KeybindingsConfig,
    pub sops: SopsConfig,
    pub kube: ClusterConfig,
    /// Directory the `<name>.yaml` manifests are written to.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeConfig::default(),
            keybindings: KeybindingsConfig::default(),
            sops: SopsConfig::default(),
            kube: ClusterConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Command line flags win over the config file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(path) = &args.kubeconfig {
            self.kube.kubeconfig = Some(path.clone());
        }
        if let Some(context) = &args.context {
            self.kube.context = Some(context.clone());
        }
        if let Some(path) = &args.sops_config {
            self.sops.config.clone_from(path);
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(theme) = &args.theme {
            self.theme.name.clone_from(theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = loader::parse("").unwrap();
        assert_eq!(config.sops.binary, "sops");
        assert_eq!(config.sops.config, PathBuf::from(".sops.yaml"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.kube.context.is_none());
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = loader::parse(
            r#"
            [sops]
            config = "deploy/.sops.yaml"

            [keybindings.editor]
            save = "ctrl+w"
            "#,
        )
        .unwrap();

        assert_eq!(config.sops.binary, "sops");
        assert_eq!(config.sops.config, PathBuf::from("deploy/.sops.yaml"));

        let save = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert!(config.keybindings.editor.save.matches(&save));
        let blur = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(config.keybindings.editor.blur.matches(&blur));
    }

    #[test]
    fn test_args_override_file() {
        let mut config = loader::parse(
            r#"
            output_dir = "from-file"
            [kube]
            context = "staging"
            "#,
        )
        .unwrap();
        let args = Args::parse_from(["lazysecret", "--context", "prod", "--sops-config", "x.yaml"]);
        config.apply_args(&args);

        assert_eq!(config.kube.context.as_deref(), Some("prod"));
        assert_eq!(config.sops.config, PathBuf::from("x.yaml"));
        assert_eq!(config.output_dir, PathBuf::from("from-file"));
    }
}
