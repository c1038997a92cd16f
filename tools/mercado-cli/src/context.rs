//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use mercado_commerce::{Marketplace, UserId};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
    /// Store path given on the command line.
    store_override: Option<PathBuf>,
    /// Username from `--as`.
    principal: Option<String>,
}

impl Context {
    /// Load context from config file.
    pub fn load(
        config_path: Option<&str>,
        store: Option<&str>,
        principal: Option<String>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
            store_override: store.map(PathBuf::from),
            principal,
        })
    }

    /// Find config file in directory tree.
    pub fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// State file location.
    ///
    /// Relative paths in the config file resolve against the file's
    /// directory; everything else against the working directory.
    pub fn store_path(&self) -> PathBuf {
        if let Some(path) = &self.store_override {
            return self.resolve_path(path);
        }
        let configured = Path::new(&self.config.store.path);
        if configured.is_absolute() {
            return configured.to_path_buf();
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(configured),
            _ => self.cwd.join(configured),
        }
    }

    /// Open the marketplace store.
    pub fn market(&self) -> Result<Marketplace> {
        let path = self.store_path();
        self.output.debug(&format!("Store: {}", path.display()));
        Marketplace::open(&path, self.config.market.clone())
            .with_context(|| format!("Failed to open store: {}", path.display()))
    }

    /// The user given with `--as`.
    pub fn actor(&self, market: &Marketplace) -> Result<UserId> {
        let Some(username) = &self.principal else {
            bail!("This command needs a user. Pass --as <username>.");
        };
        let user = market
            .user_by_username(username)
            .with_context(|| format!("Cannot act as '{}'", username))?;
        Ok(user.id)
    }

    /// The `--as` user if one was given.
    pub fn viewer(&self, market: &Marketplace) -> Result<Option<UserId>> {
        match &self.principal {
            Some(_) => self.actor(market).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
