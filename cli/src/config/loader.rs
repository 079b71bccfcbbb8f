//! CLI configuration loader for GoldRadar
//!
//! Implements single-source priority loading with environment and flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./goldradar.json or ./.goldradar/config.json
//! 3. Git repository root: <repo_root>/.goldradar/config.json
//! 4. User config dir: $XDG_CONFIG_HOME/goldradar/config.json or platform equivalent
//! 5. Built-in defaults (no files)
//!
//! `GOLDRADAR__<FIELD>` environment variables override file values and command
//! line flags override both.

use anyhow::{anyhow, Context, Result};
use goldradar_core::RouterConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment overrides, e.g. `GOLDRADAR__MAX_RETRIES=5`
pub const ENV_PREFIX: &str = "GOLDRADAR";

const FILE_NAME: &str = "goldradar.json";
const DIR_NAME: &str = ".goldradar";

/// Resolved configuration plus the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: RouterConfig,
    /// Config file used, `None` when running on defaults
    pub source: Option<PathBuf>,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    route_override: Option<String>,
    max_retries_override: Option<u32>,
    /// Search roots; process defaults when unset
    working_dir: Option<PathBuf>,
    user_config_dir: Option<PathBuf>,
    /// Environment snapshot; the process environment when unset
    env_source: Option<::config::Map<String, String>>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            route_override: None,
            max_retries_override: None,
            working_dir: None,
            user_config_dir: None,
            env_source: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set default route override
    pub fn with_route_override(mut self, route: String) -> Self {
        self.route_override = Some(route);
        self
    }

    /// Set retry ceiling override
    pub fn with_max_retries_override(mut self, max_retries: u32) -> Self {
        self.max_retries_override = Some(max_retries);
        self
    }

    /// Search for config files relative to `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Use `dir` as the user config directory
    pub fn with_user_config_dir(mut self, dir: PathBuf) -> Self {
        self.user_config_dir = Some(dir);
        self
    }

    /// Read environment overrides from `vars` instead of the process environment
    pub fn with_env_source<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env_source = Some(vars.into_iter().collect());
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<LoadedConfig> {
        // Step 1: Find the base configuration file
        let source = if let Some(override_path) = &self.config_override {
            Some(self.resolve_override(override_path).with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?)
        } else {
            self.search()?
        };

        // Step 2: Layer file and environment
        let mut builder = ::config::Config::builder();
        if let Some(path) = &source {
            debug!("Loading configuration from {}", path.display());
            let content = self.read_file(path).await?;
            builder = builder.add_source(::config::File::from_str(
                &content,
                ::config::FileFormat::Json,
            ));
        }
        builder = builder.add_source(self.environment());

        let mut config: RouterConfig = builder
            .build()
            .and_then(|layered| layered.try_deserialize())
            .with_context(|| match &source {
                Some(path) => format!("Failed to parse config file: {}", path.display()),
                None => "Failed to parse configuration from environment".to_string(),
            })?;

        // Step 3: Apply flag overrides
        if let Some(route) = &self.route_override {
            config.default_route = route.clone();
        }
        if let Some(max_retries) = self.max_retries_override {
            config.max_retries = max_retries;
        }

        config
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(LoadedConfig { config, source })
    }

    fn environment(&self) -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("preload_paths")
            .source(self.env_source.clone())
    }

    /// Search for a config file in priority order
    fn search(&self) -> Result<Option<PathBuf>> {
        let cwd = self.working_dir()?;

        // 1. Current working directory
        for candidate in [cwd.join(FILE_NAME), cwd.join(DIR_NAME).join("config.json")] {
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }

        // 2. Git repository root
        if let Some(git_root) = find_git_root(&cwd) {
            let candidate = git_root.join(DIR_NAME).join("config.json");
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }

        // 3. User config directory
        if let Some(config_dir) = self.user_config_dir() {
            let candidate = config_dir.join("goldradar").join("config.json");
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }

        // 4. Defaults only
        Ok(None)
    }

    /// Resolve an explicit path (file or directory) to a config file
    fn resolve_override(&self, path: &Path) -> Result<PathBuf> {
        if path.is_file() {
            Ok(path.to_path_buf())
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.is_file() {
                Ok(config_file)
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    fn user_config_dir(&self) -> Option<PathBuf> {
        self.user_config_dir.clone().or_else(dirs::config_dir)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk up from `start` looking for a `.git` entry
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}
