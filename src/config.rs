use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::azure_devops::client::DEFAULT_SERVER_URL;

pub const ADO_TOKEN_ENV: &str = "ADO_PAT";
pub const GITHUB_TOKEN_ENV: &str = "GH_PAT";
const CONFIG_FILE_STEM: &str = "ado2gh";
const ENV_PREFIX: &str = "ADO2GH";

/// Main configuration structure for ado2gh
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Azure DevOps (source) settings
    pub azure_devops: AzureDevOpsConfig,
    /// GitHub (target) settings
    pub github: GitHubConfig,
    /// Approving review count bounds used when translating reviewer policies
    pub review_limits: ReviewCountLimits,
    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AzureDevOpsConfig {
    /// Server base URL; `https://dev.azure.com` for Azure DevOps Services
    pub server_url: String,
    /// Personal access token (prefer the ADO_PAT environment variable)
    pub token: Option<String>,
}

impl Default for AzureDevOpsConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL for GitHub Enterprise Server; github.com when unset
    pub api_url: Option<String>,
    /// Personal access token (prefer the GH_PAT environment variable)
    pub token: Option<String>,
}

/// Bounds for the approving review count of translated reviewer policies.
///
/// GitHub accepts 0..=6 approving reviews; a migrated reviewer policy always
/// requires at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewCountLimits {
    /// Used when a reviewer policy does not state an approver count
    pub default_count: u32,
    pub min_count: u32,
    pub max_count: u32,
}

impl Default for ReviewCountLimits {
    fn default() -> Self {
        Self {
            default_count: 1,
            min_count: 1,
            max_count: 6,
        }
    }
}

impl ReviewCountLimits {
    pub fn clamp(&self, count: u32) -> u32 {
        count.clamp(self.min_count, self.max_count.max(self.min_count))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit diagnostics as JSON lines on stderr
    pub json: bool,
}

impl MigrationConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (ado2gh.toml in the working directory)
    /// 3. Environment variables (prefixed with ADO2GH_, `__` between sections)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        let file = dir.join(format!("{CONFIG_FILE_STEM}.toml"));
        if file.exists() {
            builder = builder.add_source(File::from(file));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: MigrationConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::debug!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// Azure DevOps token: explicit flag, then ADO_PAT, then configuration
    pub fn resolve_ado_token(&self, flag: Option<&str>) -> Option<String> {
        resolve_token(flag, ADO_TOKEN_ENV, self.azure_devops.token.as_deref())
    }

    /// GitHub token: explicit flag, then GH_PAT, then configuration
    pub fn resolve_github_token(&self, flag: Option<&str>) -> Option<String> {
        resolve_token(flag, GITHUB_TOKEN_ENV, self.github.token.as_deref())
    }
}

fn resolve_token(flag: Option<&str>, env_var: &str, configured: Option<&str>) -> Option<String> {
    let non_empty = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    flag.and_then(non_empty)
        .or_else(|| std::env::var(env_var).ok().as_deref().and_then(non_empty))
        .or_else(|| configured.and_then(non_empty))
}
