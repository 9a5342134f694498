//! Configuration model loaded from external sources.

use std::env;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_MAX_VISIBLE_PAGES};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid settings: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("inconsistent settings: {0}")]
    Inconsistent(String),
}

/// `APP_*` variables, e.g. `APP_MAX_VISIBLE_PAGES=7` or
/// `APP_PAGE_SIZE_OPTIONS=10,25`.
fn environment() -> Environment {
    Environment::with_prefix("APP")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("page_size_options")
}

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_max_page_size() -> usize {
    100
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 25, 50]
}

fn default_max_visible_pages() -> usize {
    DEFAULT_MAX_VISIBLE_PAGES
}

#[derive(Clone, Debug, Deserialize, Validate, PartialEq, Eq)]
/// Pagination defaults shared by every list view.
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1))]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    #[validate(range(min = 1))]
    pub max_page_size: usize,
    /// Choices offered by the "rows per page" selector.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
    #[serde(default = "default_max_visible_pages")]
    #[validate(range(min = 3))]
    pub max_visible_pages: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            page_size_options: default_page_size_options(),
            max_visible_pages: default_max_visible_pages(),
        }
    }
}

impl ListingConfig {
    /// Loads `config/default.yaml`, the optional `config/{APP_ENV}.yaml`
    /// profile and `APP_*` environment overrides, in that order.
    pub fn load() -> Result<Self, SettingsError> {
        dotenv().ok();
        // Select config profile (defaults to `local`).
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
        Self::load_from(Path::new("config"), &app_env)
    }

    pub fn load_from(dir: &Path, app_env: &str) -> Result<Self, SettingsError> {
        Self::load_layers(dir, app_env, environment())
    }

    fn load_layers(
        dir: &Path,
        app_env: &str,
        environment: Environment,
    ) -> Result<Self, SettingsError> {
        let default_file = dir.join("default");
        let profile_file = dir.join(app_env);
        let settings = Config::builder()
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(File::with_name(&profile_file.to_string_lossy()).required(false))
            .add_source(environment)
            .build()
            .map_err(|err| {
                log::error!("Error loading settings: {err}");
                err
            })?;

        let listing_config = settings.try_deserialize::<ListingConfig>()?;
        listing_config.check()?;
        Ok(listing_config)
    }

    /// Validates field ranges and the relations between fields.
    pub fn check(&self) -> Result<(), SettingsError> {
        self.validate()?;
        if self.default_page_size > self.max_page_size {
            return Err(SettingsError::Inconsistent(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        if let Some(size) = self
            .page_size_options
            .iter()
            .find(|&&size| size == 0 || size > self.max_page_size)
        {
            return Err(SettingsError::Inconsistent(format!(
                "page size option {size} is outside 1..={}",
                self.max_page_size
            )));
        }
        Ok(())
    }

    pub fn allows_page_size(&self, page_size: usize) -> bool {
        (1..=self.max_page_size).contains(&page_size)
    }

    /// Requested page size, or the default when absent or out of range.
    pub fn effective_page_size(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(size) if self.allows_page_size(size) => size,
            Some(size) => {
                log::warn!("Ignoring page size {size}, using {}", self.default_page_size);
                self.default_page_size
            }
            None => self.default_page_size,
        }
    }
}
