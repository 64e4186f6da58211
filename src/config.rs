//! Configuration management for the generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (typegen.toml)
//! - Environment variables (TYPEGEN__*)
//!
//! ## Example config file (typegen.toml):
//! ```toml
//! expose_endpoint = true
//! endpoint_path = "/api/typegen"
//! secure_endpoint = true
//!
//! [ts_schema]
//! output_path = "web/src/lib/tsSchema.ts"
//! include_docs = true
//!
//! [ts_schema.overrides.posts]
//! meta = "{ tags: string[] }"
//!
//! [zod_schema]
//! output_path = "web/src/lib/zodSchema.ts"
//! import_statements = ["import { metaSchema } from './meta'"]
//! ```

use std::path::Path;

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::codegen::config::{TsSchemaConfig, ZodSchemaConfig};
use crate::error::{Result, SchemaError};

/// Main configuration for the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Host should serve the artifacts over HTTP (recorded, not served here)
    #[serde(default)]
    pub expose_endpoint: bool,

    /// HTTP path for the endpoint
    #[serde(default)]
    pub endpoint_path: Option<String>,

    /// Endpoint requires superuser auth
    #[serde(default)]
    pub secure_endpoint: bool,

    /// Type-declaration artifact
    #[serde(default)]
    pub ts_schema: TsSchemaConfig,

    /// Validator artifact
    #[serde(default)]
    pub zod_schema: ZodSchemaConfig,
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["typegen.toml", ".typegen.toml", "config/typegen.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "pocketbase", "typegen") {
            let xdg_config = dirs.config_dir().join("typegen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // TYPEGEN__TS_SCHEMA__INCLUDE_DOCS=false
        builder = builder.add_source(
            Environment::with_prefix("TYPEGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from one file only, ignoring default locations and
    /// the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject option combinations that cannot be acted on
    pub fn validate(&self) -> Result<()> {
        if self.expose_endpoint
            && self.endpoint_path.as_deref().map_or(true, |p| p.trim().is_empty())
        {
            return Err(SchemaError::InvalidConfig(
                "expose_endpoint is set but endpoint_path is missing".to_string(),
            ));
        }
        if self.ts_schema.generate_file && self.ts_schema.output_path.as_os_str().is_empty() {
            return Err(SchemaError::InvalidConfig(
                "ts_schema.generate_file is set but ts_schema.output_path is empty".to_string(),
            ));
        }
        if self.zod_schema.generate_file && self.zod_schema.output_path.as_os_str().is_empty() {
            return Err(SchemaError::InvalidConfig(
                "zod_schema.generate_file is set but zod_schema.output_path is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
