// FILE: src/config.rs

use crate::error::{CompilerError, Result};
use crate::scheme::{DesignScheme, SchemeRegistry};
use crate::vendor::Vendor;
use crate::{CompilerOptions, RenderMode, VariableMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Compiler settings read from a `.json` or `.toml` file; every field is optional
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub render_mode: Option<RenderMode>,
    pub variable_mode: Option<VariableMode>,
    pub vendor_targets: Option<BTreeSet<Vendor>>,
    pub active_scheme: Option<String>,
    pub debug_mode: Option<bool>,
}

impl ConfigFile {
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| CompilerError::FileNotFound {
            path: format!("Config file {}: {}", config_path.display(), e),
        })?;

        let config = match config_path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&config_content).map_err(|e| CompilerError::InvalidFormat {
                message: format!("Invalid JSON config: {}", e),
            })?,
            Some("toml") => toml::from_str(&config_content).map_err(|e| CompilerError::InvalidFormat {
                message: format!("Invalid TOML config: {}", e),
            })?,
            _ => {
                return Err(CompilerError::InvalidFormat {
                    message: "Config file must be .json or .toml format".to_string(),
                })
            }
        };

        log::info!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Overlay the fields present in this file onto `options`
    pub fn apply_to(&self, options: &mut CompilerOptions) {
        if let Some(render_mode) = self.render_mode {
            options.render_mode = render_mode;
        }
        if let Some(variable_mode) = self.variable_mode {
            options.variable_mode = variable_mode;
        }
        if let Some(targets) = &self.vendor_targets {
            options.vendor_targets = Some(targets.clone());
        }
        if let Some(debug_mode) = self.debug_mode {
            options.debug_mode = debug_mode;
        }
    }

    pub fn to_options(&self) -> CompilerOptions {
        let mut options = CompilerOptions::default();
        self.apply_to(&mut options);
        options
    }

    /// The configured scheme, or the empty scheme when none is named
    pub fn active_scheme(&self, registry: &SchemeRegistry) -> Result<Arc<DesignScheme>> {
        match &self.active_scheme {
            Some(name) => registry.get(name).ok_or_else(|| {
                CompilerError::construction(format!("Configured scheme '{}' is not registered", name))
            }),
            None => Ok(Arc::new(DesignScheme::empty())),
        }
    }
}
