//! Builder configuration, read from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::custom::{CustomOperation, CustomOperationConfig};
use crate::document;
use crate::error::{BuilderError, Result};
use crate::mutation::RootPolicy;

/// Seed template a new session starts from.
pub fn default_template() -> Value {
    json!({"or": [{">": [{"+": [1, {"var": "myVariable"}]}, 5]}]})
}

pub fn default_test_data() -> Value {
    json!({"myVariable": 10})
}

/// Every field is optional in the file; missing fields take their defaults.
///
/// ```json
/// {
///   "template": {"and": []},
///   "test_data": {"age": 30},
///   "allow_root_delete": true,
///   "custom_operations": [
///     {"id": "double", "description": "Twice", "body": {"*": [{"var": "args.0"}, 2]}, "arity": 1}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    pub template: Value,
    pub test_data: Value,
    pub allow_root_delete: bool,
    pub custom_operations: Vec<CustomOperationConfig>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            template: default_template(),
            test_data: default_test_data(),
            allow_root_delete: false,
            custom_operations: Vec::new(),
        }
    }
}

impl BuilderConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: BuilderConfig =
            serde_json::from_str(text).map_err(|e| BuilderError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Rejects a template with more than one root key and custom operations
    /// that would not register.
    pub fn validate(&self) -> Result<()> {
        document::validate_root(&self.template)
            .map_err(|_| BuilderError::InvalidConfig("template must be {} or a single-key object".to_string()))?;
        for op in &self.custom_operations {
            CustomOperation::from_config(op)
                .map_err(|e| BuilderError::InvalidConfig(format!("custom operation {:?}: {e}", op.id)))?;
        }
        Ok(())
    }

    pub fn root_policy(&self) -> RootPolicy {
        if self.allow_root_delete {
            RootPolicy::Deletable
        } else {
            RootPolicy::Locked
        }
    }
}
