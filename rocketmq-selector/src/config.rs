// Copyright 2023 The RocketMQ Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::path::Path;

use cheetah_string::CheetahString;
use config::Config;
use config::File;
use config::FileFormat;
use rocketmq_error::FilterError;
use rocketmq_error::FilterResult;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::constant::SelectorDomain;

/// Settings of a [`SelectorCompiler`](crate::filter::SelectorCompiler).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Cast mismatched operands during evaluation instead of treating them as unknown.
    pub permissive: bool,

    #[serde(alias = "memoizeSubexpressions")]
    pub memoize_subexpressions: bool,

    #[serde(alias = "defaultDomain")]
    pub default_domain: SelectorDomain,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            permissive: false,
            memoize_subexpressions: true,
            default_domain: SelectorDomain::Jms,
        }
    }
}

impl SelectorConfig {
    pub fn new() -> SelectorConfig {
        Self::default()
    }

    /// Loads the config from a file; the format follows the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> FilterResult<SelectorConfig> {
        let cfg = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(cfg.try_deserialize::<SelectorConfig>()?)
    }

    pub fn from_toml_str(content: &str) -> FilterResult<SelectorConfig> {
        let cfg = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize::<SelectorConfig>()?)
    }

    pub fn get_all_configs_format_string(&self) -> FilterResult<String> {
        let mut json_map = HashMap::new();
        json_map.insert("permissive".to_string(), Value::Bool(self.permissive));
        json_map.insert(
            "memoizeSubexpressions".to_string(),
            Value::Bool(self.memoize_subexpressions),
        );
        json_map.insert(
            "defaultDomain".to_string(),
            Value::String(self.default_domain.name().to_string()),
        );
        serde_json::to_string_pretty(&json_map)
            .map_err(|err| FilterError::config(format!("Failed to serialize SelectorConfig: {err}")))
    }

    /// Applies `key = value` overrides given with the camelCase key names.
    pub fn update(&mut self, properties: HashMap<CheetahString, CheetahString>) -> FilterResult<()> {
        for (key, value) in properties {
            match key.as_str() {
                "permissive" => {
                    self.permissive = value
                        .parse()
                        .map_err(|_| FilterError::config(format!("Invalid boolean value for key '{key}'")))?
                }
                "memoizeSubexpressions" => {
                    self.memoize_subexpressions = value
                        .parse()
                        .map_err(|_| FilterError::config(format!("Invalid boolean value for key '{key}'")))?
                }
                "defaultDomain" => {
                    self.default_domain = SelectorDomain::get_by_name(value.as_str())
                        .ok_or_else(|| FilterError::config(format!("Unknown selector domain '{value}'")))?
                }
                _ => return Err(FilterError::config(format!("Invalid config key '{key}'"))),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SelectorConfig::new();
        assert!(!config.permissive);
        assert!(config.memoize_subexpressions);
        assert_eq!(config.default_domain, SelectorDomain::Jms);
    }

    #[test]
    fn test_from_toml_str_accepts_camel_case() {
        let config = SelectorConfig::from_toml_str(
            r#"
            permissive = true
            memoizeSubexpressions = false
            defaultDomain = "XPATH1"
            "#,
        )
        .unwrap();
        assert!(config.permissive);
        assert!(!config.memoize_subexpressions);
        assert_eq!(config.default_domain, SelectorDomain::XPath1);
    }

    #[test]
    fn test_from_toml_str_fills_defaults() {
        let config = SelectorConfig::from_toml_str("permissive = true").unwrap();
        assert!(config.memoize_subexpressions);
        assert_eq!(config.default_domain, SelectorDomain::Jms);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_value() {
        let err = SelectorConfig::from_toml_str("permissive = \"maybe\"").unwrap_err();
        assert!(matches!(err, FilterError::Config(_)));
    }

    #[test]
    fn test_from_missing_file() {
        let err = SelectorConfig::from_file("/nonexistent/selector.toml").unwrap_err();
        assert!(matches!(err, FilterError::Config(_)));
    }

    #[test]
    fn test_update() {
        let mut config = SelectorConfig::new();
        let mut properties = HashMap::new();
        properties.insert(CheetahString::from("permissive"), CheetahString::from("true"));
        properties.insert(CheetahString::from("defaultDomain"), CheetahString::from("simessage"));
        config.update(properties).unwrap();
        assert!(config.permissive);
        assert_eq!(config.default_domain, SelectorDomain::SiMessage);

        let mut bad = HashMap::new();
        bad.insert(CheetahString::from("memoizeSubexpressions"), CheetahString::from("yes"));
        assert!(config.update(bad).is_err());
    }

    #[test]
    fn test_get_all_configs_format_string() {
        let config = SelectorConfig::new();
        let json = config.get_all_configs_format_string().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["memoizeSubexpressions"], true);
        assert_eq!(parsed["defaultDomain"], "JMS");
    }
}
