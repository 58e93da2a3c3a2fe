use crate::core::ConfigProvider;
use crate::domain::model::{CustomerDefaults, FieldNames, ImportProfile};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "customer-import.toml";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub repository: RepositoryConfig,
    pub profiles: Option<HashMap<String, ProfileConfig>>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    #[default]
    Http,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(rename = "type", default)]
    pub kind: RepositoryKind,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

impl RepositoryConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub website_id: Option<u32>,
    pub group_id: Option<u32>,
    pub fields: Option<FieldNames>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl ImportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ImportError::config(format!(
                "cannot read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 預設路徑的檔案不存在時使用內建預設值；明確指定的路徑必須存在
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(explicit) => Self::from_file(explicit),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => {
                tracing::debug!(
                    "No {} found, using built-in defaults",
                    DEFAULT_CONFIG_PATH
                );
                Ok(Self::default())
            }
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| ImportError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${STORE_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ImportError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .profiles
            .as_ref()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl ConfigProvider for ImportConfig {
    fn profile(&self, name: &str) -> Result<ImportProfile> {
        let profiles = match &self.profiles {
            Some(profiles) if !profiles.is_empty() => profiles,
            _ => {
                return Ok(ImportProfile {
                    name: name.to_string(),
                    ..ImportProfile::default()
                })
            }
        };

        let profile = profiles
            .get(name)
            .ok_or_else(|| ImportError::UnknownProfile {
                name: name.to_string(),
                available: self.profile_names().join(", "),
            })?;

        let defaults = CustomerDefaults::default();
        Ok(ImportProfile {
            name: name.to_string(),
            defaults: CustomerDefaults {
                website_id: profile.website_id.unwrap_or(defaults.website_id),
                group_id: profile.group_id.unwrap_or(defaults.group_id),
            },
            fields: profile.fields.clone().unwrap_or_default(),
        })
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.repository.endpoint {
            validate_url("repository.endpoint", endpoint)?;
        }
        validate_positive_number("repository.timeout_seconds", self.repository.timeout_seconds(), 1)?;

        for (name, profile) in self.profiles.iter().flatten() {
            if let Some(website_id) = profile.website_id {
                validate_positive_number(&format!("profiles.{}.website_id", name), website_id, 1)?;
            }
            if let Some(group_id) = profile.group_id {
                validate_positive_number(&format!("profiles.{}.group_id", name), group_id, 1)?;
            }
            if let Some(fields) = &profile.fields {
                validate_non_empty_string(&format!("profiles.{}.fields.email", name), &fields.email)?;
                validate_non_empty_string(
                    &format!("profiles.{}.fields.first_name", name),
                    &fields.first_name,
                )?;
                validate_non_empty_string(
                    &format!("profiles.{}.fields.last_name", name),
                    &fields.last_name,
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
[repository]
type = "http"
endpoint = "https://store.example.com/api"
timeout_seconds = 10

[repository.headers]
Authorization = "Bearer abc"

[profiles.default]

[profiles.wholesale]
website_id = 2
group_id = 4

[profiles.wholesale.fields]
email = "mail"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = ImportConfig::from_toml_str(FULL_CONFIG).unwrap();

        assert_eq!(config.repository.kind, RepositoryKind::Http);
        assert_eq!(config.repository.timeout_seconds(), 10);
        assert_eq!(
            config.repository.headers.as_ref().unwrap()["Authorization"],
            "Bearer abc"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_resolution() {
        let config = ImportConfig::from_toml_str(FULL_CONFIG).unwrap();

        let default = config.profile("default").unwrap();
        assert_eq!(default.defaults, CustomerDefaults::default());
        assert_eq!(default.fields, FieldNames::default());

        let wholesale = config.profile("wholesale").unwrap();
        assert_eq!(wholesale.defaults.website_id, 2);
        assert_eq!(wholesale.defaults.group_id, 4);
        assert_eq!(wholesale.fields.email, "mail");
        assert_eq!(wholesale.fields.first_name, "fname");
    }

    #[test]
    fn test_unknown_profile() {
        let config = ImportConfig::from_toml_str(FULL_CONFIG).unwrap();
        match config.profile("retail") {
            Err(ImportError::UnknownProfile { name, available }) => {
                assert_eq!(name, "retail");
                assert_eq!(available, "default, wholesale");
            }
            other => panic!("expected UnknownProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_no_profiles_falls_back_to_defaults() {
        let config = ImportConfig::default();
        let profile = config.profile("anything").unwrap();
        assert_eq!(profile.name, "anything");
        assert_eq!(profile.defaults.website_id, 1);
        assert_eq!(profile.defaults.group_id, 1);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CUSTOMER_IMPORT_TEST_ENDPOINT", "https://env.example.com");

        let config = ImportConfig::from_toml_str(
            r#"
[repository]
endpoint = "${CUSTOMER_IMPORT_TEST_ENDPOINT}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.repository.endpoint.as_deref(),
            Some("https://env.example.com")
        );

        std::env::remove_var("CUSTOMER_IMPORT_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = ImportConfig::from_toml_str(
            r#"
[repository]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_ids = ImportConfig::from_toml_str(
            r#"
[profiles.default]
website_id = 0
"#,
        )
        .unwrap();
        assert!(bad_ids.validate().is_err());

        let blank_field = ImportConfig::from_toml_str(
            r#"
[profiles.default.fields]
email = " "
"#,
        )
        .unwrap();
        assert!(blank_field.validate().is_err());
    }

    #[test]
    fn test_memory_repository_kind() {
        let config = ImportConfig::from_toml_str(
            r#"
[repository]
type = "memory"
"#,
        )
        .unwrap();
        assert_eq!(config.repository.kind, RepositoryKind::Memory);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = ImportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.profile_names(), vec!["default", "wholesale"]);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        assert!(ImportConfig::load(Some("/nonexistent/customer-import.toml")).is_err());
    }
}
