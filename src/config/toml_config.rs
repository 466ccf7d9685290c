use crate::config::ReportSettings;
use crate::core::registry::FormatRegistry;
use crate::domain::model::{Layout, Template};
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub report: ReportSection,
    pub formats: Option<BTreeMap<String, Layout>>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: Option<String>,
    pub output_path: Option<String>,
    pub default_format: Option<String>,
    pub template: Option<String>,
    pub max_upload_mb: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_TITLE})；未設定者保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.report.output_path {
            crate::utils::validation::validate_path("report.output_path", path)?;
        }

        if let Some(title) = &self.report.title {
            crate::utils::validation::validate_non_empty_string("report.title", title)?;
        }

        if let Some(template) = &self.report.template {
            template.parse::<Template>()?;
        }

        if let Some(limit) = self.report.max_upload_mb {
            crate::utils::validation::validate_range("report.max_upload_mb", limit, 1, 1024)?;
        }

        // 自訂格式需可註冊，預設格式需存在
        let registry = self.build_registry()?;
        if let Some(name) = &self.report.default_format {
            registry.resolve(name)?;
        }

        Ok(())
    }

    /// 內建格式加上 `[formats.*]` 自訂格式
    pub fn build_registry(&self) -> Result<FormatRegistry> {
        let mut registry = FormatRegistry::with_defaults();
        if let Some(formats) = &self.formats {
            for (name, layout) in formats {
                registry.register(name, *layout)?;
            }
        }
        Ok(registry)
    }

    /// 以 TOML 值覆蓋預設設定
    pub fn apply_to(&self, settings: &mut ReportSettings) -> Result<()> {
        if let Some(title) = &self.report.title {
            settings.title = title.clone();
        }
        if let Some(path) = &self.report.output_path {
            settings.output_path = path.clone();
        }
        if let Some(format) = &self.report.default_format {
            settings.format_name = format.clone();
        }
        if let Some(template) = &self.report.template {
            settings.template = template.parse()?;
        }
        if let Some(limit) = self.report.max_upload_mb {
            settings.max_upload_bytes = limit * 1024 * 1024;
        }
        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
