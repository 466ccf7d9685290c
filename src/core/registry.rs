use crate::domain::model::Layout;
use crate::utils::error::{ReportError, Result};
use std::collections::HashMap;

pub const STANDARD_FORMAT: &str = "standard";

/// 資料格式名稱到欄位配置的對照表；啟動時建立，之後唯讀
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    layouts: HashMap<String, Layout>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 內建 "standard" 格式
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .layouts
            .insert(STANDARD_FORMAT.to_string(), Layout::STANDARD);
        registry
    }

    pub fn register(&mut self, name: &str, layout: Layout) -> Result<()> {
        layout.check()?;
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(ReportError::InvalidConfigValueError {
                field: "formats".to_string(),
                value: name.to_string(),
                reason: "Format name cannot be empty".to_string(),
            });
        }
        if self.layouts.insert(key.clone(), layout).is_some() {
            tracing::debug!("Format '{}' replaced", key);
        }
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&Layout> {
        self.layouts
            .get(&normalize_name(name))
            .ok_or_else(|| ReportError::UnsupportedDataFormat {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_standard() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.resolve("standard").unwrap(), &Layout::STANDARD);
        assert_eq!(registry.resolve(" Standard ").unwrap(), &Layout::STANDARD);
    }

    #[test]
    fn test_resolve_unknown_format() {
        let registry = FormatRegistry::with_defaults();
        let err = registry.resolve("quarterly").unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedDataFormat { name } if name == "quarterly"));
    }

    #[test]
    fn test_register_custom_layout() {
        let mut registry = FormatRegistry::with_defaults();
        let layout = Layout::new(1, 0, 3, 2, 4).unwrap();
        registry.register("Swapped", layout).unwrap();

        assert_eq!(registry.resolve("swapped").unwrap(), &layout);
        assert_eq!(registry.names(), vec!["standard", "swapped"]);
    }

    #[test]
    fn test_register_rejects_invalid_layout() {
        let mut registry = FormatRegistry::new();
        let bad = Layout {
            goal_number: 0,
            indicator: 0,
            target_value: 2,
            current_value: 3,
            progress_status: 4,
        };
        assert!(registry.register("bad", bad).is_err());
        assert!(registry.register("  ", Layout::STANDARD).is_err());
    }
}
