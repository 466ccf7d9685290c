pub mod cli;
pub mod toml_config;

use crate::core::registry::STANDARD_FORMAT;
use crate::core::ConfigProvider;
use crate::domain::model::Template;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_TITLE: &str = "Goal Progress Report";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// 合併 TOML 與命令列後的最終設定
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub title: String,
    pub input_path: String,
    pub output_path: String,
    pub format_name: String,
    pub template: Template,
    pub max_upload_bytes: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            input_path: String::new(),
            output_path: "./output".to_string(),
            format_name: STANDARD_FORMAT.to_string(),
            template: Template::Basic,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ConfigProvider for ReportSettings {
    fn title(&self) -> &str {
        &self.title
    }

    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn format_name(&self) -> &str {
        &self.format_name
    }

    fn template(&self) -> Template {
        self.template
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Validate for ReportSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_file_extension("input", &self.input_path, &SUPPORTED_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("title", &self.title)?;
        validation::validate_non_empty_string("format", &self.format_name)?;
        validation::validate_positive_number("max_upload_bytes", self.max_upload_bytes, 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::toml_config::TomlConfig;
    use super::ReportSettings;
    use crate::utils::error::Result;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "goal-report")]
    #[command(about = "Render a PDF progress report from a CSV or Excel goal sheet")]
    pub struct CliConfig {
        /// CSV, XLS or XLSX file with one header row followed by goal rows
        #[arg(short, long)]
        pub input: String,

        /// Logical data format (column layout)
        #[arg(short, long)]
        pub format: Option<String>,

        /// Report template: basic, detailed or executive
        #[arg(short, long)]
        pub template: Option<String>,

        #[arg(long)]
        pub title: Option<String>,

        #[arg(short, long)]
        pub output_path: Option<String>,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log phase memory usage and timing")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        /// Print the normalized records as JSON without rendering
        #[arg(long)]
        pub dry_run: bool,
    }

    impl CliConfig {
        /// 預設值 <- TOML <- 命令列
        pub fn settings(&self, toml: Option<&TomlConfig>) -> Result<ReportSettings> {
            let mut settings = ReportSettings::default();
            if let Some(toml) = toml {
                toml.apply_to(&mut settings)?;
            }

            settings.input_path = self.input.clone();
            if let Some(title) = &self.title {
                settings.title = title.clone();
            }
            if let Some(path) = &self.output_path {
                settings.output_path = path.clone();
            }
            if let Some(format) = &self.format {
                settings.format_name = format.clone();
            }
            if let Some(template) = &self.template {
                settings.template = template.parse()?;
            }
            Ok(settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_need_input() {
        let settings = ReportSettings::default();
        assert!(settings.validate().is_err());

        let settings = ReportSettings {
            input_path: "goals.xlsx".to_string(),
            ..ReportSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_reject_unsupported_input() {
        let settings = ReportSettings {
            input_path: "goals.pdf".to_string(),
            ..ReportSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_toml() {
        use crate::config::toml_config::TomlConfig;
        use clap::Parser;

        let toml = TomlConfig::from_toml_str(
            "[report]\ntitle = \"From TOML\"\ntemplate = \"detailed\"\noutput_path = \"./toml-out\"\n",
        )
        .unwrap();
        let cli = CliConfig::parse_from([
            "goal-report",
            "--input",
            "goals.csv",
            "--template",
            "executive",
        ]);

        let settings = cli.settings(Some(&toml)).unwrap();
        assert_eq!(settings.title, "From TOML");
        assert_eq!(settings.output_path, "./toml-out");
        assert_eq!(settings.template, Template::Executive);
        assert_eq!(settings.input_path, "goals.csv");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_rejects_unknown_template() {
        use clap::Parser;

        let cli = CliConfig::parse_from(["goal-report", "-i", "goals.csv", "-t", "glossy"]);
        assert!(cli.settings(None).is_err());
    }
}
