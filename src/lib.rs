pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, ReportSettings};

pub use adapters::pdf::PdfRenderer;
pub use crate::core::engine::ReportEngine;
pub use crate::core::pipeline::{generate_report, ReportPipeline, ReportRequest, REPORT_FILENAME};
pub use crate::core::registry::FormatRegistry;
pub use utils::error::{ReportError, Result};
