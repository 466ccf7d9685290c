pub mod engine;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod registry;
pub mod report;
pub mod rows;

pub use crate::domain::model::{GoalRecord, Ingested, ReportDocument};
pub use crate::domain::ports::{ConfigProvider, DocumentRenderer, Pipeline, RowSource, Storage};
pub use crate::utils::error::Result;
