use crate::adapters::pdf::PdfRenderer;
use crate::core::ingest::ingest;
use crate::core::registry::FormatRegistry;
use crate::core::report::ReportBuilder;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{GoalRecord, Ingested, ReportDocument, Template, Upload};
use crate::domain::ports::DocumentRenderer;
use crate::utils::error::{ReportError, Result};
use chrono::NaiveDate;
use std::sync::Arc;

/// 下載檔名固定
pub const REPORT_FILENAME: &str = "progress_report.pdf";

/// 一次報表請求的輸入
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub upload: Upload,
    pub format_name: String,
    pub template: Template,
    pub title: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub dropped_rows: usize,
}

/// 解析格式、檢查大小後擷取記錄
pub fn ingest_upload(
    upload: &Upload,
    format_name: &str,
    registry: &FormatRegistry,
    max_upload_bytes: usize,
) -> Result<Ingested> {
    let layout = registry.resolve(format_name)?;
    if upload.content.len() > max_upload_bytes {
        return Err(ReportError::UploadTooLarge {
            size: upload.content.len(),
            limit: max_upload_bytes,
        });
    }

    let ingested = ingest(upload, upload.extension(), layout)?;
    if ingested.dropped_rows > 0 {
        tracing::warn!(
            "Skipped {} invalid rows in '{}'",
            ingested.dropped_rows,
            upload.original_name
        );
    }
    Ok(ingested)
}

/// 同步產生報表：要嘛得到完整文件，要嘛得到單一錯誤
pub fn generate_report<R: DocumentRenderer>(
    request: &ReportRequest,
    registry: &FormatRegistry,
    renderer: &R,
    generated_on: NaiveDate,
) -> Result<RenderedReport> {
    let ingested = ingest_upload(
        &request.upload,
        &request.format_name,
        registry,
        request.max_upload_bytes,
    )?;

    let document = ReportBuilder::build(
        request.title.as_str(),
        generated_on,
        request.template,
        &ingested.records,
    );
    let bytes = renderer.render(&document)?;

    Ok(RenderedReport {
        filename: REPORT_FILENAME,
        bytes,
        page_count: document.page_count(),
        dropped_rows: ingested.dropped_rows,
    })
}

pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    registry: Arc<FormatRegistry>,
    renderer: PdfRenderer,
    generated_on: NaiveDate,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C, registry: Arc<FormatRegistry>) -> Self {
        Self {
            storage,
            config,
            registry,
            renderer: PdfRenderer::new(),
            generated_on: chrono::Local::now().date_naive(),
        }
    }

    /// 固定報表日期，測試用
    pub fn with_generated_on(mut self, generated_on: NaiveDate) -> Self {
        self.generated_on = generated_on;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<Ingested> {
        tracing::debug!(
            "Reading upload '{}' with format '{}'",
            self.config.input_path(),
            self.config.format_name()
        );
        let upload = self.storage.read_upload(self.config.input_path()).await?;
        ingest_upload(
            &upload,
            self.config.format_name(),
            &self.registry,
            self.config.max_upload_bytes(),
        )
    }

    async fn transform(&self, records: Vec<GoalRecord>) -> Result<ReportDocument> {
        tracing::debug!(
            "Building report with template '{}'",
            self.config.template()
        );
        Ok(ReportBuilder::build(
            self.config.title(),
            self.generated_on,
            self.config.template(),
            &records,
        ))
    }

    async fn load(&self, document: ReportDocument) -> Result<String> {
        let bytes = self.renderer.render(&document)?;

        tracing::debug!("Writing report ({} bytes) to storage", bytes.len());
        self.storage.write_file(REPORT_FILENAME, &bytes).await?;

        Ok(format!("{}/{}", self.config.output_path(), REPORT_FILENAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::UploadStatus;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    const SAMPLE: &str = "Goal,Indicator,Target,Current,Status\n\
                          1,No poverty,100,80,On Track\n\
                          2,Zero hunger,50,20,Behind\n";

    fn request(name: &str, content: &str) -> ReportRequest {
        ReportRequest {
            upload: Upload::complete(name, content.as_bytes().to_vec()),
            format_name: "standard".to_string(),
            template: Template::Basic,
            title: "Goal Progress Report".to_string(),
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    struct CountingRenderer;

    impl DocumentRenderer for CountingRenderer {
        fn render(&self, document: &ReportDocument) -> Result<Vec<u8>> {
            Ok(vec![document.page_count() as u8])
        }
    }

    #[test]
    fn test_generate_report() {
        let registry = FormatRegistry::with_defaults();
        let report =
            generate_report(&request("goals.csv", SAMPLE), &registry, &CountingRenderer, date())
                .unwrap();

        assert_eq!(report.filename, "progress_report.pdf");
        assert_eq!(report.page_count, 3);
        assert_eq!(report.bytes, vec![3]);
        assert_eq!(report.dropped_rows, 0);
    }

    #[test]
    fn test_generate_report_unknown_format() {
        let registry = FormatRegistry::with_defaults();
        let mut req = request("goals.csv", SAMPLE);
        req.format_name = "legacy".to_string();

        let err = generate_report(&req, &registry, &CountingRenderer, date()).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedDataFormat { .. }));
    }

    #[test]
    fn test_generate_report_rejects_text_file() {
        let registry = FormatRegistry::with_defaults();
        let err = generate_report(
            &request("notes.txt", SAMPLE),
            &registry,
            &CountingRenderer,
            date(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFileType { .. }));
    }

    #[test]
    fn test_generate_report_size_limit() {
        let registry = FormatRegistry::with_defaults();
        let mut req = request("goals.csv", SAMPLE);
        req.max_upload_bytes = 10;

        let err = generate_report(&req, &registry, &CountingRenderer, date()).unwrap_err();
        assert!(matches!(err, ReportError::UploadTooLarge { limit: 10, .. }));
    }

    #[derive(Default)]
    struct MockStorage {
        uploads: HashMap<String, Upload>,
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Storage for MockStorage {
        async fn read_upload(&self, path: &str) -> Result<Upload> {
            Ok(self.uploads.get(path).cloned().unwrap_or(Upload {
                original_name: path.to_string(),
                content: Vec::new(),
                status: UploadStatus::Missing,
            }))
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        format_name: String,
    }

    impl ConfigProvider for MockConfig {
        fn title(&self) -> &str {
            "Test Report"
        }

        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn format_name(&self) -> &str {
            &self.format_name
        }

        fn template(&self) -> Template {
            Template::Executive
        }

        fn max_upload_bytes(&self) -> usize {
            1024
        }
    }

    fn pipeline(input_path: &str) -> ReportPipeline<MockStorage, MockConfig> {
        let mut storage = MockStorage::default();
        storage.uploads.insert(
            "goals.csv".to_string(),
            Upload::complete("goals.csv", SAMPLE.as_bytes().to_vec()),
        );
        let config = MockConfig {
            input_path: input_path.to_string(),
            format_name: "standard".to_string(),
        };
        ReportPipeline::new(storage, config, Arc::new(FormatRegistry::with_defaults()))
            .with_generated_on(date())
    }

    #[tokio::test]
    async fn test_pipeline_extract_transform_load() {
        let pipeline = pipeline("goals.csv");

        let ingested = pipeline.extract().await.unwrap();
        assert_eq!(ingested.records.len(), 2);

        let document = pipeline.transform(ingested.records).await.unwrap();
        assert_eq!(document.page_count(), 3);
        assert_eq!(document.title(), "Test Report");
        assert_eq!(document.template(), Template::Executive);

        let output = pipeline.load(document).await.unwrap();
        assert_eq!(output, "test_output/progress_report.pdf");

        let files = pipeline.storage.files.lock().await;
        let pdf = files.get(REPORT_FILENAME).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_pipeline_missing_upload() {
        let pipeline = pipeline("missing.csv");
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ReportError::UploadInvalid { .. }));
    }
}
