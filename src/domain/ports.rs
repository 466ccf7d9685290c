use crate::domain::model::{GoalRecord, Ingested, RawRow, ReportDocument, Template, Upload};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 依序產生原始資料列的來源 (CSV 或試算表)
pub trait RowSource {
    /// 讀取下一列；輸入結束時回傳 `Ok(None)`
    fn next_row(&mut self) -> Result<Option<RawRow>>;
}

/// 將報表轉為可下載的文件位元組
pub trait DocumentRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>>;
}

pub trait Storage: Send + Sync {
    fn read_upload(&self, path: &str) -> impl std::future::Future<Output = Result<Upload>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn title(&self) -> &str;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn format_name(&self) -> &str;
    fn template(&self) -> Template;
    fn max_upload_bytes(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Ingested>;
    async fn transform(&self, records: Vec<GoalRecord>) -> Result<ReportDocument>;
    async fn load(&self, document: ReportDocument) -> Result<String>;
}
