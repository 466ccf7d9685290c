use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{ReportError, Result};

/// 原始資料列：每個儲存格一個字串
pub type RawRow = Vec<String>;

/// 一筆目標的正規化資料，建立後不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub goal_number: String,
    pub indicator: String,
    pub target_value: f64,
    pub current_value: f64,
    pub progress_status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    GoalNumber,
    Indicator,
    TargetValue,
    CurrentValue,
    ProgressStatus,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::GoalNumber,
        Field::Indicator,
        Field::TargetValue,
        Field::CurrentValue,
        Field::ProgressStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::GoalNumber => "goal_number",
            Field::Indicator => "indicator",
            Field::TargetValue => "target_value",
            Field::CurrentValue => "current_value",
            Field::ProgressStatus => "progress_status",
        }
    }
}

/// 欄位位置設定：五個語意欄位各自對應一個來源欄位索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub goal_number: usize,
    pub indicator: usize,
    pub target_value: usize,
    pub current_value: usize,
    pub progress_status: usize,
}

impl Layout {
    pub const STANDARD: Layout = Layout {
        goal_number: 0,
        indicator: 1,
        target_value: 2,
        current_value: 3,
        progress_status: 4,
    };

    /// 建立並檢查欄位位置不重複
    pub fn new(
        goal_number: usize,
        indicator: usize,
        target_value: usize,
        current_value: usize,
        progress_status: usize,
    ) -> Result<Self> {
        let layout = Layout {
            goal_number,
            indicator,
            target_value,
            current_value,
            progress_status,
        };
        layout.check()?;
        Ok(layout)
    }

    pub fn check(&self) -> Result<()> {
        for (i, a) in Field::ALL.iter().enumerate() {
            for b in &Field::ALL[i + 1..] {
                if self.position(*a) == self.position(*b) {
                    return Err(ReportError::InvalidLayout {
                        message: format!(
                            "'{}' and '{}' both use column {}",
                            a.name(),
                            b.name(),
                            self.position(*a)
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn position(&self, field: Field) -> usize {
        match field {
            Field::GoalNumber => self.goal_number,
            Field::Indicator => self.indicator,
            Field::TargetValue => self.target_value,
            Field::CurrentValue => self.current_value,
            Field::ProgressStatus => self.progress_status,
        }
    }

    /// 可正規化的資料列至少需要的長度
    pub fn min_row_len(&self) -> usize {
        Field::ALL
            .iter()
            .map(|f| self.position(*f))
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Xls,
    Xlsx,
}

impl FileType {
    /// 依副檔名判斷，大小寫不敏感，不檢查內容
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileType::Csv),
            "xls" => Ok(FileType::Xls),
            "xlsx" => Ok(FileType::Xlsx),
            _ => Err(ReportError::UnsupportedFileType {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        !matches!(self, FileType::Csv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Complete,
    Partial,
    Missing,
}

/// 上傳的檔案內容與原始檔名
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub content: Vec<u8>,
    pub status: UploadStatus,
}

impl Upload {
    pub fn complete(original_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            content,
            status: UploadStatus::Complete,
        }
    }

    pub fn extension(&self) -> &str {
        std::path::Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Basic,
    Detailed,
    Executive,
}

impl Template {
    pub fn as_str(self) -> &'static str {
        match self {
            Template::Basic => "basic",
            Template::Detailed => "detailed",
            Template::Executive => "executive",
        }
    }
}

impl FromStr for Template {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Template::Basic),
            "detailed" => Ok(Template::Detailed),
            "executive" => Ok(Template::Executive),
            _ => Err(ReportError::UnsupportedTemplate {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub percent: f64,
    pub band: Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// 頁面元素；位置由渲染器依序以游標排列
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Title {
        text: String,
        size: f32,
    },
    Text {
        text: String,
        size: f32,
    },
    HeaderCell {
        text: String,
        height: f32,
        fill: Rgb,
    },
    Paragraph {
        text: String,
        size: f32,
        line_height: f32,
    },
    LabelValue {
        label: String,
        value: String,
        height: f32,
    },
    ProgressBar {
        /// 0.0..=1.0
        fraction: f64,
        label: String,
        height: f32,
        fill: Rgb,
    },
}

/// 元素加上其後固定的垂直間距 (mm)
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub element: Element,
    pub spacing_after: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

/// 完成後的報表：一頁封面加上每筆記錄一頁
#[derive(Debug, Clone)]
pub struct ReportDocument {
    title: String,
    generated_on: NaiveDate,
    template: Template,
    setup: PageSetup,
    pages: Vec<Page>,
}

impl ReportDocument {
    pub(crate) fn new(
        title: String,
        generated_on: NaiveDate,
        template: Template,
        setup: PageSetup,
        pages: Vec<Page>,
    ) -> Self {
        Self {
            title,
            generated_on,
            template,
            setup,
            pages,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn generated_on(&self) -> NaiveDate {
        self.generated_on
    }

    pub fn template(&self) -> Template {
        self.template
    }

    pub fn setup(&self) -> PageSetup {
        self.setup
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// 擷取結果：有效記錄與被略過的列數
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records: Vec<GoalRecord>,
    pub dropped_rows: usize,
}
