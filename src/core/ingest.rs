use crate::core::{normalize, rows};
use crate::domain::model::{FileType, Ingested, Layout, RawRow, Upload, UploadStatus};
use crate::domain::ports::RowSource;
use crate::utils::error::{ReportError, Result};
use calamine::{Data, Reader, Xls, Xlsx};
use std::fmt::Display;
use std::io::{Cursor, Read, Seek};

/// 逐行讀取 CSV，不一次載入整份檔案
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
}

impl<R: Read> CsvRowSource<R> {
    pub fn new(input: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        Self {
            reader,
            record: csv::StringRecord::new(),
        }
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<RawRow>> {
        if self.reader.read_record(&mut self.record)? {
            Ok(Some(self.record.iter().map(str::to_string).collect()))
        } else {
            Ok(None)
        }
    }
}

/// 試算表需整份解析，只讀第一個工作表
pub struct SpreadsheetRowSource {
    rows: std::vec::IntoIter<RawRow>,
}

impl SpreadsheetRowSource {
    pub fn open(content: &[u8], file_type: FileType) -> Result<Self> {
        let cursor = Cursor::new(content);
        let rows = match file_type {
            FileType::Xlsx => first_sheet_rows::<Xlsx<_>, _>(cursor)?,
            FileType::Xls => first_sheet_rows::<Xls<_>, _>(cursor)?,
            FileType::Csv => {
                return Err(ReportError::ReadError {
                    message: "CSV content cannot be opened as a spreadsheet".to_string(),
                })
            }
        };
        tracing::debug!("Spreadsheet parsed: {} rows in first sheet", rows.len());
        Ok(Self {
            rows: rows.into_iter(),
        })
    }
}

impl RowSource for SpreadsheetRowSource {
    fn next_row(&mut self) -> Result<Option<RawRow>> {
        Ok(self.rows.next())
    }
}

fn first_sheet_rows<W, RS>(input: RS) -> Result<Vec<RawRow>>
where
    RS: Read + Seek,
    W: Reader<RS>,
    W::Error: Display,
{
    let mut workbook = W::new(input).map_err(read_error)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(read_error)?,
        None => return Ok(Vec::new()),
    };

    // range 從第一個有值的儲存格開始；補回左側空欄，欄位位置以 A 欄為 0
    let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    Ok(range
        .rows()
        .map(|row| {
            let mut cells = vec![String::new(); leading];
            cells.extend(row.iter().map(cell_to_string));
            cells
        })
        .collect())
}

fn read_error<E: Display>(err: E) -> ReportError {
    ReportError::ReadError {
        message: err.to_string(),
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// 依副檔名選擇讀取器
pub fn open_source<'a>(content: &'a [u8], file_type: FileType) -> Result<Box<dyn RowSource + 'a>> {
    if file_type.is_spreadsheet() {
        Ok(Box::new(SpreadsheetRowSource::open(content, file_type)?))
    } else {
        Ok(Box::new(CsvRowSource::new(content)))
    }
}

/// 檢查上傳是否為完整的檔案傳輸
pub fn check_upload(upload: &Upload) -> Result<()> {
    let reason = match upload.status {
        UploadStatus::Complete if upload.original_name.trim().is_empty() => {
            "missing original filename"
        }
        UploadStatus::Complete => return Ok(()),
        UploadStatus::Partial => "transfer was interrupted",
        UploadStatus::Missing => "no file was received",
    };
    Err(ReportError::UploadInvalid {
        reason: reason.to_string(),
    })
}

/// 讀取上傳檔案並產生 GoalRecord；第一列固定視為標題列捨棄
///
/// 空白行由讀取器略過，不算作標題列。
pub fn ingest(upload: &Upload, declared_extension: &str, layout: &Layout) -> Result<Ingested> {
    let file_type = FileType::from_extension(declared_extension)?;
    check_upload(upload)?;

    tracing::debug!(
        "Ingesting '{}' ({} bytes) as {:?}",
        upload.original_name,
        upload.content.len(),
        file_type
    );

    let mut source = open_source(&upload.content, file_type)?;
    collect_records(source.as_mut(), layout)
}

/// 列須通過 `rows::is_valid`，且長度涵蓋配置使用的最大欄位
pub fn collect_records(source: &mut dyn RowSource, layout: &Layout) -> Result<Ingested> {
    let mut ingested = Ingested::default();
    let min_len = layout.min_row_len();

    if source.next_row()?.is_none() {
        return Ok(ingested);
    }

    let mut line = 1usize;
    while let Some(row) = source.next_row()? {
        line += 1;
        if rows::is_valid(&row) && row.len() >= min_len {
            ingested.records.push(normalize::normalize(&row, layout));
        } else {
            tracing::debug!("Skipping invalid row {} ({} cells)", line, row.len());
            ingested.dropped_rows += 1;
        }
    }

    Ok(ingested)
}
