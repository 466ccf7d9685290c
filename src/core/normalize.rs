use crate::domain::model::{Field, GoalRecord, Layout};

/// 依欄位配置將原始列轉為 GoalRecord；數值無法解析時視為 0.0
///
/// 呼叫前列應已通過 `rows::is_valid`，且長度不小於 `layout.min_row_len()`。
pub fn normalize(row: &[String], layout: &Layout) -> GoalRecord {
    GoalRecord {
        goal_number: cell(row, layout, Field::GoalNumber).to_string(),
        indicator: cell(row, layout, Field::Indicator).to_string(),
        target_value: parse_number(cell(row, layout, Field::TargetValue)),
        current_value: parse_number(cell(row, layout, Field::CurrentValue)),
        progress_status: cell(row, layout, Field::ProgressStatus).to_string(),
    }
}

fn cell<'a>(row: &'a [String], layout: &Layout, field: Field) -> &'a str {
    row.get(layout.position(field))
        .map(String::as_str)
        .unwrap_or("")
}

/// 寬鬆數值解析：NaN 與無限大也歸零
pub fn parse_number(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
