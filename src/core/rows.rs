/// 有效資料列至少需要的儲存格數
pub const MIN_CELLS: usize = 5;

/// 非空、第一格非空且至少五格的資料列才會被正規化
pub fn is_valid(row: &[String]) -> bool {
    match row.first() {
        Some(first) => !first.is_empty() && row.len() >= MIN_CELLS,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RawRow;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_valid_row() {
        assert!(is_valid(&row(&["1", "Indicator", "100", "50", "On Track"])));
        assert!(is_valid(&row(&["1", "", "", "", "", "extra"])));
    }

    #[test]
    fn test_invalid_rows() {
        assert!(!is_valid(&row(&[])));
        assert!(!is_valid(&row(&["", "Indicator", "100", "50", "On Track"])));
        assert!(!is_valid(&row(&["1", "Indicator", "100", "50"])));
    }

    #[test]
    fn test_whitespace_first_cell_is_not_empty() {
        assert!(is_valid(&row(&[" ", "a", "b", "c", "d"])));
    }
}
