use crate::data::model::*;

/// Columns shown in the results table, in display order.
pub const DISPLAY_COLUMNS: [&str; 11] = [
    COL_CODE,
    COL_NAME,
    COL_ADDRESS,
    COL_MUNICIPALITY,
    COL_PROVINCE,
    COL_DISTANCE,
    COL_TIME,
    COL_CENTER_TYPE,
    COL_OWNERSHIP,
    COL_CONCERTED,
    COL_DEPENDENT,
];

pub const EMPTY_TABLE_PLACEHOLDER: &str =
    "La tabla se actualizará cuando haya centros que cumplan los filtros.";

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Set instead of rows when nothing matched.
    pub placeholder: Option<&'static str>,
}

/// Project the rows at `indices` onto [`DISPLAY_COLUMNS`].
pub fn build_table_view(table: &CenterTable, indices: &[usize]) -> TableView {
    let rows: Vec<Vec<String>> = indices
        .iter()
        .filter_map(|&i| table.records.get(i))
        .map(|r| {
            DISPLAY_COLUMNS
                .iter()
                .map(|col| r.cell(col).unwrap_or_default())
                .collect()
        })
        .collect();

    let placeholder = rows.is_empty().then_some(EMPTY_TABLE_PLACEHOLDER);
    TableView {
        columns: DISPLAY_COLUMNS.to_vec(),
        rows,
        placeholder,
    }
}
