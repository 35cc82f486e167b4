use crate::report::{AgentTotals, SummaryRow, UnlockTotals};
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, CellAlignment,
    ContentArrangement, Table,
};

/// Builder for consistently styled summary tables
#[derive(Clone)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();

        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);

        Self { table }
    }

    /// Set bold table headers
    pub fn headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| {
                Cell::new(h.into())
                    .add_attribute(Attribute::Bold)
                    .set_alignment(CellAlignment::Center)
            })
            .collect();

        self.table.set_header(header_cells);
        self
    }

    /// Add a row; every cell after the first is right-aligned
    pub fn numeric_row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row_cells: Vec<Cell> = cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                let cell = Cell::new(cell.into());
                if i == 0 {
                    cell
                } else {
                    cell.set_alignment(CellAlignment::Right)
                }
            })
            .collect();

        self.table.add_row(row_cells);
        self
    }

    pub fn build(self) -> String {
        self.table.to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render summary rows with a leading 1-based rank column
pub fn summary_table<T: SummaryRow>(rows: &[T]) -> String {
    let mut builder = TableBuilder::new();
    builder.headers(std::iter::once("#").chain(T::COLUMNS.iter().copied()));

    for (rank, row) in rows.iter().enumerate() {
        let mut cells = vec![(rank + 1).to_string()];
        cells.extend(row.cells().into_iter().enumerate().map(|(i, cell)| {
            // Username stays as is, counts get thousands grouping
            if i == 0 {
                cell
            } else {
                cell.parse::<u64>().map(format_number).unwrap_or(cell)
            }
        }));
        builder.numeric_row(cells);
    }

    builder.build()
}

/// Group digits by thousands with a space: `1234567` -> `1 234 567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    grouped
}

/// Label/value lines shown beside the unlock summary
pub fn unlock_totals_lines(totals: &UnlockTotals) -> Vec<(String, String)> {
    vec![
        ("Unlocked".to_string(), format_number(totals.unlock)),
        ("Reset".to_string(), format_number(totals.reset_only)),
        ("Total".to_string(), format_number(totals.total)),
    ]
}

/// Label/value lines shown beside the agent summary
pub fn agent_totals_lines(totals: &AgentTotals) -> Vec<(String, String)> {
    vec![
        ("Approved".to_string(), format_number(totals.approved)),
        ("Rejected".to_string(), format_number(totals.rejected)),
        ("Total".to_string(), format_number(totals.processed())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::UnlockSummaryRow;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1 000");
        assert_eq!(format_number(12345), "12 345");
        assert_eq!(format_number(1234567), "1 234 567");
    }

    #[test]
    fn test_summary_table_has_rank_and_columns() {
        let rows = vec![
            UnlockSummaryRow {
                username: "WEBC_JOHN".to_string(),
                unlock: 1500,
                reset_only: 2,
                unauth: 0,
                total: 1502,
            },
            UnlockSummaryRow {
                username: "WEBC_JANE".to_string(),
                unlock: 1,
                reset_only: 0,
                unauth: 4,
                total: 1,
            },
        ];

        let rendered = summary_table(&rows);
        assert!(rendered.contains("RESET_ONLY"));
        assert!(rendered.contains("1 502"));
        assert!(rendered.contains("WEBC_JANE"));

        let john = rendered.lines().position(|l| l.contains("WEBC_JOHN")).unwrap();
        let jane = rendered.lines().position(|l| l.contains("WEBC_JANE")).unwrap();
        assert!(john < jane);
    }

    #[test]
    fn test_agent_totals_lines() {
        let totals = AgentTotals {
            approved: 1200,
            rejected: 30,
            lock_account: 4,
        };
        let lines = agent_totals_lines(&totals);
        assert_eq!(lines[2], ("Total".to_string(), "1 230".to_string()));
    }
}
