//! Keyboard edit position in the event-list grid

use serde::{Deserialize, Serialize};

/// Fixed fields of the event list, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Time = 1,
    Track = 2,
    Type = 3,
    Channel = 4,
    Number = 5,
    Value = 6,
    Length = 7,
}

impl Column {
    pub const FIRST: usize = 1;
    pub const LAST: usize = 7;

    pub fn from_number(number: usize) -> Option<Self> {
        match number {
            1 => Some(Self::Time),
            2 => Some(Self::Track),
            3 => Some(Self::Type),
            4 => Some(Self::Channel),
            5 => Some(Self::Number),
            6 => Some(Self::Value),
            7 => Some(Self::Length),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Track => "Track",
            Self::Type => "Type",
            Self::Channel => "Channel",
            Self::Number => "Number",
            Self::Value => "Value",
            Self::Length => "Length",
        }
    }
}

/// Scroll the host must perform so the cursor row is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub first_visible_row: usize,
}

/// Current row/column plus the visible row window it must stay inside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCursor {
    row: usize,
    column: usize,
    first_visible_row: usize,
    visible_rows: usize,
}

impl Default for GridCursor {
    fn default() -> Self {
        Self {
            row: 0,
            column: Column::FIRST,
            first_visible_row: 0,
            visible_rows: 1,
        }
    }
}

impl GridCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn column_kind(&self) -> Option<Column> {
        Column::from_number(self.column)
    }

    pub fn first_visible_row(&self) -> usize {
        self.first_visible_row
    }

    pub fn last_visible_row(&self) -> usize {
        self.first_visible_row + self.visible_rows - 1
    }

    /// Page size in rows
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Report the host's scroll position and how many rows fit on screen
    pub fn set_viewport(&mut self, first_visible_row: usize, visible_rows: usize) {
        self.first_visible_row = first_visible_row;
        self.visible_rows = visible_rows.max(1);
    }

    /// Move to `row` without clamping; rows past the end address steps that
    /// have no data yet.
    pub fn set_row(&mut self, row: usize) -> Option<ScrollRequest> {
        self.row = row;
        if row >= self.first_visible_row && row <= self.last_visible_row() {
            return None;
        }
        self.first_visible_row = row;
        Some(ScrollRequest { first_visible_row: row })
    }

    fn last_row(row_count: usize) -> usize {
        row_count.saturating_sub(1)
    }

    pub fn row_up(&mut self) -> Option<ScrollRequest> {
        self.set_row(self.row.saturating_sub(1))
    }

    pub fn row_down(&mut self, row_count: usize) -> Option<ScrollRequest> {
        self.set_row((self.row + 1).min(Self::last_row(row_count)))
    }

    pub fn page_up(&mut self) -> Option<ScrollRequest> {
        self.set_row(self.row.saturating_sub(self.visible_rows))
    }

    pub fn page_down(&mut self, row_count: usize) -> Option<ScrollRequest> {
        self.set_row((self.row + self.visible_rows).min(Self::last_row(row_count)))
    }

    pub fn go_to_first_row(&mut self) -> Option<ScrollRequest> {
        self.set_row(0)
    }

    pub fn go_to_last_row(&mut self, row_count: usize) -> Option<ScrollRequest> {
        self.set_row(Self::last_row(row_count))
    }

    pub fn column_left(&mut self) {
        self.column = self.column.saturating_sub(1).max(Column::FIRST);
    }

    pub fn column_right(&mut self) {
        self.column = (self.column + 1).min(Column::LAST);
    }

    pub fn go_to_column(&mut self, column: usize) {
        self.column = column.clamp(Column::FIRST, Column::LAST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_navigation_clamps() {
        let mut cursor = GridCursor::new();
        cursor.set_viewport(0, 10);
        cursor.row_up();
        assert_eq!(cursor.row(), 0);

        cursor.go_to_last_row(5);
        assert_eq!(cursor.row(), 4);
        cursor.row_down(5);
        assert_eq!(cursor.row(), 4);

        cursor.go_to_last_row(0);
        assert_eq!(cursor.row(), 0);
    }

    #[test]
    fn test_paging() {
        let mut cursor = GridCursor::new();
        cursor.set_viewport(0, 10);
        assert_eq!(cursor.page_down(100), Some(ScrollRequest { first_visible_row: 10 }));
        assert_eq!(cursor.row(), 10);
        cursor.page_down(15);
        assert_eq!(cursor.row(), 14);
        cursor.page_up();
        assert_eq!(cursor.row(), 4);
        cursor.page_up();
        assert_eq!(cursor.row(), 0);
    }

    #[test]
    fn test_scroll_request_only_when_leaving_view() {
        let mut cursor = GridCursor::new();
        cursor.set_viewport(0, 3);
        assert_eq!(cursor.row_down(10), None);
        assert_eq!(cursor.row_down(10), None);
        assert_eq!(cursor.row_down(10), Some(ScrollRequest { first_visible_row: 3 }));
        assert_eq!(cursor.first_visible_row(), 3);
        assert_eq!(cursor.row_up(), Some(ScrollRequest { first_visible_row: 2 }));
    }

    #[test]
    fn test_column_navigation_clamps() {
        let mut cursor = GridCursor::new();
        cursor.column_left();
        assert_eq!(cursor.column(), 1);
        cursor.go_to_column(42);
        assert_eq!(cursor.column(), 7);
        cursor.column_right();
        assert_eq!(cursor.column(), 7);
        cursor.go_to_column(0);
        assert_eq!(cursor.column_kind(), Some(Column::Time));
    }
}
