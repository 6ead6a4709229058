use std::cmp;
use std::ops::Range;

/// Visible window over the rows of a snapshot.
///
/// Rows take a variable number of terminal lines, so methods that decide what
/// fits take the per-row line heights of the current rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Top row index (0-based)
    pub top: usize,
    /// Number of terminal lines available
    pub height: usize,
    /// Highlighted row (absolute index)
    pub cursor: usize,
    /// Total number of rows
    pub total_rows: usize,
}

impl Viewport {
    pub fn new(height: usize, total_rows: usize) -> Self {
        Self {
            top: 0,
            height,
            cursor: 0,
            total_rows,
        }
    }

    /// Rows that fit starting from `top`
    pub fn visible_range(&self, heights: &[usize]) -> Range<usize> {
        let start = cmp::min(self.top, self.total_rows);
        let mut used = 0;
        let mut end = start;
        while end < self.total_rows {
            let h = heights.get(end).copied().unwrap_or(1).max(1);
            if used + h > self.height && end > start {
                break;
            }
            used += h;
            end += 1;
        }
        start..end
    }

    pub fn cursor_up(&mut self, heights: &[usize]) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.follow(heights);
        }
    }

    pub fn cursor_down(&mut self, heights: &[usize]) {
        if self.cursor + 1 < self.total_rows {
            self.cursor += 1;
            self.follow(heights);
        }
    }

    /// Move the cursor by a page of rows
    pub fn page_up(&mut self, heights: &[usize]) {
        let page = self.visible_range(heights).len().max(1);
        self.cursor = self.cursor.saturating_sub(page);
        self.follow(heights);
    }

    pub fn page_down(&mut self, heights: &[usize]) {
        let page = self.visible_range(heights).len().max(1);
        self.cursor = cmp::min(self.cursor + page, self.total_rows.saturating_sub(1));
        self.follow(heights);
    }

    pub fn jump_to(&mut self, row_idx: usize, heights: &[usize]) {
        self.cursor = cmp::min(row_idx, self.total_rows.saturating_sub(1));
        self.follow(heights);
    }

    pub fn jump_to_top(&mut self) {
        self.cursor = 0;
        self.top = 0;
    }

    pub fn jump_to_bottom(&mut self, heights: &[usize]) {
        self.cursor = self.total_rows.saturating_sub(1);
        self.follow(heights);
    }

    /// Scroll the least amount that brings the cursor row fully into view
    pub fn follow(&mut self, heights: &[usize]) {
        if self.cursor < self.top {
            self.top = self.cursor;
            return;
        }
        let height_of = |i: usize| heights.get(i).copied().unwrap_or(1).max(1);
        let mut used: usize = (self.top..=self.cursor).map(height_of).sum();
        while used > self.height && self.top < self.cursor {
            used -= height_of(self.top);
            self.top += 1;
        }
    }

    /// Adopt a new snapshot size and cursor after a refresh
    pub fn reset(&mut self, total_rows: usize, cursor: usize, heights: &[usize]) {
        self.total_rows = total_rows;
        self.top = cmp::min(self.top, total_rows.saturating_sub(1));
        self.cursor = cmp::min(cursor, total_rows.saturating_sub(1));
        self.follow(heights);
    }

    pub fn resize(&mut self, height: usize, heights: &[usize]) {
        self.height = height;
        self.follow(heights);
    }
}
