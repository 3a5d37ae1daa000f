/// Selection and scroll state for a grid of cards laid out row by row
pub struct GridState {
    pub selected: Option<usize>,
    /// First visible grid row
    pub scroll_offset: usize,
    pub visible_rows: usize,
    pub columns: usize,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 4,
            columns: 1,
        }
    }
}

impl GridState {
    /// Update the layout after a resize, keeping the selection in view
    pub fn set_layout(&mut self, columns: usize, visible_rows: usize) {
        self.columns = columns.max(1);
        self.visible_rows = visible_rows.max(1);
        if let Some(i) = self.selected {
            self.ensure_visible(i);
        }
    }

    /// Keep the selection valid for a list of `total` cards
    pub fn clamp(&mut self, total: usize) {
        self.selected = match self.selected {
            _ if total == 0 => None,
            Some(i) => Some(i.min(total - 1)),
            None => None,
        };
        if let Some(i) = self.selected {
            self.ensure_visible(i);
        } else {
            self.scroll_offset = 0;
        }
    }

    pub fn select_next(&mut self, total: usize) {
        self.step(total, 1, true);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_down(&mut self, total: usize) {
        self.step(total, self.columns, false);
    }

    pub fn select_up(&mut self) {
        let i = match self.selected {
            Some(i) if i >= self.columns => i - self.columns,
            Some(i) => i,
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        let jump = self.columns * self.visible_rows.saturating_sub(1).max(1);
        self.step(total, jump, true);
    }

    pub fn page_up(&mut self) {
        let jump = self.columns * self.visible_rows.saturating_sub(1).max(1);
        let i = match self.selected {
            Some(i) => i.saturating_sub(jump),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    /// Back to the first card and the top of the grid
    pub fn select_first(&mut self) {
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    /// Range of card indices on screen
    pub fn visible_range(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.scroll_offset * self.columns).min(total);
        let end = (start + self.visible_rows * self.columns).min(total);
        start..end
    }

    fn step(&mut self, total: usize, by: usize, saturate: bool) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            None => 0,
            Some(i) if i + by < total => i + by,
            Some(_) if saturate => total - 1,
            Some(i) => i,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    fn ensure_visible(&mut self, index: usize) {
        let row = index / self.columns;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if self.visible_rows > 0 && row >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = row - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: usize, rows: usize) -> GridState {
        let mut g = GridState::default();
        g.set_layout(columns, rows);
        g
    }

    #[test]
    fn test_first_movement_selects_first_card() {
        let mut g = grid(3, 2);
        g.select_next(10);
        assert_eq!(g.selected, Some(0));
    }

    #[test]
    fn test_vertical_movement_by_columns() {
        let mut g = grid(3, 2);
        g.select_first();
        g.select_down(10);
        assert_eq!(g.selected, Some(3));
        g.select_down(10);
        assert_eq!(g.selected, Some(6));
        assert_eq!(g.scroll_offset, 1);
        g.select_down(10);
        assert_eq!(g.selected, Some(9));
        // no card below 9
        g.select_down(10);
        assert_eq!(g.selected, Some(9));
        g.select_up();
        assert_eq!(g.selected, Some(6));
    }

    #[test]
    fn test_visible_range_follows_scroll() {
        let mut g = grid(3, 2);
        assert_eq!(g.visible_range(10), 0..6);
        g.select_last(10);
        assert_eq!(g.scroll_offset, 2);
        assert_eq!(g.visible_range(10), 6..10);
        g.select_first();
        assert_eq!(g.visible_range(10), 0..6);
    }

    #[test]
    fn test_clamp_after_shorter_results() {
        let mut g = grid(2, 2);
        g.select_last(10);
        g.clamp(3);
        assert_eq!(g.selected, Some(2));
        assert_eq!(g.scroll_offset, 1);
        g.clamp(0);
        assert_eq!(g.selected, None);
    }

    #[test]
    fn test_page_moves() {
        let mut g = grid(2, 3);
        g.select_first();
        g.page_down(20);
        assert_eq!(g.selected, Some(4));
        g.page_up();
        assert_eq!(g.selected, Some(0));
    }
}
