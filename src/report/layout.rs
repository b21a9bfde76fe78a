// Page geometry of the ranking report, in CSS pixels (A4 at 96 dpi).
use crate::error::RenderError;
use serde::Deserialize;
use std::ops::Range;

pub const HEADER_LABELS: [&str; 3] = ["ORD", "ESCOLA", "PERCENTUAL"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub branding_height: f64,
    pub title_line_height: f64,
    /// Space between the title block and the table.
    pub title_gap: f64,
    pub header_row_height: f64,
    pub row_height: f64,
    pub footer_height: f64,
    /// ORD | ESCOLA | PERCENTUAL
    pub columns: [f64; 3],
    pub font_size: f64,
    pub cell_padding: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            width: 794.0,
            height: 1123.0,
            margin: 40.0,
            branding_height: 90.0,
            title_line_height: 22.0,
            title_gap: 14.0,
            header_row_height: 28.0,
            row_height: 24.0,
            footer_height: 20.0,
            columns: [70.0, 494.0, 150.0],
            font_size: 12.0,
            cell_padding: 8.0,
        }
    }
}

impl PageLayout {
    pub fn title_block_height(&self) -> f64 {
        3.0 * self.title_line_height + self.title_gap
    }

    /// Y of the table header row. Only the first page carries the branding
    /// and title blocks.
    pub fn table_top(&self, first_page: bool) -> f64 {
        if first_page {
            self.margin + self.branding_height + self.title_block_height()
        } else {
            self.margin
        }
    }

    pub fn table_bottom(&self) -> f64 {
        self.height - self.margin - self.footer_height
    }

    pub fn table_width(&self) -> f64 {
        self.columns.iter().sum()
    }

    pub fn table_left(&self) -> f64 {
        (self.width - self.table_width()) / 2.0
    }

    /// Body rows that fit below the header row.
    pub fn capacity(&self, first_page: bool) -> usize {
        let room = self.table_bottom() - self.table_top(first_page) - self.header_row_height;
        if room < self.row_height || self.row_height <= 0.0 {
            return 0;
        }
        (room / self.row_height).floor() as usize
    }

    /// Characters of body text that fit in `column` at the layout font size.
    pub fn max_chars(&self, column: usize) -> usize {
        // Average glyph advance of a sans-serif face is about 0.55 em.
        let usable = self.columns[column] - 2.0 * self.cell_padding;
        (usable / (self.font_size * 0.55)).floor().max(1.0) as usize
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.table_width() > self.width - 2.0 * self.margin {
            return Err(RenderError::Layout(format!(
                "table width {} exceeds printable width {}",
                self.table_width(),
                self.width - 2.0 * self.margin
            )));
        }
        if self.capacity(true) == 0 || self.capacity(false) == 0 {
            return Err(RenderError::Layout("page cannot hold a single row".into()));
        }
        Ok(())
    }
}

/// Split `rows` body rows into per-page index ranges.
///
/// Always returns at least one page so an empty ranking still renders its
/// header. Capacities must be non-zero; see [`PageLayout::validate`].
pub fn paginate(rows: usize, layout: &PageLayout) -> Vec<Range<usize>> {
    let first = layout.capacity(true).max(1);
    let rest = layout.capacity(false).max(1);
    let mut pages = vec![0..rows.min(first)];
    let mut start = rows.min(first);
    while start < rows {
        let end = (start + rest).min(rows);
        pages.push(start..end);
        start = end;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacities() {
        let layout = PageLayout::default();
        assert_eq!(layout.table_top(true), 210.0);
        assert_eq!(layout.capacity(true), 34);
        assert_eq!(layout.capacity(false), 41);
        assert!(layout.validate().is_ok());
        assert_eq!(layout.table_left(), 40.0);
    }

    #[test]
    fn pagination_fills_first_page_then_continuations() {
        let layout = PageLayout::default();
        assert_eq!(paginate(0, &layout), vec![0..0]);
        assert_eq!(paginate(34, &layout), vec![0..34]);
        assert_eq!(paginate(35, &layout), vec![0..34, 34..35]);
        assert_eq!(paginate(76, &layout), vec![0..34, 34..75, 75..76]);
    }

    #[test]
    fn rejects_degenerate_layouts() {
        let tiny = PageLayout {
            height: 300.0,
            ..PageLayout::default()
        };
        assert!(matches!(tiny.validate(), Err(RenderError::Layout(_))));

        let wide = PageLayout {
            columns: [100.0, 600.0, 200.0],
            ..PageLayout::default()
        };
        assert!(wide.validate().is_err());
    }

    #[test]
    fn school_column_fits_about_seventy_chars() {
        assert_eq!(PageLayout::default().max_chars(1), 72);
    }
}
