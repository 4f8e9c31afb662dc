//! Page geometry for exported tables.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page. The layout is computed up front so it can be inspected and
//! tested without producing a file.

use super::table::TableData;

pub const MARGIN: f32 = 72.0;
pub const TITLE_FONT_SIZE: f32 = 18.0;
pub const TITLE_BLOCK_HEIGHT: f32 = 42.0;
pub const BODY_FONT_SIZE: f32 = 10.0;
pub const ROW_HEIGHT: f32 = 18.0;
pub const HEADER_ROW_HEIGHT: f32 = 26.0;
pub const CELL_PADDING: f32 = 6.0;
pub const GRID_LINE_WIDTH: f32 = 1.0;
/// Horizontal advance of one character as a fraction of the font size.
pub const GLYPH_ADVANCE: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const LIGHT_BLUE: Rgb = Rgb(173, 216, 230);
    pub const GREEN: Rgb = Rgb(0, 128, 0);

    pub fn components(&self) -> [f32; 3] {
        [self.0, self.1, self.2].map(|c| f32::from(c) / 255.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Fill {
        rect: Rect,
        color: Rgb,
    },
    Stroke {
        rect: Rect,
        color: Rgb,
        width: f32,
    },
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Rgb,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Header,
    Record(usize),
    Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub size: PageSize,
    pub rows: Vec<RowKind>,
    pub shapes: Vec<Shape>,
}

impl PageLayout {
    fn new(size: PageSize) -> Self {
        Self {
            size,
            rows: Vec::new(),
            shapes: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_ADVANCE
}

/// Truncates `text` so it fits in `width` points at `size`.
fn fit_text(text: &str, width: f32, size: f32) -> String {
    let max_chars = (width / (size * GLYPH_ADVANCE)).floor().max(0.0) as usize;
    text.chars().take(max_chars).collect()
}

fn column_widths(table: &TableData, available: f32) -> Vec<f32> {
    let mut widths: Vec<f32> = (0..table.column_count())
        .map(|idx| {
            std::iter::once(&table.columns[idx])
                .chain(table.rows.iter().filter_map(|row| row.get(idx)))
                .chain(table.summary.get(idx))
                .map(|cell| text_width(cell, BODY_FONT_SIZE) + 2.0 * CELL_PADDING)
                .fold(0.0_f32, f32::max)
        })
        .collect();
    let natural: f32 = widths.iter().sum();
    if natural > available {
        let factor = available / natural;
        widths.iter_mut().for_each(|width| *width *= factor);
    }
    widths
}

struct Cursor {
    size: PageSize,
    left: f32,
    widths: Vec<f32>,
    pages: Vec<PageLayout>,
    top: f32,
}

impl Cursor {
    fn new(size: PageSize, widths: Vec<f32>) -> Self {
        let table_width: f32 = widths.iter().sum();
        Self {
            size,
            left: (size.width - table_width) / 2.0,
            widths,
            pages: vec![PageLayout::new(size)],
            top: size.height - MARGIN,
        }
    }

    fn page(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn fits(&self, height: f32) -> bool {
        self.top - height >= MARGIN
    }

    fn break_page(&mut self) {
        self.pages.push(PageLayout::new(self.size));
        self.top = self.size.height - MARGIN;
    }

    fn place_title(&mut self, title: &str) {
        let available = self.size.width - 2.0 * MARGIN;
        let text = fit_text(title, available, TITLE_FONT_SIZE);
        let x = (self.size.width - text_width(&text, TITLE_FONT_SIZE)) / 2.0;
        let y = self.top - TITLE_FONT_SIZE;
        let page = self.page();
        page.rows.push(RowKind::Title);
        page.shapes.push(Shape::Text {
            x,
            y,
            size: TITLE_FONT_SIZE,
            font: Font::Bold,
            color: Rgb::BLACK,
            text,
        });
        self.top -= TITLE_BLOCK_HEIGHT;
    }

    fn place_row(&mut self, kind: RowKind, cells: &[String], columns: &[String]) {
        let height = match kind {
            RowKind::Header => HEADER_ROW_HEIGHT,
            _ => ROW_HEIGHT,
        };
        if !self.fits(height) && !self.page().rows.is_empty() {
            self.break_page();
            if kind != RowKind::Header {
                self.place_row(RowKind::Header, columns, columns);
            }
        }

        let bottom = self.top - height;
        let baseline = bottom + (height - BODY_FONT_SIZE) / 2.0 + BODY_FONT_SIZE * 0.2;
        let last_column = self.widths.len().saturating_sub(1);
        let mut x = self.left;
        let mut shapes = Vec::with_capacity(cells.len() * 3);
        for (idx, width) in self.widths.iter().copied().enumerate() {
            let rect = Rect {
                x,
                y: bottom,
                width,
                height,
            };
            let highlighted = kind == RowKind::Summary && idx == last_column;
            let (background, foreground, font) = match kind {
                RowKind::Header => (Rgb::LIGHT_BLUE, Rgb::BLACK, Font::Bold),
                _ if highlighted => (Rgb::GREEN, Rgb::WHITE, Font::Regular),
                _ => (Rgb::WHITE, Rgb::BLACK, Font::Regular),
            };
            shapes.push(Shape::Fill {
                rect,
                color: background,
            });
            shapes.push(Shape::Stroke {
                rect,
                color: Rgb::BLACK,
                width: GRID_LINE_WIDTH,
            });
            let cell = cells.get(idx).map(String::as_str).unwrap_or("");
            if !cell.is_empty() {
                let text = fit_text(cell, width - 2.0 * CELL_PADDING, BODY_FONT_SIZE);
                shapes.push(Shape::Text {
                    x: x + (width - text_width(&text, BODY_FONT_SIZE)) / 2.0,
                    y: baseline,
                    size: BODY_FONT_SIZE,
                    font,
                    color: foreground,
                    text,
                });
            }
            x += width;
        }

        let page = self.page();
        page.rows.push(kind);
        page.shapes.extend(shapes);
        self.top = bottom;
    }
}

/// Lays the table out on as many pages as it needs. The header row is
/// repeated at the top of every continuation page.
pub fn layout(table: &TableData, size: PageSize) -> DocumentLayout {
    let widths = column_widths(table, size.width - 2.0 * MARGIN);
    let mut cursor = Cursor::new(size, widths);

    if let Some(title) = &table.title {
        cursor.place_title(title);
    }
    cursor.place_row(RowKind::Header, &table.columns, &table.columns);
    for (idx, row) in table.rows.iter().enumerate() {
        cursor.place_row(RowKind::Record(idx), row, &table.columns);
    }
    cursor.place_row(RowKind::Summary, &table.summary, &table.columns);

    DocumentLayout {
        pages: cursor.pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::table::prepare_table;
    use crate::ledger::{Ledger, Record, Variant};

    fn ledger_with(count: usize) -> Ledger {
        let mut ledger = Ledger::new(Variant::ElapsedHours);
        for idx in 0..count {
            let client = format!("Client {idx}");
            ledger
                .add_record(Record::hours("05-05-2024", &client, "1").unwrap())
                .unwrap();
        }
        ledger
    }

    #[test]
    fn short_table_fits_one_page() {
        let table = prepare_table(&ledger_with(3));
        let document = layout(&table, PageSize::LETTER);
        assert_eq!(document.pages.len(), 1);
        assert_eq!(
            document.pages[0].rows,
            vec![
                RowKind::Header,
                RowKind::Record(0),
                RowKind::Record(1),
                RowKind::Record(2),
                RowKind::Summary
            ]
        );
    }

    #[test]
    fn long_table_repeats_header_on_each_page() {
        let table = prepare_table(&ledger_with(80));
        let document = layout(&table, PageSize::LETTER);
        assert!(document.pages.len() >= 2);
        for page in &document.pages {
            assert_eq!(page.rows[0], RowKind::Header);
        }
        let records: Vec<usize> = document
            .pages
            .iter()
            .flat_map(|page| page.rows.iter())
            .filter_map(|row| match row {
                RowKind::Record(idx) => Some(*idx),
                _ => None,
            })
            .collect();
        assert_eq!(records, (0..80).collect::<Vec<_>>());
        let last = document.pages.last().unwrap();
        assert_eq!(last.rows.last(), Some(&RowKind::Summary));
    }

    #[test]
    fn shapes_stay_inside_margins() {
        let table = prepare_table(&ledger_with(80));
        let document = layout(&table, PageSize::A4);
        for page in &document.pages {
            for shape in &page.shapes {
                if let Shape::Fill { rect, .. } = shape {
                    assert!(rect.y >= MARGIN - 0.01);
                    assert!(rect.y + rect.height <= page.size.height - MARGIN + 0.01);
                }
            }
        }
    }

    #[test]
    fn summary_total_cell_is_highlighted() {
        let table = prepare_table(&ledger_with(1));
        let document = layout(&table, PageSize::LETTER);
        let fills: Vec<Rgb> = document.pages[0]
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Fill { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(fills.first(), Some(&Rgb::LIGHT_BLUE));
        assert_eq!(fills.last(), Some(&Rgb::GREEN));
        assert_eq!(fills.iter().filter(|c| **c == Rgb::GREEN).count(), 1);
    }

    #[test]
    fn wide_cells_are_truncated_to_column() {
        let mut ledger = Ledger::new(Variant::ElapsedHours);
        let client = "x".repeat(400);
        ledger
            .add_record(Record::hours("05-05-2024", &client, "1").unwrap())
            .unwrap();
        let document = layout(&prepare_table(&ledger), PageSize::LETTER);
        for shape in &document.pages[0].shapes {
            if let Shape::Text { x, text, size, .. } = shape {
                assert!(*x >= MARGIN - 0.01);
                assert!(x + text_width(text, *size) <= PageSize::LETTER.width - MARGIN + 0.01);
            }
        }
    }
}
