use crate::floating::{BoundingBox, Geometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    HEADER,
    DATA,
    FLOATING,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    VISIBLE,
    HIDDEN,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: String,
    pub width: usize,
}

impl Cell {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let width = content.chars().count();
        Cell { content, width }
    }

    fn render(&self) -> String {
        let clipped: String = self.content.chars().take(self.width).collect();
        format!("{clipped:<width$}", width = self.width)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub visibility: Visibility,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn header(cells: Vec<Cell>) -> Self {
        Row {
            kind: RowKind::HEADER,
            visibility: Visibility::VISIBLE,
            cells,
        }
    }

    pub fn data(cells: Vec<Cell>) -> Self {
        Row {
            kind: RowKind::DATA,
            visibility: Visibility::VISIBLE,
            cells,
        }
    }

    pub fn render(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.render())
            .collect::<Vec<String>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub title: String,
    pub persist: bool,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(title: impl Into<String>, persist: bool) -> Self {
        Table {
            title: title.into(),
            persist,
            rows: Vec::new(),
        }
    }

    pub fn header_idx(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.kind == RowKind::HEADER)
    }

    pub fn floating_idx(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.kind == RowKind::FLOATING)
    }

    // Give every column the width of its widest cell
    pub fn align_columns(&mut self) {
        let ncolumns = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        for column in 0..ncolumns {
            let width = self
                .rows
                .iter()
                .filter_map(|r| r.cells.get(column))
                .map(|c| c.content.chars().count())
                .max()
                .unwrap_or(0);
            for row in self.rows.iter_mut() {
                if let Some(cell) = row.cells.get_mut(column) {
                    cell.width = width;
                }
            }
        }
    }

    fn flow_into(&self, lines: &mut Vec<LineView>) {
        lines.push(LineView {
            content: self.title.clone(),
            kind: LineKind::TITLE,
        });
        for row in &self.rows {
            if row.kind == RowKind::FLOATING {
                continue;
            }
            let content = row.render();
            let width = content.chars().count();
            match row.kind {
                RowKind::HEADER => {
                    lines.push(LineView {
                        content,
                        kind: LineKind::HEADER,
                    });
                    lines.push(LineView {
                        content: "─".repeat(width),
                        kind: LineKind::RULE,
                    });
                }
                _ => lines.push(LineView {
                    content,
                    kind: LineKind::DATA,
                }),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Element {
    Text(Vec<String>),
    Table(Table),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    TEXT,
    TITLE,
    HEADER,
    RULE,
    DATA,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub content: String,
    pub kind: LineKind,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Page {
            title: title.into(),
            elements: Vec::new(),
        }
    }

    // Lay all elements out top to bottom. Floating rows are out of flow and
    // contribute nothing to the returned lines or bounding boxes.
    pub fn flow(&self) -> (Vec<LineView>, Vec<BoundingBox>) {
        let mut lines = Vec::new();
        let mut boxes = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            let top = lines.len();
            match element {
                Element::Text(block) => {
                    lines.extend(block.iter().map(|l| LineView {
                        content: l.clone(),
                        kind: LineKind::TEXT,
                    }));
                }
                Element::Table(table) => table.flow_into(&mut lines),
            }
            boxes.push(BoundingBox {
                top,
                height: lines.len() - top,
            });
        }
        (lines, boxes)
    }

    pub fn demo(tables: usize, rows: usize) -> Page {
        const SERVICES: [&str; 6] = ["auth", "billing", "catalog", "ingest", "search", "mailer"];
        const REGIONS: [&str; 4] = ["eu-west", "us-east", "ap-south", "us-west"];

        let mut page = Page::new("fhv demo");
        page.elements.push(Element::Text(vec![
            "A scrollable page with tables whose header rows keep floating".to_string(),
            "at the top of the viewport while their body is scrolled through.".to_string(),
            "".to_string(),
            "Keys: j/k scroll, f toggles the floating headers, h shows help.".to_string(),
            "".to_string(),
        ]));

        for t in 0..tables {
            page.elements.push(Element::Text(vec![
                "".to_string(),
                format!("Section {}", t + 1),
                "Scroll through the measurements below. While the table body".to_string(),
                "is in view its header stays readable at the top of the page.".to_string(),
                "".to_string(),
            ]));

            // The last of several tables is left static as a counterexample
            let persist = tables < 2 || t + 1 < tables;
            let title = if persist {
                format!("Table {}", t + 1)
            } else {
                format!("Table {} (static)", t + 1)
            };
            let mut table = Table::new(title, persist);
            table.rows.push(Row::header(vec![
                Cell::new("service"),
                Cell::new("region"),
                Cell::new("requests"),
                Cell::new("errors"),
                Cell::new("p99 ms"),
            ]));
            for i in 0..rows {
                table.rows.push(Row::data(vec![
                    Cell::new(SERVICES[(i + t) % SERVICES.len()]),
                    Cell::new(REGIONS[(i * 3 + t) % REGIONS.len()]),
                    Cell::new(format!("{}", 1200 + 37 * i + 101 * t)),
                    Cell::new(format!("{}", (i * (t + 1)) % 17)),
                    Cell::new(format!("{}.{}", 8 + (i % 23), (i * 7) % 10)),
                ]));
            }
            table.align_columns();
            page.elements.push(Element::Table(table));
        }

        page.elements.push(Element::Text(vec![
            "".to_string(),
            "End of the demo page.".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
        ]));
        page
    }
}

// Geometry snapshot of a flowed page at a given scroll position
pub struct PageGeometry {
    boxes: Vec<BoundingBox>,
    scroll_top: usize,
}

impl PageGeometry {
    pub fn of(page: &Page, scroll_top: usize) -> Self {
        let (_lines, boxes) = page.flow();
        PageGeometry { boxes, scroll_top }
    }
}

impl Geometry for PageGeometry {
    fn bounding_box(&self, element: usize) -> Option<BoundingBox> {
        self.boxes.get(element).copied()
    }

    fn scroll_top(&self) -> usize {
        self.scroll_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_row_table() -> Table {
        let mut table = Table::new("t", true);
        table.rows.push(Row::header(vec![
            Cell::new("name"),
            Cell::new("count"),
        ]));
        table.rows.push(Row::data(vec![
            Cell::new("alpha"),
            Cell::new("7"),
        ]));
        table.align_columns();
        table
    }

    #[test]
    fn align_columns_uses_widest_cell() {
        let table = two_row_table();
        assert_eq!(table.rows[0].cells[0].width, 5); // "alpha"
        assert_eq!(table.rows[0].cells[1].width, 5); // "count"
        assert_eq!(table.rows[1].cells[1].width, 5);
    }

    #[test]
    fn row_render_pads_cells_to_width() {
        let table = two_row_table();
        assert_eq!(table.rows[1].render(), "alpha 7    ");
    }

    #[test]
    fn cell_render_clips_to_width() {
        let mut cell = Cell::new("longtext");
        cell.width = 4;
        assert_eq!(cell.render(), "long");
    }

    #[test]
    fn flow_boxes_accumulate_top_offsets() {
        let mut page = Page::new("p");
        page.elements
            .push(Element::Text(vec!["a".to_string(), "b".to_string()]));
        page.elements.push(Element::Table(two_row_table()));
        page.elements.push(Element::Text(vec!["c".to_string()]));

        let (lines, boxes) = page.flow();
        // Table flows as title + header + rule + one data row
        assert_eq!(boxes[0], BoundingBox { top: 0, height: 2 });
        assert_eq!(boxes[1], BoundingBox { top: 2, height: 4 });
        assert_eq!(boxes[2], BoundingBox { top: 6, height: 1 });
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn floating_rows_stay_out_of_flow() {
        let mut page = Page::new("p");
        let mut table = two_row_table();
        let header = table.header_idx().unwrap();
        let mut clone = table.rows[header].clone();
        clone.kind = RowKind::FLOATING;
        table.rows.insert(header, clone);
        page.elements.push(Element::Table(table));

        let (lines, boxes) = page.flow();
        assert_eq!(boxes[0].height, 4);
        assert!(lines.iter().all(|l| l.kind != LineKind::TEXT));
    }

    #[test]
    fn demo_keeps_a_static_counterexample() {
        let page = Page::demo(3, 5);
        let persist: Vec<bool> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Table(t) => Some(t.persist),
                _ => None,
            })
            .collect();
        assert_eq!(persist, vec![true, true, false]);
    }

    #[test]
    fn single_table_demo_persists() {
        let page = Page::demo(1, 3);
        let tables: Vec<&Table> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Table(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].persist);
    }
}
