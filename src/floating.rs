use tracing::{debug, info, trace};

use crate::page::{Element, Page, RowKind, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top: usize,
    pub height: usize,
}

/// Environment capability the visibility decision is computed against.
/// Keeps the widget independent of how the page is actually laid out.
pub trait Geometry {
    fn bounding_box(&self, element: usize) -> Option<BoundingBox>;
    fn scroll_top(&self) -> usize;
}

// A floating header is shown while the scroll position is strictly inside
// the area, both boundaries exclusive.
pub fn header_visible(scroll_top: usize, bbox: &BoundingBox) -> bool {
    scroll_top > bbox.top && scroll_top < bbox.top + bbox.height
}

/// Mirrors the header row of every persist table with a clone that is shown
/// while the original has scrolled out of view.
pub struct FloatingHeaders {
    areas: Vec<usize>,
}

impl FloatingHeaders {
    pub fn attach(page: &mut Page) -> Self {
        let mut areas = Vec::new();
        for (idx, element) in page.elements.iter_mut().enumerate() {
            let Element::Table(table) = element else {
                continue;
            };
            if !table.persist {
                continue;
            }
            if table.floating_idx().is_some() {
                debug!("Element {idx} already carries a floating header, skipping");
                continue;
            }
            let Some(header) = table.header_idx() else {
                debug!("Persist table \"{}\" has no header row, skipping", table.title);
                continue;
            };
            let mut clone = table.rows[header].clone();
            clone.kind = RowKind::FLOATING;
            clone.visibility = Visibility::HIDDEN;
            table.rows.insert(header, clone);
            areas.push(idx);
            trace!("Attached floating header to element {idx}");
        }
        info!("Attached {} floating header(s)", areas.len());
        FloatingHeaders { areas }
    }

    // Recomputed from scratch on every call, there is no memoized state
    pub fn refresh(&self, page: &mut Page, geometry: &impl Geometry) {
        let scroll_top = geometry.scroll_top();
        for &area in &self.areas {
            let Some(bbox) = geometry.bounding_box(area) else {
                continue;
            };
            let visibility = if header_visible(scroll_top, &bbox) {
                Visibility::VISIBLE
            } else {
                Visibility::HIDDEN
            };
            let Some(Element::Table(table)) = page.elements.get_mut(area) else {
                continue;
            };
            let Some(idx) = table.floating_idx() else {
                continue;
            };
            table.rows[idx].visibility = visibility;
            trace!("Element {area}: scroll {scroll_top}, box {bbox:?} => {visibility:?}");
        }
    }

    // Re-copy header widths onto the clone, index aligned over the shorter row
    pub fn resync_widths(&self, page: &mut Page) {
        for &area in &self.areas {
            let Some(Element::Table(table)) = page.elements.get_mut(area) else {
                continue;
            };
            let (Some(header), Some(floating)) = (table.header_idx(), table.floating_idx())
            else {
                continue;
            };
            let widths: Vec<usize> = table.rows[header].cells.iter().map(|c| c.width).collect();
            let clone = &mut table.rows[floating];
            let ncells = std::cmp::min(widths.len(), clone.cells.len());
            for i in 0..ncells {
                clone.cells[i].width = widths[i];
            }
        }
    }

    pub fn detach(self, page: &mut Page) {
        for area in self.areas {
            if let Some(Element::Table(table)) = page.elements.get_mut(area) {
                table.rows.retain(|row| row.kind != RowKind::FLOATING);
            }
        }
        info!("Detached all floating headers");
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Cell, Row, Table};

    struct FakeGeometry {
        boxes: Vec<Option<BoundingBox>>,
        scroll_top: usize,
    }

    impl Geometry for FakeGeometry {
        fn bounding_box(&self, element: usize) -> Option<BoundingBox> {
            self.boxes.get(element).copied().flatten()
        }

        fn scroll_top(&self) -> usize {
            self.scroll_top
        }
    }

    fn persist_table() -> Table {
        let mut table = Table::new("metrics", true);
        table.rows.push(Row::header(vec![
            Cell::new("service"),
            Cell::new("requests"),
            Cell::new("errors"),
        ]));
        table.rows.push(Row::data(vec![
            Cell::new("billing"),
            Cell::new("1200"),
            Cell::new("3"),
        ]));
        table.rows.push(Row::data(vec![
            Cell::new("auth"),
            Cell::new("90210"),
            Cell::new("0"),
        ]));
        table.align_columns();
        table
    }

    fn page_with(tables: Vec<Table>) -> Page {
        let mut page = Page::new("p");
        for table in tables {
            page.elements.push(Element::Table(table));
        }
        page
    }

    fn table_at(page: &Page, idx: usize) -> &Table {
        match &page.elements[idx] {
            Element::Table(t) => t,
            _ => panic!("element {idx} is not a table"),
        }
    }

    fn clone_visibility(page: &Page, idx: usize) -> Visibility {
        let table = table_at(page, idx);
        table.rows[table.floating_idx().unwrap()].visibility
    }

    #[test]
    fn attach_clones_header_before_original() {
        let mut page = page_with(vec![persist_table()]);
        let widget = FloatingHeaders::attach(&mut page);

        assert_eq!(widget.area_count(), 1);
        let table = table_at(&page, 0);
        assert_eq!(table.rows[0].kind, RowKind::FLOATING);
        assert_eq!(table.rows[0].visibility, Visibility::HIDDEN);
        assert_eq!(table.rows[1].kind, RowKind::HEADER);
    }

    #[test]
    fn clone_widths_match_original_after_attach() {
        let mut page = page_with(vec![persist_table()]);
        FloatingHeaders::attach(&mut page);

        let table = table_at(&page, 0);
        let clone = &table.rows[table.floating_idx().unwrap()];
        let header = &table.rows[table.header_idx().unwrap()];
        assert_eq!(clone.cells.len(), header.cells.len());
        for (c, h) in clone.cells.iter().zip(header.cells.iter()) {
            assert_eq!(c.width, h.width);
            assert_eq!(c.content, h.content);
        }
    }

    #[test]
    fn attach_skips_non_persist_and_headerless_tables() {
        let mut plain = persist_table();
        plain.persist = false;
        let mut headerless = Table::new("bare", true);
        headerless
            .rows
            .push(Row::data(vec![Cell::new("x"), Cell::new("y")]));

        let mut page = page_with(vec![plain, headerless]);
        let widget = FloatingHeaders::attach(&mut page);

        assert_eq!(widget.area_count(), 0);
        assert!(table_at(&page, 0).floating_idx().is_none());
        assert!(table_at(&page, 1).floating_idx().is_none());
    }

    #[test]
    fn attach_on_empty_page_is_a_noop() {
        let mut page = Page::new("empty");
        page.elements.push(Element::Text(vec!["hello".to_string()]));
        let widget = FloatingHeaders::attach(&mut page);

        assert_eq!(widget.area_count(), 0);
        let geometry = FakeGeometry {
            boxes: vec![Some(BoundingBox { top: 0, height: 1 })],
            scroll_top: 10,
        };
        widget.refresh(&mut page, &geometry);
    }

    #[test]
    fn visibility_boundaries_are_exclusive() {
        let bbox = BoundingBox {
            top: 500,
            height: 300,
        };
        assert!(!header_visible(500, &bbox));
        assert!(header_visible(501, &bbox));
        assert!(header_visible(799, &bbox));
        assert!(!header_visible(800, &bbox));
    }

    #[test]
    fn scroll_scenario_toggles_clone() {
        let mut page = page_with(vec![persist_table()]);
        let widget = FloatingHeaders::attach(&mut page);
        let bbox = BoundingBox {
            top: 500,
            height: 300,
        };

        for (scroll_top, expected) in [
            (0, Visibility::HIDDEN),
            (600, Visibility::VISIBLE),
            (800, Visibility::HIDDEN),
            (900, Visibility::HIDDEN),
        ] {
            let geometry = FakeGeometry {
                boxes: vec![Some(bbox)],
                scroll_top,
            };
            widget.refresh(&mut page, &geometry);
            assert_eq!(clone_visibility(&page, 0), expected, "at scroll {scroll_top}");
        }
    }

    #[test]
    fn refresh_never_touches_the_original_header() {
        let mut page = page_with(vec![persist_table()]);
        let widget = FloatingHeaders::attach(&mut page);
        let before = {
            let table = table_at(&page, 0);
            table.rows[table.header_idx().unwrap()].clone()
        };

        for scroll_top in [0, 100, 501, 799, 800, 5000] {
            let geometry = FakeGeometry {
                boxes: vec![Some(BoundingBox {
                    top: 500,
                    height: 300,
                })],
                scroll_top,
            };
            widget.refresh(&mut page, &geometry);
        }

        let table = table_at(&page, 0);
        assert_eq!(table.rows[table.header_idx().unwrap()], before);
    }

    #[test]
    fn disjoint_areas_toggle_independently() {
        let mut page = page_with(vec![persist_table(), persist_table()]);
        let widget = FloatingHeaders::attach(&mut page);
        let geometry = FakeGeometry {
            boxes: vec![
                Some(BoundingBox {
                    top: 100,
                    height: 50,
                }),
                Some(BoundingBox {
                    top: 400,
                    height: 50,
                }),
            ],
            scroll_top: 120,
        };

        widget.refresh(&mut page, &geometry);
        assert_eq!(clone_visibility(&page, 0), Visibility::VISIBLE);
        assert_eq!(clone_visibility(&page, 1), Visibility::HIDDEN);
    }

    #[test]
    fn missing_bounding_box_leaves_clone_untouched() {
        let mut page = page_with(vec![persist_table()]);
        let widget = FloatingHeaders::attach(&mut page);
        let geometry = FakeGeometry {
            boxes: vec![None],
            scroll_top: 600,
        };

        widget.refresh(&mut page, &geometry);
        assert_eq!(clone_visibility(&page, 0), Visibility::HIDDEN);
    }

    #[test]
    fn resync_widths_is_index_aligned_over_the_shorter_row() {
        let mut page = page_with(vec![persist_table()]);
        let widget = FloatingHeaders::attach(&mut page);

        {
            let Element::Table(table) = &mut page.elements[0] else {
                unreachable!()
            };
            let header = table.header_idx().unwrap();
            table.rows[header].cells[0].width = 20;
            let floating = table.floating_idx().unwrap();
            table.rows[floating].cells.push(Cell::new("extra"));
        }

        widget.resync_widths(&mut page);
        let table = table_at(&page, 0);
        let clone = &table.rows[table.floating_idx().unwrap()];
        assert_eq!(clone.cells[0].width, 20);
        assert_eq!(clone.cells[3].width, 5); // surplus column untouched
    }

    #[test]
    fn detach_removes_exactly_the_clones() {
        let mut page = page_with(vec![persist_table(), persist_table()]);
        let nrows = table_at(&page, 0).rows.len();
        let widget = FloatingHeaders::attach(&mut page);
        assert_eq!(table_at(&page, 0).rows.len(), nrows + 1);

        widget.detach(&mut page);
        for idx in 0..2 {
            let table = table_at(&page, idx);
            assert_eq!(table.rows.len(), nrows);
            assert!(table.floating_idx().is_none());
            assert!(table.header_idx().is_some());
        }
    }
}
