use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Stylize,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph},
};

use crate::domain::FHVConfig;
use crate::model::{Model, UIData};
use crate::page::LineKind;

pub const STATUSLINE_HEIGHT: usize = 1;

pub struct PageUI {
    status_message_timeout: Duration,
}

impl PageUI {
    pub fn new(config: &FHVConfig) -> Self {
        Self {
            status_message_timeout: Duration::from_secs(config.status_message_timeout),
        }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [page_area, status_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
        ])
        .areas(frame.area());

        self.draw_page(uidata, frame, page_area);
        self.draw_floating(uidata, frame, page_area);
        self.draw_statusline(uidata, frame, status_area);
        if uidata.show_popup {
            self.draw_popup(uidata, frame, frame.area());
        }
    }

    fn draw_page(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = uidata
            .lines
            .iter()
            .map(|l| match l.kind {
                LineKind::TITLE => Line::from(l.content.clone().bold().underlined()),
                LineKind::HEADER => Line::from(l.content.clone().bold()),
                LineKind::RULE => Line::from(l.content.clone().dim()),
                LineKind::TEXT | LineKind::DATA => Line::from(l.content.clone()),
            })
            .collect();
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    // Visible clones are pinned to the top of the page viewport. The widget
    // only decides visibility, positioning happens here.
    fn draw_floating(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        for (idx, overlay) in uidata.overlays.iter().enumerate() {
            if idx as u16 >= area.height {
                break;
            }
            let row = Rect::new(area.x, area.y + idx as u16, area.width, 1);
            frame.render_widget(Clear, row);
            frame.render_widget(Paragraph::new(overlay.clone().bold().reversed()), row);
        }
    }

    fn draw_statusline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::from(format!(" {} ", uidata.title)).bold(),
            Span::from(format!("L{}/{} ", uidata.scroll_top, uidata.total_lines)),
            if uidata.floating_on {
                Span::from("float:on ").cyan()
            } else {
                Span::from("float:off ").dim()
            },
        ];
        if !uidata.status_message.is_empty()
            && uidata.last_status_message_update.elapsed() < self.status_message_timeout
        {
            spans.push(Span::from(uidata.status_message.clone()).yellow());
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let hints = Line::from(" q:quit  f:float  h:help ".dim()).right_aligned();
        frame.render_widget(Paragraph::new(hints), area);
    }

    fn draw_popup(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let popup = popup_area(area, 50, 70);
        frame.render_widget(Clear, popup);
        let block = Block::bordered().title(Line::from(" Help ".bold()).centered());
        frame.render_widget(
            Paragraph::new(uidata.popup_message.clone()).block(block),
            popup,
        );
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
