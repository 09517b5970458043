use std::time::Instant;
use tracing::{debug, info, trace};

use crate::domain::{FHVConfig, FHVError, HELP_TEXT, Message};
use crate::floating::FloatingHeaders;
use crate::page::{Element, LineView, Page, PageGeometry, Visibility};
use crate::ui::STATUSLINE_HEIGHT;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy)]
enum Modus {
    PAGE,
    POPUP,
}

pub struct UIData {
    pub title: String,
    pub lines: Vec<LineView>,
    pub overlays: Vec<String>,
    pub scroll_top: usize,
    pub total_lines: usize,
    pub floating_on: bool,
    pub show_popup: bool,
    pub popup_message: String,
    pub layout: UILayout,
    pub status_message: String,
    pub last_status_message_update: Instant,
    pub last_update: Instant,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            title: String::new(),
            lines: Vec::new(),
            overlays: Vec::new(),
            scroll_top: 0,
            total_lines: 0,
            floating_on: false,
            show_popup: false,
            popup_message: String::new(),
            layout: UILayout::default(),
            status_message: String::new(),
            last_status_message_update: Instant::now(),
            last_update: Instant::now(),
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct UILayout {
    pub width: usize,
    pub height: usize,
    pub page_width: usize,
    pub page_height: usize,
    pub statusline_width: usize,
    pub statusline_height: usize,
}

impl UILayout {
    pub fn from_values(ui_width: usize, ui_height: usize) -> Self {
        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            page_width: ui_width,
            page_height: ui_height.saturating_sub(STATUSLINE_HEIGHT),
            statusline_width: ui_width,
            statusline_height: STATUSLINE_HEIGHT,
        };
        trace!("Build UILayout: {:?}", layout);
        layout
    }
}

pub struct Model {
    config: FHVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    page: Page,
    floating: Option<FloatingHeaders>,
    scroll_top: usize,
    uilayout: UILayout,
    uidata: UIData,
    status_message: String,
    last_status_message_update: Instant,
    last_update: Instant,
}

impl Model {
    pub fn init(config: &FHVConfig, page: Page, ui_width: usize, ui_height: usize) -> Self {
        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::PAGE,
            previous_modus: Modus::PAGE,
            page,
            floating: None,
            scroll_top: 0,
            uilayout: UILayout::from_values(ui_width, ui_height),
            uidata: UIData::empty(),
            status_message: "Started fhv!".to_string(),
            last_status_message_update: Instant::now(),
            last_update: Instant::now(),
        };
        let widget = FloatingHeaders::attach(&mut model.page);
        model.floating = Some(widget);
        model.refresh_floating();
        model.update_page_data();
        model
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), FHVError> {
        if let Some(msg) = message {
            trace!(
                "Update: {:?}, {}ms since the last one",
                msg,
                self.last_update.elapsed().as_millis()
            );
            match self.modus {
                Modus::PAGE => match msg {
                    Message::Quit => self.quit(),
                    Message::ScrollDown => self.scroll_down(self.config.scroll_step),
                    Message::ScrollUp => self.scroll_up(self.config.scroll_step),
                    Message::ScrollPageDown => self.scroll_down(self.uilayout.page_height),
                    Message::ScrollPageUp => self.scroll_up(self.uilayout.page_height),
                    Message::ScrollTop => self.scroll_to(0),
                    Message::ScrollBottom => self.scroll_to(usize::MAX),
                    Message::ToggleFloating => self.toggle_floating(),
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::Exit => {}
                },
                Modus::POPUP => match msg {
                    Message::Quit => self.quit(),
                    Message::Exit | Message::Help => self.close_popup(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
            }
        }
        self.last_update = Instant::now();
        Ok(())
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn quit(&mut self) {
        info!("Quitting fhv ...");
        self.status = Status::QUITTING;
    }

    // -------------------- Scrolling ---------------------- //

    fn max_scroll(&self) -> usize {
        let (lines, _boxes) = self.page.flow();
        lines.len().saturating_sub(self.uilayout.page_height)
    }

    fn scroll_to(&mut self, target: usize) {
        self.scroll_top = std::cmp::min(target, self.max_scroll());
        self.refresh_floating();
        self.update_page_data();
    }

    fn scroll_down(&mut self, step: usize) {
        self.scroll_to(self.scroll_top.saturating_add(step));
    }

    fn scroll_up(&mut self, step: usize) {
        self.scroll_to(self.scroll_top.saturating_sub(step));
    }

    // -------------------- Floating headers ---------------------- //

    fn refresh_floating(&mut self) {
        if let Some(widget) = &self.floating {
            let geometry = PageGeometry::of(&self.page, self.scroll_top);
            widget.refresh(&mut self.page, &geometry);
        }
    }

    fn toggle_floating(&mut self) {
        match self.floating.take() {
            Some(widget) => {
                debug!("Detaching floating headers");
                widget.detach(&mut self.page);
                self.set_status_message("Floating headers detached");
            }
            None => {
                let widget = FloatingHeaders::attach(&mut self.page);
                self.set_status_message(format!(
                    "Floating headers attached to {} area(s)",
                    widget.area_count()
                ));
                self.floating = Some(widget);
                self.refresh_floating();
            }
        }
        self.update_page_data();
    }

    fn collect_overlays(&self) -> Vec<String> {
        let mut overlays = Vec::new();
        if self.floating.is_none() {
            return overlays;
        }
        for element in &self.page.elements {
            if let Element::Table(table) = element
                && let Some(idx) = table.floating_idx()
                && table.rows[idx].visibility == Visibility::VISIBLE
            {
                overlays.push(table.rows[idx].render());
            }
        }
        overlays
    }

    // -------------------- UI state ---------------------- //

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UILayout::from_values(width, height);
        if let Some(widget) = &self.floating {
            widget.resync_widths(&mut self.page);
        }
        self.scroll_to(self.scroll_top);
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
        self.uidata.last_update = Instant::now();
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
        self.uidata.show_popup = false;
        self.uidata.last_update = Instant::now();
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_status_message_update = self.last_status_message_update;
        self.uidata.last_update = Instant::now();
    }

    fn update_page_data(&mut self) {
        let (lines, _boxes) = self.page.flow();
        let total_lines = lines.len();
        let rbegin = std::cmp::min(self.scroll_top, total_lines);
        let rend = std::cmp::min(rbegin + self.uilayout.page_height, total_lines);

        trace!(
            "Page: St {}, Rb {}, Re {}, total {}, pw {}, ph {}",
            self.scroll_top,
            rbegin,
            rend,
            total_lines,
            self.uilayout.page_width,
            self.uilayout.page_height
        );

        self.uidata = UIData {
            title: self.page.title.clone(),
            lines: lines[rbegin..rend].to_vec(),
            overlays: self.collect_overlays(),
            scroll_top: self.scroll_top,
            total_lines,
            floating_on: self.floating.is_some(),
            show_popup: self.uidata.show_popup,
            popup_message: self.uidata.popup_message.clone(),
            layout: self.uilayout.clone(),
            status_message: self.status_message.clone(),
            last_status_message_update: self.last_status_message_update,
            last_update: Instant::now(),
        };
    }
}
