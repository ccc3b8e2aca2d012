// startpage-widgets/src/clock.rs
use chrono::{Local, NaiveDateTime};
use startpage_core::{ConfigMap, ElementTree, Widget, WidgetBase};

use crate::common::{bool_field, str_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourFormat {
    TwentyFour,
    Twelve,
}

impl HourFormat {
    /// `12h` selects the twelve-hour clock, anything else is 24h
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("12h") => Self::Twelve,
            _ => Self::TwentyFour,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwentyFour => "24h",
            Self::Twelve => "12h",
        }
    }
}

pub fn format_time(at: &NaiveDateTime, format: HourFormat) -> String {
    match format {
        HourFormat::TwentyFour => at.format("%H:%M").to_string(),
        HourFormat::Twelve => at.format("%-I:%M %p").to_string(),
    }
}

pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

/// Local wall clock
///
/// Config keys: `format` (`24h` or `12h`), `showDate` (default true).
/// The time is sampled on each render.
pub struct ClockWidget {
    base: WidgetBase,
}

impl ClockWidget {
    pub fn new(config: ConfigMap, instance_id: &str) -> Self {
        Self {
            base: WidgetBase::new(config, instance_id),
        }
    }

    pub fn hour_format(&self) -> HourFormat {
        HourFormat::parse(str_field(self.base.config(), "format"))
    }

    pub fn show_date(&self) -> bool {
        bool_field(self.base.config(), "showDate", true)
    }

    fn render_at(&self, tree: &mut ElementTree, at: &NaiveDateTime) {
        let Some(container) = self.base.clear_container(tree) else {
            return;
        };

        let root = tree.create_child(container, "div", "clock-component");
        if let Some(el) = tree.get_mut(root) {
            el.set_attr("data-format", self.hour_format().as_str());
        }
        tree.create_text(root, "div", "clock-time", format_time(at, self.hour_format()));
        if self.show_date() {
            tree.create_text(root, "div", "clock-date", format_date(at));
        }
    }
}

impl Widget for ClockWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn render(&mut self, tree: &mut ElementTree) {
        let now = Local::now().naive_local();
        self.render_at(tree, &now);
    }
}
