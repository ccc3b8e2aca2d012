pub mod bookmarks;
pub mod clock;
pub mod common;
pub mod news;
pub mod search;

pub use bookmarks::{BookmarksWidget, Category, Link};
pub use clock::{ClockWidget, HourFormat};
pub use news::{NewsItem, NewsWidget};
pub use search::{SearchEngine, SearchWidget};

use startpage_core::{ComponentRegistry, register_widget};

/// Component types registered by [`register_builtin`]
pub const BUILTIN_TYPES: &[&str] = &["search", "bookmarks", "news", "clock"];

/// Register every built-in widget under its component type
pub fn register_builtin(registry: &ComponentRegistry) {
    register_widget!(registry, "search", SearchWidget);
    register_widget!(registry, "bookmarks", BookmarksWidget);
    register_widget!(registry, "news", NewsWidget);
    register_widget!(registry, "clock", ClockWidget);
}
