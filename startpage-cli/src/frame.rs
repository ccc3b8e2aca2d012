// startpage-cli/src/frame.rs
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use startpage_core::{DockRegion, ElementId, ElementTree};

use crate::palette::{ColorPalette, focus_color};
use crate::tracks::{Axis, Track, parse_line_range, split};

/// Share of the width given to a non-empty left or right dock region
const SIDE_REGION_PERCENT: u16 = 25;

/// A component container and the cells it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    pub container: ElementId,
    pub area: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Text,
    Link,
    Button,
    Input,
    Muted,
}

/// One terminal line of a component's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub kind: LineKind,
    pub text: String,
}

impl ContentLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Assign an area to every component container under `root`, in document order
pub fn arrange(tree: &ElementTree, root: ElementId, area: Rect) -> Vec<Placed> {
    let mut placed = Vec::new();
    arrange_element(tree, root, area, &mut placed);
    placed
}

fn has_class(tree: &ElementTree, id: ElementId, class: &str) -> bool {
    tree.get(id).is_some_and(|el| el.has_class(class))
}

fn style<'a>(tree: &'a ElementTree, id: ElementId, property: &str) -> Option<&'a str> {
    tree.get(id)
        .and_then(|el| el.style.get(property))
        .map(String::as_str)
}

fn arrange_element(tree: &ElementTree, id: ElementId, area: Rect, out: &mut Vec<Placed>) {
    if has_class(tree, id, "component-container") {
        out.push(Placed {
            container: id,
            area,
        });
    } else if has_class(tree, id, "dock-panel") {
        arrange_dock(tree, id, area, out);
    } else if has_class(tree, id, "grid-panel") {
        arrange_grid(tree, id, area, out);
    } else {
        let axis = if has_class(tree, id, "stack-panel") && has_class(tree, id, "horizontal") {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        arrange_stack(tree, tree.children(id), area, axis, out);
    }
}

fn arrange_stack(
    tree: &ElementTree,
    children: &[ElementId],
    area: Rect,
    axis: Axis,
    out: &mut Vec<Placed>,
) {
    let tracks = vec![Track::Flex(1); children.len()];
    for (child, rect) in children.iter().zip(split(area, &tracks, axis)) {
        arrange_element(tree, *child, rect, out);
    }
}

fn arrange_dock(tree: &ElementTree, dock: ElementId, area: Rect, out: &mut Vec<Placed>) {
    let region = |r: DockRegion| {
        let class = format!("dock-{}", r.as_str());
        tree.children(dock)
            .iter()
            .copied()
            .find(|c| has_class(tree, *c, &class))
    };
    let occupied = |id: Option<ElementId>| id.is_some_and(|id| !tree.children(id).is_empty());

    let [top, right, bottom, left, center] = DockRegion::ALL.map(region);

    let edge = |id: Option<ElementId>| match id {
        Some(id) if occupied(Some(id)) => Track::Fixed(desired_height(tree, id)),
        _ => Track::Fixed(0),
    };
    let side = |id: Option<ElementId>| {
        if occupied(id) {
            Track::Percentage(SIDE_REGION_PERCENT)
        } else {
            Track::Fixed(0)
        }
    };

    // Center takes whatever the edges leave
    let rows = split(area, &[edge(top), Track::Flex(1), edge(bottom)], Axis::Vertical);
    let columns = split(
        rows[1],
        &[side(left), Track::Flex(1), side(right)],
        Axis::Horizontal,
    );

    for (region, rect) in [
        (top, rows[0]),
        (left, columns[0]),
        (center, columns[1]),
        (right, columns[2]),
        (bottom, rows[2]),
    ] {
        if let Some(region) = region {
            arrange_stack(tree, tree.children(region), rect, Axis::Vertical, out);
        }
    }
}

fn arrange_grid(tree: &ElementTree, grid: ElementId, area: Rect, out: &mut Vec<Placed>) {
    let tracks = |property: &str| {
        let tracks = style(tree, grid, property)
            .map(Track::parse_list)
            .unwrap_or_default();
        if tracks.is_empty() {
            vec![Track::Flex(1)]
        } else {
            tracks
        }
    };
    let rows = split(area, &tracks("grid-template-rows"), Axis::Vertical);
    let columns = split(area, &tracks("grid-template-columns"), Axis::Horizontal);

    for (i, child) in tree.children(grid).iter().enumerate() {
        // Auto placement fills row by row; overflow stacks on the last row
        let auto_row = (i / columns.len()).min(rows.len() - 1);
        let auto_col = i % columns.len();

        let row_span = style(tree, *child, "grid-row")
            .and_then(|v| parse_line_range(v, rows.len()))
            .unwrap_or(auto_row..auto_row + 1);
        let col_span = style(tree, *child, "grid-column")
            .and_then(|v| parse_line_range(v, columns.len()))
            .unwrap_or(auto_col..auto_col + 1);

        let (first_row, last_row) = (rows[row_span.start], rows[row_span.end - 1]);
        let (first_col, last_col) = (columns[col_span.start], columns[col_span.end - 1]);
        let cell = Rect {
            x: first_col.x,
            y: first_row.y,
            width: last_col.right() - first_col.x,
            height: last_row.bottom() - first_row.y,
        };
        arrange_element(tree, *child, cell, out);
    }
}

/// Rows an element wants when docked at the top or bottom
pub fn desired_height(tree: &ElementTree, id: ElementId) -> u16 {
    if has_class(tree, id, "component-container") {
        let lines = content_lines(tree, id).len();
        return u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2);
    }

    let heights = tree.children(id).iter().map(|c| desired_height(tree, *c));
    let side_by_side = has_class(tree, id, "grid-panel")
        || (has_class(tree, id, "stack-panel") && has_class(tree, id, "horizontal"));
    if side_by_side {
        heights.max().unwrap_or(0)
    } else {
        heights.fold(0u16, u16::saturating_add)
    }
}

/// Flatten a component's rendered content into terminal lines
pub fn content_lines(tree: &ElementTree, container: ElementId) -> Vec<ContentLine> {
    if tree.children(container).is_empty() {
        return vec![ContentLine::new(LineKind::Muted, "(unavailable)")];
    }
    let mut lines = Vec::new();
    for child in tree.children(container) {
        collect_lines(tree, *child, &mut lines);
    }
    lines
}

fn collect_lines(tree: &ElementTree, id: ElementId, out: &mut Vec<ContentLine>) {
    let Some(el) = tree.get(id) else {
        return;
    };

    match (el.tag(), el.text.as_deref()) {
        ("input", _) => {
            let hint = el.attrs.get("placeholder").map_or("", String::as_str);
            out.push(ContentLine::new(LineKind::Input, format!("[ {hint} ]")));
        }
        ("a", Some(text)) => out.push(ContentLine::new(LineKind::Link, format!("› {text}"))),
        ("button", Some(text)) => {
            out.push(ContentLine::new(LineKind::Button, format!("<{text}>")))
        }
        ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", Some(text)) => {
            out.push(ContentLine::new(LineKind::Heading, text))
        }
        (_, Some(text)) if !text.is_empty() => out.push(ContentLine::new(LineKind::Text, text)),
        _ => {}
    }

    for child in el.children() {
        collect_lines(tree, *child, out);
    }
}

fn line_style(kind: LineKind, palette: ColorPalette) -> Style {
    let style = Style::default().bg(palette.background);
    match kind {
        LineKind::Heading => style.fg(palette.heading).add_modifier(Modifier::BOLD),
        LineKind::Text => style.fg(palette.text),
        LineKind::Link => style.fg(palette.link).add_modifier(Modifier::UNDERLINED),
        LineKind::Button => style.fg(palette.link),
        LineKind::Input => style.fg(palette.muted),
        LineKind::Muted => style.fg(palette.muted).add_modifier(Modifier::ITALIC),
    }
}

/// Draw the page under `root` into `area`; `focused` indexes the placed
/// components in document order
pub fn draw_page(
    frame: &mut Frame,
    tree: &ElementTree,
    root: ElementId,
    area: Rect,
    palette: ColorPalette,
    focused: usize,
) {
    let background = Block::default().style(Style::default().bg(palette.background));
    frame.render_widget(background, area);

    for (i, placed) in arrange(tree, root, area).into_iter().enumerate() {
        if placed.area.width < 3 || placed.area.height < 3 {
            continue;
        }

        let title = tree
            .get(placed.container)
            .and_then(|el| el.dom_id.as_deref())
            .map(|id| id.strip_prefix("component-").unwrap_or(id))
            .unwrap_or_default()
            .to_string();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(focus_color(i == focused, palette)))
            .style(Style::default().bg(palette.background));

        let lines: Vec<Line> = content_lines(tree, placed.container)
            .into_iter()
            .map(|line| Line::from(Span::styled(line.text, line_style(line.kind, palette))))
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, placed.area);
    }
}
