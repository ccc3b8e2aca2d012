// startpage-cli/src/tracks.rs
use ratatui::layout::Rect;

/// Horizontal pixels folded into one terminal cell
pub const PX_PER_CELL: u16 = 8;

/// One row or column size, parsed from the layout document's track tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Fixed size in cells
    Fixed(u16),
    /// Proportional share of what fixed and percentage tracks leave over
    Flex(u16),
    /// Percentage of the full span (0-100)
    Percentage(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Track {
    /// Parse `1fr`, `auto`, `25%` or `120px`. `auto` and unrecognised
    /// tokens size like `1fr`.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Some(weight) = token.strip_suffix("fr") {
            let weight = weight.trim().parse::<f32>().unwrap_or(1.0);
            return Track::Flex(weight.round().clamp(1.0, f32::from(u16::MAX)) as u16);
        }
        if let Some(pct) = token.strip_suffix('%')
            && let Ok(pct) = pct.trim().parse::<f32>()
        {
            return Track::Percentage(pct.clamp(0.0, 100.0) as u16);
        }
        if let Some(px) = token.strip_suffix("px")
            && let Ok(px) = px.trim().parse::<u16>()
        {
            return Track::Fixed(px.div_ceil(PX_PER_CELL));
        }
        if token != "auto" {
            tracing::debug!(token, "Unrecognised track size, treating as 1fr");
        }
        Track::Flex(1)
    }

    /// Parse a whitespace separated track list such as `1fr 200px auto`
    pub fn parse_list(tokens: &str) -> Vec<Track> {
        tokens.split_whitespace().map(Track::parse).collect()
    }
}

fn span(area: Rect, axis: Axis) -> u16 {
    match axis {
        Axis::Horizontal => area.width,
        Axis::Vertical => area.height,
    }
}

fn slice(area: Rect, axis: Axis, offset: u16, size: u16) -> Rect {
    match axis {
        Axis::Horizontal => Rect {
            x: area.x + offset,
            width: size,
            ..area
        },
        Axis::Vertical => Rect {
            y: area.y + offset,
            height: size,
            ..area
        },
    }
}

/// Split `area` along `axis`, one rect per track, in order
///
/// Fixed and percentage tracks are allocated first, in order, each clamped
/// to what is left. The remainder goes to flex tracks by weight, with
/// rounding leftovers on the last flex track.
pub fn split(area: Rect, tracks: &[Track], axis: Axis) -> Vec<Rect> {
    if tracks.is_empty() {
        return vec![];
    }

    let total = span(area, axis);
    let mut sizes = vec![0u16; tracks.len()];
    let mut remaining = total;

    // First pass: fixed and percentage tracks
    for (size, track) in sizes.iter_mut().zip(tracks) {
        let wanted = match track {
            Track::Fixed(cells) => *cells,
            Track::Percentage(pct) => (u32::from(total) * u32::from((*pct).min(100)) / 100) as u16,
            Track::Flex(_) => continue,
        };
        *size = wanted.min(remaining);
        remaining -= *size;
    }

    // Second pass: flex tracks share the rest
    let total_weight: u32 = tracks
        .iter()
        .filter_map(|t| match t {
            Track::Flex(w) => Some(u32::from(*w)),
            _ => None,
        })
        .sum();

    if total_weight > 0 && remaining > 0 {
        let mut distributed = 0u16;
        let mut last_flex = None;
        for (i, track) in tracks.iter().enumerate() {
            if let Track::Flex(weight) = track {
                let share = (u32::from(remaining) * u32::from(*weight) / total_weight) as u16;
                let share = share.min(remaining - distributed);
                sizes[i] = share;
                distributed += share;
                last_flex = Some(i);
            }
        }
        if let Some(i) = last_flex {
            sizes[i] += remaining - distributed;
        }
    }

    let mut offset = 0u16;
    sizes
        .into_iter()
        .map(|size| {
            let rect = slice(area, axis, offset, size);
            offset += size;
            rect
        })
        .collect()
}

/// 1-based `start` or `start / end` line numbers of a grid placement,
/// as a zero-based index range over the tracks
pub fn parse_line_range(value: &str, track_count: usize) -> Option<std::ops::Range<usize>> {
    let mut parts = value.split('/').map(str::trim);
    let start: usize = parts.next()?.parse().ok()?;
    if start == 0 || start > track_count {
        return None;
    }
    let end = match parts.next() {
        Some(end) => end.parse::<usize>().ok()?.clamp(start + 1, track_count + 1),
        None => start + 1,
    };
    Some(start - 1..end - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(Track::parse("1fr"), Track::Flex(1));
        assert_eq!(Track::parse("3fr"), Track::Flex(3));
        assert_eq!(Track::parse("auto"), Track::Flex(1));
        assert_eq!(Track::parse("25%"), Track::Percentage(25));
        assert_eq!(Track::parse("250%"), Track::Percentage(100));
        assert_eq!(Track::parse("120px"), Track::Fixed(15));
        assert_eq!(Track::parse("minmax(1fr)"), Track::Flex(1));
        assert_eq!(
            Track::parse_list(" 1fr  200px auto"),
            vec![Track::Flex(1), Track::Fixed(25), Track::Flex(1)]
        );
    }

    #[test]
    fn test_horizontal_flex_split() {
        let area = Rect::new(0, 0, 100, 20);
        let areas = split(area, &[Track::Flex(2), Track::Flex(1)], Axis::Horizontal);

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].width, 66); // 2/3 of 100
        assert_eq!(areas[1].width, 34); // 1/3 of 100 plus rounding
        assert_eq!(areas[1].x, 66);
        assert_eq!(areas[0].height, 20);
    }

    #[test]
    fn test_horizontal_fixed_split() {
        let area = Rect::new(0, 0, 100, 20);
        let areas = split(area, &[Track::Fixed(30), Track::Fixed(20)], Axis::Horizontal);

        assert_eq!(areas[0].width, 30);
        assert_eq!(areas[1].width, 20);
        assert_eq!(areas[0].x, 0);
        assert_eq!(areas[1].x, 30);
    }

    #[test]
    fn test_vertical_percentage_split() {
        let area = Rect::new(0, 0, 50, 100);
        let areas = split(
            area,
            &[Track::Percentage(60), Track::Percentage(40)],
            Axis::Vertical,
        );

        assert_eq!(areas[0].height, 60);
        assert_eq!(areas[1].height, 40);
        assert_eq!(areas[1].y, 60);
        assert_eq!(areas[1].width, 50);
    }

    #[test]
    fn test_mixed_split_fills_span() {
        let area = Rect::new(5, 2, 80, 10);
        let areas = split(
            area,
            &[Track::Fixed(10), Track::Flex(1), Track::Percentage(25)],
            Axis::Horizontal,
        );

        assert_eq!(areas[0], Rect::new(5, 2, 10, 10));
        assert_eq!(areas[1], Rect::new(15, 2, 50, 10));
        assert_eq!(areas[2], Rect::new(65, 2, 20, 10));
    }

    #[test]
    fn test_overflowing_fixed_is_clamped() {
        let area = Rect::new(0, 0, 10, 4);
        let areas = split(
            area,
            &[Track::Fixed(8), Track::Fixed(8), Track::Flex(1)],
            Axis::Horizontal,
        );
        assert_eq!(areas[0].width, 8);
        assert_eq!(areas[1].width, 2);
        assert_eq!(areas[2].width, 0);
    }

    #[test]
    fn test_empty_tracks() {
        assert!(split(Rect::new(0, 0, 100, 20), &[], Axis::Vertical).is_empty());
    }

    #[test]
    fn test_parse_line_range() {
        assert_eq!(parse_line_range("1", 2), Some(0..1));
        assert_eq!(parse_line_range("2", 2), Some(1..2));
        assert_eq!(parse_line_range("1 / 3", 2), Some(0..2));
        assert_eq!(parse_line_range("1 / 9", 2), Some(0..2));
        assert_eq!(parse_line_range("3", 2), None);
        assert_eq!(parse_line_range("span 2", 2), None);
    }
}
