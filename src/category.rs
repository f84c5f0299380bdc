use serde::{Deserialize, Serialize};

pub type CategoryId = String;

/// Color preselected in the category form.
pub const DEFAULT_COLOR: &str = "#4F46E5";

/// Colors offered by the category form, in cycling order.
pub const PRESET_COLORS: [&str; 7] = [
    "#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#EC4899", "#06B6D4", "#64748B",
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
}

impl Category {
    pub(crate) fn from_draft(id: CategoryId, draft: CategoryDraft) -> Category {
        Category {
            id,
            name: draft.name,
            color: draft.color,
        }
    }

    /// Parses `#RRGGBB` into its components. Anything else yields `None`.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(&self.color)
    }
}

pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// The preset after `current`, or the first preset if `current` is custom.
pub fn next_preset(current: &str) -> &'static str {
    match PRESET_COLORS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
    {
        Some(idx) => PRESET_COLORS[(idx + 1) % PRESET_COLORS.len()],
        None => PRESET_COLORS[0],
    }
}

pub fn prev_preset(current: &str) -> &'static str {
    match PRESET_COLORS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
    {
        Some(idx) => PRESET_COLORS[(idx + PRESET_COLORS.len() - 1) % PRESET_COLORS.len()],
        None => PRESET_COLORS[PRESET_COLORS.len() - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#4F46E5"), Some((0x4f, 0x46, 0xe5)));
        assert_eq!(parse_hex_color("#10b981"), Some((0x10, 0xb9, 0x81)));
        assert_eq!(parse_hex_color("4F46E5"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn presets_cycle_both_ways() {
        assert_eq!(next_preset(DEFAULT_COLOR), "#10B981");
        assert_eq!(prev_preset(DEFAULT_COLOR), "#64748B");
        assert_eq!(next_preset("#64748b"), "#4F46E5");
        assert_eq!(next_preset("#123456"), PRESET_COLORS[0]);
    }
}
