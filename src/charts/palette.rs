use crate::core::EventType;
use crate::render::Color;

/// `0xRRGGBB` to an opaque color.
#[must_use]
pub const fn hex(rgb: u32) -> Color {
    Color::rgb(
        ((rgb >> 16) & 0xff) as f64 / 255.0,
        ((rgb >> 8) & 0xff) as f64 / 255.0,
        (rgb & 0xff) as f64 / 255.0,
    )
}

pub const CATEGORY10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

pub const TABLEAU10: [u32; 10] = [
    0x4e79a7, 0xf28e2c, 0xe15759, 0x76b7b2, 0x59a14f, 0xedc949, 0xaf7aa1, 0xff9da7, 0x9c755f,
    0xbab0ab,
];

/// Actor colors of the chord diagram.
pub const CHORD_SET: [u32; 10] = [
    0x66c2a5, 0xfc8d62, 0x8da0cb, 0xe78ac3, 0xa6d854, 0xffd92f, 0xe5c494, 0xb3b3b3, 0x7fc97f,
    0xbeaed4,
];

/// Fixed colors of the UN permanent members, in configuration order.
pub const PERMANENT_MEMBER_COLORS: [u32; 5] = [0xe41a1c, 0x377eb8, 0x4daf4a, 0x984ea3, 0xff7f00];

/// Metric line colors: fatalities, total events, then event types.
pub const METRIC_LINE_COLORS: [u32; 7] = [
    0xff0000, 0x000000, 0x4682b4, 0x008000, 0x800080, 0xffa500, 0xa52a2a,
];

/// Cycles through `palette` by position.
#[must_use]
pub fn ordinal(palette: &[u32], index: usize) -> Color {
    if palette.is_empty() {
        return Color::rgb(0.5, 0.5, 0.5);
    }
    hex(palette[index % palette.len()])
}

#[must_use]
pub const fn event_type_color(event_type: EventType) -> Color {
    match event_type {
        EventType::ExplosionsRemoteViolence => hex(0xff4444),
        EventType::Battles => hex(0xffaa00),
        EventType::ViolenceAgainstCivilians => hex(0xcc44cc),
        EventType::Protests => hex(0x44aa44),
        EventType::Riots => hex(0x000000),
        EventType::StrategicDevelopments => hex(0x4444ff),
    }
}

/// Keeps at most `max_chars` characters.
#[must_use]
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    label.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{hex, ordinal, truncate_label, CATEGORY10};

    #[test]
    fn hex_splits_channels() {
        let color = hex(0xff8000);
        assert_eq!(color.red, 1.0);
        assert!((color.green - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(color.blue, 0.0);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn ordinal_wraps_around() {
        assert_eq!(ordinal(&CATEGORY10, 0), ordinal(&CATEGORY10, 10));
    }

    #[test]
    fn labels_truncate_on_char_boundaries() {
        assert_eq!(truncate_label("Société Générale Défense", 7), "Société");
        assert_eq!(truncate_label("short", 25), "short");
    }
}
