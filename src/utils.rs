use crate::model::TeamDetails;
use once_cell::sync::Lazy;
use regex::Regex;

// Emoji sent as a hex code point, e.g. "0x1F525"
static EMOJI_CODE_POINT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xX]([0-9a-fA-F]{1,6})$").unwrap());

/// Convert a `0x…` code point into the character it names.
///
/// Anything else, including code points that are not valid characters, is
/// returned unchanged.
pub fn decode_emoji(raw: &str) -> String {
    EMOJI_CODE_POINT_REGEX
        .captures(raw.trim())
        .and_then(|captures| u32::from_str_radix(&captures[1], 16).ok())
        .and_then(char::from_u32)
        .map(|c| c.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Lowercase the first character of `text`.
pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Player ids on a team: lineup, then rotation, then shadows.
pub fn roster_ids(team: &TeamDetails) -> Vec<String> {
    team.lineup
        .iter()
        .chain(team.rotation.iter())
        .chain(team.shadows.iter())
        .cloned()
        .collect()
}

pub fn net_shame(team: &TeamDetails) -> i64 {
    team.total_shamings - team.total_shames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_code_points() {
        assert_eq!(decode_emoji("0x1F525"), "🔥");
        assert_eq!(decode_emoji("0x1f33a"), "🌺");
    }

    #[test]
    fn leaves_literal_emoji_alone() {
        assert_eq!(decode_emoji("🦀"), "🦀");
        assert_eq!(decode_emoji("0xZZ"), "0xZZ");
        // surrogate range is not a char
        assert_eq!(decode_emoji("0xD800"), "0xD800");
    }

    #[test]
    fn lowercases_only_the_first_letter() {
        assert_eq!(lowercase_first("Fetching Teams..."), "fetching Teams...");
        assert_eq!(lowercase_first(""), "");
    }

    #[test]
    fn roster_order_and_shame() {
        let team = TeamDetails {
            lineup: vec!["a".into(), "b".into()],
            rotation: vec!["c".into()],
            shadows: vec!["d".into()],
            total_shamings: 7,
            total_shames: 3,
            ..TeamDetails::default()
        };
        assert_eq!(roster_ids(&team), vec!["a", "b", "c", "d"]);
        assert_eq!(net_shame(&team), 4);
    }
}
