use std::sync::OnceLock;

use regex::Regex;

/// The literal a quote's first line must equal to be enhanced.
pub const TRIGGER: &str = "$kgar";

/// Text the widget shows in place of the trigger line.
pub const WIDGET_LABEL: &str = "kgar 🌟";

fn quote_marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX.get_or_init(|| Regex::new(r">\s").expect("Invalid quote marker regex"))
}

/// True when `text` is the trigger once every `> ` marker is stripped,
/// case is folded and surrounding whitespace is trimmed.
pub fn matches_trigger(text: &str) -> bool {
    let stripped = quote_marker_regex().replace_all(text, "");
    stripped.to_lowercase().trim() == TRIGGER
}
