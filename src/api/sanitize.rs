//! Markup removal for free-text fields.

use regex::Regex;
use std::sync::OnceLock;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Decodes entities, drops `<script>`/`<style>` elements with their content, strips any
/// other tag and trims. Entities are decoded first so encoded markup cannot slip through.
#[must_use]
pub fn sanitize(input: &str) -> String {
    static BLOCKS: OnceLock<Regex> = OnceLock::new();
    static TAGS: OnceLock<Regex> = OnceLock::new();

    // An unclosed block runs to the end of the input
    let blocks = get_regex(
        &BLOCKS,
        r"(?is)<(script|style)\b[^>]*>.*?(?:</(?:script|style)\s*>|\z)",
    );
    let tags = get_regex(&TAGS, r"(?s)<[a-zA-Z/!?][^>]*(?:>|\z)");

    let decoded = html_escape::decode_html_entities(input);
    let without_blocks = blocks.replace_all(&decoded, "");
    let without_tags = tags.replace_all(&without_blocks, "");

    without_tags.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_kept() {
        assert_eq!(sanitize("  Morning run  "), "Morning run");
        assert_eq!(sanitize("5 < 10 and I <3 cardio"), "5 < 10 and I <3 cardio");
    }

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(sanitize("Run<script>alert('x')</script>"), "Run");
        assert_eq!(
            sanitize("<SCRIPT type=\"text/javascript\">\nsteal()\n</SCRIPT >Yoga"),
            "Yoga"
        );
        assert_eq!(sanitize("Swim<script>never closed"), "Swim");
        assert_eq!(sanitize("<style>body{}</style>Row"), "Row");
    }

    #[test]
    fn test_tags_are_stripped() {
        assert_eq!(sanitize("<b>Leg</b> day"), "Leg day");
        assert_eq!(sanitize("<img src=x onerror=alert(1)>Bike"), "Bike");
        assert_eq!(sanitize("Hike <a href='x'"), "Hike");
    }

    #[test]
    fn test_encoded_markup_is_decoded_then_stripped() {
        assert_eq!(sanitize("&lt;script&gt;alert(1)&lt;/script&gt;Lift"), "Lift");
        assert_eq!(sanitize("Fish &amp; chips"), "Fish & chips");
    }
}
