//! Display formatting for paper text and generated output

use super::PaperRecord;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Bullet used in place of markdown emphasis markers
pub const BULLET: char = '•';

/// Label shown next to a node.
///
/// Prefers the generated short label (emphasis markers removed) and falls
/// back to the title without its leading bullet markers.
pub fn display_label(record: &PaperRecord) -> String {
    if let Some(label) = record.label.as_deref() {
        let cleaned = label.replace('*', "");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            return cleaned.to_string();
        }
    }

    strip_leading_bullets(&record.title).to_string()
}

/// Remove list markers (`*`, `-`, `•`) and surrounding spaces from the start
pub fn strip_leading_bullets(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '*' || c == '-' || c == BULLET || c.is_whitespace())
        .trim_end()
}

/// Every `*` becomes a bullet; generated text is displayed verbatim otherwise
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', &BULLET.to_string())
}

/// Turn a stored markdown-ish summary into plain display text.
///
/// ` **` openers are dropped, `** ` closers become line breaks and a `*` at
/// the start of a line becomes a bullet.
pub fn format_summary(summary: &str) -> String {
    static LINE_BULLET: OnceLock<Regex> = OnceLock::new();

    if summary.is_empty() {
        return String::new();
    }

    let formatted = summary.replace(" **", "").replace("** ", "\n");
    let re = LINE_BULLET.get_or_init(|| Regex::new(r"(?m)^\*").expect("static regex"));
    re.replace_all(&formatted, BULLET.to_string().as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_generated_label() {
        let mut record = PaperRecord::new("A long title");
        record.label = Some("**Spaceflight** bone loss".into());
        assert_eq!(display_label(&record), "Spaceflight bone loss");
    }

    #[test]
    fn test_label_falls_back_to_title() {
        let mut record = PaperRecord::new("* - Muscle atrophy in mice");
        assert_eq!(display_label(&record), "Muscle atrophy in mice");

        record.label = Some("**".into());
        assert_eq!(display_label(&record), "Muscle atrophy in mice");
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("* one\n* two"), "• one\n• two");
        assert_eq!(strip_emphasis("plain"), "plain");
    }

    #[test]
    fn test_format_summary() {
        let summary = "Overview **Findings** text\n*first\n*second";
        assert_eq!(format_summary(summary), "OverviewFindings\ntext\n•first\n•second");
        assert_eq!(format_summary(""), "");
    }
}
