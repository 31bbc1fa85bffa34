//! Marker and test-title extraction from test source text

use crate::model::ReferenceHit;
use regex::Regex;

/// `[bpmn:<id>]`, where `<id>` is any non-empty run of characters except `]`
const MARKER_PATTERN: &str = r"\[bpmn:([^\]]+)\]";

/// Finds `[bpmn:<id>]` markers and the test titles that contain them
#[derive(Debug, Clone)]
pub struct MarkerScanner {
    marker: Regex,
    /// `None` when no label keywords are configured
    label: Option<Regex>,
}

impl MarkerScanner {
    /// Build a scanner whose titles come from calls named by `keywords`
    /// (e.g. `test`, `it`, `describe`); `.modifier` chains such as
    /// `test.describe.only(` are accepted after the keyword.
    pub fn new(keywords: &[String]) -> crate::Result<Self> {
        let marker = Regex::new(MARKER_PATTERN)?;
        let label = if keywords.is_empty() {
            None
        } else {
            let names: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
            let pattern = format!(
                r#"\b(?:{})(?:\.\w+)*\s*\(\s*(?:'((?:[^'\\\r\n]|\\.)*)'|"((?:[^"\\\r\n]|\\.)*)"|`((?:[^`\\]|\\.)*)`)"#,
                names.join("|")
            );
            Some(Regex::new(&pattern)?)
        };
        Ok(Self { marker, label })
    }

    /// Scan one file's text. Hits are returned in offset order.
    pub fn scan_text(&self, source_file: &str, text: &str) -> Vec<ReferenceHit> {
        let labels = self.collect_labels(text);

        let mut hits = Vec::new();
        let mut line = 1;
        let mut counted_to = 0;

        for caps in self.marker.captures_iter(text) {
            let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            line += count_newlines(&text[counted_to..whole.start()]);
            counted_to = whole.start();

            let marker_text = whole.as_str();
            let associated_label = labels
                .iter()
                .find(|label| label.contains(marker_text))
                .map(|label| label.to_string());

            hits.push(ReferenceHit {
                referenced_id: id.as_str().to_string(),
                source_file: source_file.to_string(),
                source_line: line,
                associated_label,
            });
        }

        hits
    }

    /// Every string literal passed as the first argument of a test call
    fn collect_labels<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let Some(label) = &self.label else {
            return Vec::new();
        };
        label
            .captures_iter(text)
            .filter_map(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
            })
            .collect()
    }
}

fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> MarkerScanner {
        MarkerScanner::new(&["test".to_string(), "it".to_string(), "describe".to_string()])
            .unwrap()
    }

    fn ids(hits: &[ReferenceHit]) -> Vec<&str> {
        hits.iter().map(|h| h.referenced_id.as_str()).collect()
    }

    #[test]
    fn test_adjacent_markers_same_line() {
        let hits = scanner().scan_text("a.spec.ts", "// covers [bpmn:A][bpmn:B]\n");
        assert_eq!(ids(&hits), vec!["A", "B"]);
        assert_eq!(hits[0].source_line, 1);
        assert_eq!(hits[1].source_line, 1);
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let text = "import { test } from '@playwright/test';\n\n// [bpmn:Task_1]\nfoo();\n// [bpmn:Task_2] and [bpmn:Task_1]\n";
        let hits = scanner().scan_text("a.spec.ts", text);
        let lines: Vec<usize> = hits.iter().map(|h| h.source_line).collect();
        assert_eq!(ids(&hits), vec!["Task_1", "Task_2", "Task_1"]);
        assert_eq!(lines, vec![3, 5, 5]);
    }

    #[test]
    fn test_associated_label_from_test_title() {
        let text = r#"
test.describe('checkout [bpmn:Group_1]', () => {
  test("pays by card [bpmn:Task_Pay]", async ({ page }) => {});
  it(`refunds [bpmn:Task_Refund]`, () => {});
  // stray reference [bpmn:Task_Pay]
  // untitled [bpmn:Task_Other]
});
"#;
        let hits = scanner().scan_text("a.spec.ts", text);
        assert_eq!(
            ids(&hits),
            vec!["Group_1", "Task_Pay", "Task_Refund", "Task_Pay", "Task_Other"]
        );
        assert_eq!(
            hits[0].associated_label.as_deref(),
            Some("checkout [bpmn:Group_1]")
        );
        assert_eq!(
            hits[1].associated_label.as_deref(),
            Some("pays by card [bpmn:Task_Pay]")
        );
        assert_eq!(
            hits[2].associated_label.as_deref(),
            Some("refunds [bpmn:Task_Refund]")
        );
        // first title containing the marker, wherever the marker occurs
        assert_eq!(hits[3].associated_label, hits[1].associated_label);
        assert_eq!(hits[4].associated_label, None);
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let text = "submit('x [bpmn:A]');\n";
        let hits = scanner().scan_text("a.spec.ts", text);
        assert_eq!(ids(&hits), vec!["A"]);
        assert_eq!(hits[0].associated_label, None);
    }

    #[test]
    fn test_no_keywords_means_no_labels() {
        let scanner = MarkerScanner::new(&[]).unwrap();
        let hits = scanner.scan_text("a.spec.ts", "test('t [bpmn:A]', () => {});");
        assert_eq!(ids(&hits), vec!["A"]);
        assert_eq!(hits[0].associated_label, None);
    }

    #[test]
    fn test_empty_and_unclosed_markers() {
        let hits = scanner().scan_text("a.spec.ts", "[bpmn:] [bpmn:Open");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_identifier_is_raw_text() {
        let hits = scanner().scan_text("a.spec.ts", "[bpmn: Task 1 ][bpmn:a[b]");
        assert_eq!(ids(&hits), vec![" Task 1 ", "a[b"]);
    }
}
