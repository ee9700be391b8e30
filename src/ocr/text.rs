//! Flatten an OCR result into plain text suitable for a prompt

use super::types::OcrResponse;
use regex::Regex;
use std::sync::OnceLock;

struct MarkdownPatterns {
    image: Regex,
    link: Regex,
    heading: Regex,
}

fn patterns() -> &'static MarkdownPatterns {
    static PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkdownPatterns {
        image: Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image regex"),
        link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid link regex"),
        heading: Regex::new(r"#{1,6}\s+").expect("valid heading regex"),
    })
}

/// Drop images, unwrap links and strip heading/emphasis/code markers
pub fn clean_markdown(markdown: &str) -> String {
    let p = patterns();
    let text = p.image.replace_all(markdown, "");
    let text = p.link.replace_all(&text, "$1");
    let text = p.heading.replace_all(&text, "");
    text.replace("**", "")
        .replace('*', "")
        .replace('`', "")
        .trim()
        .to_string()
}

/// Plain text of the whole document: top-level text, then each page,
/// then tables. Falls back to the JSON form of the response when nothing
/// textual was extracted.
pub fn extract_clean_text(ocr: &OcrResponse) -> String {
    let mut out = String::new();

    if let Some(text) = ocr.text.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(text);
        out.push_str("\n\n");
    }

    for (index, page) in ocr.pages.iter().enumerate() {
        let body = match (page.text.as_deref(), page.markdown.as_deref()) {
            (Some(text), _) if !text.is_empty() => Some(text.to_string()),
            (_, Some(markdown)) => Some(clean_markdown(markdown)).filter(|m| !m.is_empty()),
            _ => None,
        };
        if let Some(body) = body {
            out.push_str(&format!("--- Page {} ---\n{}\n\n", index + 1, body));
        }

        for block in &page.blocks {
            if let Some(markdown) = &block.markdown {
                let cleaned = clean_markdown(markdown);
                if !cleaned.is_empty() {
                    out.push_str(&cleaned);
                    out.push('\n');
                }
            }
            if let Some(text) = block.text.as_deref().filter(|t| !t.is_empty()) {
                out.push_str(text);
                out.push('\n');
            }
        }
    }

    for (index, table) in ocr.tables.iter().enumerate() {
        out.push_str(&format!("--- Table {} ---\n", index + 1));
        if !table.headers.is_empty() {
            out.push_str(&table.headers.join(" | "));
            out.push('\n');
        }
        for row in &table.data {
            out.push_str(&row.join(" | "));
            out.push('\n');
        }
        out.push('\n');
    }

    if out.is_empty() {
        serde_json::to_string(ocr).unwrap_or_default()
    } else {
        out
    }
}
