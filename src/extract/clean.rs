//! Whitespace normalization for OCR output.

/// Clean raw OCR text: collapse intra-line whitespace runs to single spaces,
/// drop blank lines, collapse any remaining 3+ consecutive newlines down to a
/// single blank line, and trim the ends. Idempotent.
pub fn clean_ocr_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();

    let mut cleaned = lines.join("\n");
    while cleaned.contains("\n\n\n") {
        cleaned = cleaned.replace("\n\n\n", "\n\n");
    }

    cleaned.trim().to_string()
}
