use tracing::{trace, warn};

use crate::markup::{decode_entities, strip_cdata, tokenize, MarkupError, Tag, TagKind, Token};

pub const NO_REVIEW_TEXT: &str = "No review text available.";
pub const REVIEW_PARSE_ERROR: &str = "Error parsing review text.";

/// Letterboxd sometimes leads the description with this boilerplate
const PUBLISHED_MARKER: &str = "review published on letterboxd:";

/// Turn an HTML review description into plain paragraphs.
///
/// Never fails: empty reviews become [`NO_REVIEW_TEXT`] and markup we cannot
/// read becomes [`REVIEW_PARSE_ERROR`].
pub fn normalize_review_text(description: &str) -> String {
    match extract_review_text(description) {
        Ok(text) if text.is_empty() => NO_REVIEW_TEXT.to_string(),
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to parse review description");
            REVIEW_PARSE_ERROR.to_string()
        }
    }
}

/// Paragraphs of the review joined by blank lines, or an empty string.
pub fn extract_review_text(description: &str) -> Result<String, MarkupError> {
    let content = strip_cdata(description)?;
    let tokens = tokenize(content.trim());

    let paragraphs: Vec<String> = split_paragraphs(&tokens)
        .into_iter()
        .filter_map(|block| {
            if is_image_only(block) {
                trace!("Skipping image-only paragraph");
                return None;
            }
            let text = render_block(block);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect();

    let joined = collapse_blank_lines(&paragraphs.join("\n\n"));
    Ok(strip_published_prefix(joined.trim()).to_string())
}

/// Group tokens into `<p>` blocks. Markup without any paragraph tags is
/// treated as a single block.
fn split_paragraphs<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    let mut blocks = Vec::new();
    let mut open_at: Option<usize> = None;
    let mut saw_paragraph = false;

    for (idx, token) in tokens.iter().enumerate() {
        let Token::Tag(tag) = token else { continue };
        if !tag.is("p") {
            continue;
        }
        match (tag.kind, open_at) {
            (TagKind::Open, None) => {
                saw_paragraph = true;
                open_at = Some(idx + 1);
            }
            (TagKind::Close, Some(start)) => {
                blocks.push(&tokens[start..idx]);
                open_at = None;
            }
            // Nested <p>, stray </p> or <p/>: nothing to open or close
            _ => {}
        }
    }

    if let Some(start) = open_at {
        blocks.push(&tokens[start..]);
    }
    if !saw_paragraph {
        blocks.push(tokens);
    }
    blocks
}

fn is_image_only(block: &[Token<'_>]) -> bool {
    let mut has_image = false;
    for token in block {
        match token {
            Token::Tag(tag) if tag.is("img") => has_image = true,
            Token::Tag(Tag {
                kind: TagKind::Declaration,
                ..
            }) => {}
            Token::Text(text) if text.trim().is_empty() => {}
            _ => return false,
        }
    }
    has_image
}

fn render_block(block: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in block {
        match token {
            Token::Text(text) => out.push_str(&decode_entities(text)),
            Token::Tag(tag) if tag.is("br") => out.push('\n'),
            Token::Tag(_) => {}
        }
    }
    out
}

/// Runs of three or more newlines become exactly two.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

fn strip_published_prefix(text: &str) -> &str {
    // ASCII lowering keeps byte offsets aligned with `text`
    let lowered = text.to_ascii_lowercase();
    match lowered.find(PUBLISHED_MARKER) {
        Some(pos) if !text[..pos].contains(':') && !text[..pos].contains('\n') => {
            text[pos + PUBLISHED_MARKER.len()..].trim_start()
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_joined_with_blank_line() {
        let html = "<![CDATA[<p>First thought.</p> <p>Second &amp; final.</p>]]>";
        assert_eq!(normalize_review_text(html), "First thought.\n\nSecond & final.");
    }

    #[test]
    fn test_line_breaks_and_inline_tags() {
        let html = "<p>Line one<br />Line <em>two</em></p>";
        assert_eq!(normalize_review_text(html), "Line one\nLine two");
    }

    #[test]
    fn test_image_only_review_uses_placeholder() {
        let html = r#"<p><img src="https://a.ltrbxd.com/poster.jpg"/></p>"#;
        assert_eq!(normalize_review_text(html), NO_REVIEW_TEXT);
    }

    #[test]
    fn test_image_paragraph_skipped_but_text_kept() {
        let html = r#"<p><img src="x.jpg"/></p><p>Watched with friends.</p>"#;
        assert_eq!(normalize_review_text(html), "Watched with friends.");
    }

    #[test]
    fn test_empty_description_uses_placeholder() {
        assert_eq!(normalize_review_text(""), NO_REVIEW_TEXT);
        assert_eq!(normalize_review_text("<p>   </p><p></p>"), NO_REVIEW_TEXT);
    }

    #[test]
    fn test_unterminated_cdata_uses_error_placeholder() {
        assert_eq!(normalize_review_text("<![CDATA[<p>Lost"), REVIEW_PARSE_ERROR);
    }

    #[test]
    fn test_markup_without_paragraphs_is_one_block() {
        assert_eq!(normalize_review_text("Just <b>bold</b> words"), "Just bold words");
    }

    #[test]
    fn test_unclosed_paragraph_is_kept() {
        assert_eq!(normalize_review_text("<p>Done.</p><p>Trailing"), "Done.\n\nTrailing");
    }

    #[test]
    fn test_excess_newlines_collapsed() {
        let html = "<p>a<br><br><br><br>b</p>";
        assert_eq!(normalize_review_text(html), "a\n\nb");
    }

    #[test]
    fn test_published_prefix_removed() {
        let html = "<p>Dafandikri's review published on Letterboxd: Pure cinema.</p>";
        assert_eq!(normalize_review_text(html), "Pure cinema.");
    }

    #[test]
    fn test_prefix_marker_later_in_text_is_kept() {
        let html = "<p>Note: my review published on Letterboxd: later</p>";
        assert_eq!(
            normalize_review_text(html),
            "Note: my review published on Letterboxd: later"
        );
    }

    #[test]
    fn test_normalization_is_stable() {
        let once = normalize_review_text("<p>One</p><p>Two<br/>Three</p>");
        assert_eq!(normalize_review_text(&once), once);
    }
}
