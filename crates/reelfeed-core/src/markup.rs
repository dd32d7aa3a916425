use thiserror::Error;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("CDATA section opened at byte {0} is never closed")]
    UnterminatedCdata(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
    /// Comments, doctypes and processing instructions
    Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lower-cased element name, empty for declarations
    pub name: String,
    pub kind: TagKind,
}

impl Tag {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Tag(Tag),
}

/// Remove a CDATA wrapper, keeping its content in place.
pub fn strip_cdata(content: &str) -> Result<String, MarkupError> {
    let Some(start) = content.find(CDATA_OPEN) else {
        return Ok(content.to_string());
    };
    let inner_start = start + CDATA_OPEN.len();
    let inner_len = content[inner_start..]
        .find(CDATA_CLOSE)
        .ok_or(MarkupError::UnterminatedCdata(start))?;
    let inner_end = inner_start + inner_len;

    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..start]);
    out.push_str(&content[inner_start..inner_end]);
    out.push_str(&content[inner_end + CDATA_CLOSE.len()..]);
    Ok(out)
}

/// Split markup into text runs and tags, without building a tree.
///
/// A `<` that does not start a tag, or a tag that never closes, is kept as
/// text. Quoted attribute values may contain `>`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' || !starts_tag(&bytes[pos + 1..]) {
            pos += 1;
            continue;
        }
        let Some(end) = find_tag_end(bytes, pos + 1) else {
            // Unclosed tag: everything that is left is text
            break;
        };
        if text_start < pos {
            tokens.push(Token::Text(&input[text_start..pos]));
        }
        tokens.push(Token::Tag(parse_tag(&input[pos + 1..end])));
        pos = end + 1;
        text_start = pos;
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

fn starts_tag(rest: &[u8]) -> bool {
    match rest.first() {
        Some(b) if b.is_ascii_alphabetic() => true,
        Some(b'/') => rest.get(1).is_some_and(|b| b.is_ascii_alphabetic()),
        Some(b'!') | Some(b'?') => true,
        _ => false,
    }
}

/// Index of the `>` closing a tag whose body starts at `from`
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &b) in bytes[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + offset),
            None => {}
        }
    }
    None
}

fn parse_tag(body: &str) -> Tag {
    if body.starts_with('!') || body.starts_with('?') {
        return Tag {
            name: String::new(),
            kind: TagKind::Declaration,
        };
    }

    let (kind, body) = match body.strip_prefix('/') {
        Some(rest) => (TagKind::Close, rest),
        None if body.trim_end().ends_with('/') => (TagKind::SelfClosing, body),
        None => (TagKind::Open, body),
    };
    let name = body
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    Tag { name, kind }
}

/// Decode the four entities Letterboxd escapes in review text.
/// Single pass, so `&amp;lt;` becomes `&lt;` and not `<`.
pub fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, char); 4] = [("&quot;", '"'), ("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>')];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, kind: TagKind) -> Token<'static> {
        Token::Tag(Tag {
            name: name.to_string(),
            kind,
        })
    }

    #[test]
    fn test_tokenize_simple_paragraph() {
        let tokens = tokenize("<p>Hello <em>there</em><br/>friend</p>");
        assert_eq!(
            tokens,
            vec![
                tag("p", TagKind::Open),
                Token::Text("Hello "),
                tag("em", TagKind::Open),
                Token::Text("there"),
                tag("em", TagKind::Close),
                tag("br", TagKind::SelfClosing),
                Token::Text("friend"),
                tag("p", TagKind::Close),
            ]
        );
    }

    #[test]
    fn test_tokenize_attributes_with_angle_brackets() {
        let tokens = tokenize(r#"<img alt="a > b" src='x.jpg'>after"#);
        assert_eq!(tokens, vec![tag("img", TagKind::Open), Token::Text("after")]);
    }

    #[test]
    fn test_tokenize_uppercase_and_declarations() {
        let tokens = tokenize("<P>x<!-- note --></P>");
        assert_eq!(
            tokens,
            vec![
                tag("p", TagKind::Open),
                Token::Text("x"),
                tag("", TagKind::Declaration),
                tag("p", TagKind::Close),
            ]
        );
    }

    #[test]
    fn test_tokenize_stray_angle_brackets_are_text() {
        assert_eq!(tokenize("3 < 4 and 5 > 2"), vec![Token::Text("3 < 4 and 5 > 2")]);
        assert_eq!(tokenize("a <b unclosed"), vec![Token::Text("a <b unclosed")]);
    }

    #[test]
    fn test_strip_cdata() {
        assert_eq!(strip_cdata("<![CDATA[<p>x</p>]]>").unwrap(), "<p>x</p>");
        assert_eq!(strip_cdata(" <p>plain</p> ").unwrap(), " <p>plain</p> ");
        assert_eq!(strip_cdata("<![CDATA[<p>x</p>"), Err(MarkupError::UnterminatedCdata(0)));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&quot;Tom &amp; Jerry&quot; &lt;3 &gt;"), "\"Tom & Jerry\" <3 >");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("AT&T &nbsp;"), "AT&T &nbsp;");
    }
}
