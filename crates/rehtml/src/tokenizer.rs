//! Forgiving HTML tokenizer.
//!
//! Splits markup into start/end/self-closing tags, text, comments and
//! doctypes. It never fails: anything that does not look like a tag is text.
//!
//! - Tag and attribute names are ASCII-lowercased.
//! - Text, comments, doctypes and attribute values are kept verbatim; no
//!   character references are decoded.
//! - The body of a raw-text element (`script`, `style`, ...) comes back as a
//!   single text token, and `plaintext` swallows the rest of the input.
//! - A tag cut off by the end of input is dropped.

use memchr::memchr;
use once_cell::sync::Lazy;
use regex::Regex;
use rehtml_dom::{is_raw_text, Attribute};

use crate::token::{Attributes, LexError, Lexer, Token, TokenKind};

static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#).unwrap()
});

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const DOCTYPE_START: &str = "<!doctype";

/// Tokenizer over an in-memory document
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after the start tag of a raw-text element
    raw_text_tag: Option<String>,
    plaintext: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_tag: None,
            plaintext: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn finish(&mut self) -> Token {
        self.pos = self.input.len();
        Token::end_of_input()
    }

    fn scan(&mut self) -> Token {
        loop {
            if self.pos >= self.input.len() {
                return Token::end_of_input();
            }

            if self.plaintext {
                let text = self.rest();
                self.pos = self.input.len();
                return Token::text(text);
            }

            if let Some(tag) = self.raw_text_tag.take() {
                let end = find_close_tag(self.rest(), &tag)
                    .map_or(self.input.len(), |offset| self.pos + offset);
                if end > self.pos {
                    let text = &self.input[self.pos..end];
                    self.pos = end;
                    return Token::text(text);
                }
            }

            if !starts_markup(self.rest().as_bytes()) {
                return self.scan_text();
            }

            // `</>` produces nothing
            if let Some(token) = self.scan_markup() {
                return token;
            }
        }
    }

    fn scan_text(&mut self) -> Token {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut i = start + 1;
        while let Some(rel) = memchr(b'<', &bytes[i..]) {
            let at = i + rel;
            if starts_markup(&bytes[at..]) {
                self.pos = at;
                return Token::text(&self.input[start..at]);
            }
            i = at + 1;
        }
        self.pos = bytes.len();
        Token::text(&self.input[start..])
    }

    fn scan_markup(&mut self) -> Option<Token> {
        let rest = self.rest();

        if let Some(body) = rest.strip_prefix(COMMENT_START) {
            let (comment, consumed) = match body.find(COMMENT_END) {
                Some(end) => (&body[..end], COMMENT_START.len() + end + COMMENT_END.len()),
                None => (body, rest.len()),
            };
            self.pos += consumed;
            return Some(Token::comment(comment));
        }

        if rest
            .get(..DOCTYPE_START.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCTYPE_START))
        {
            let end = rest.find('>');
            let payload = &rest[DOCTYPE_START.len()..end.unwrap_or(rest.len())];
            self.pos += end.map_or(rest.len(), |e| e + 1);
            return Some(Token::doctype(payload.trim()));
        }

        let bytes = rest.as_bytes();
        match bytes[1] {
            b'!' => Some(self.scan_bogus_comment(2)),
            b'?' => Some(self.scan_bogus_comment(1)),
            b'/' if bytes[2] == b'>' => {
                self.pos += 3;
                None
            }
            b'/' if bytes[2].is_ascii_alphabetic() => Some(self.scan_end_tag()),
            b'/' => Some(self.scan_bogus_comment(2)),
            _ => Some(self.scan_start_tag()),
        }
    }

    fn scan_bogus_comment(&mut self, skip: usize) -> Token {
        let rest = self.rest();
        let body = &rest[skip..];
        match body.find('>') {
            Some(end) => {
                self.pos += skip + end + 1;
                Token::comment(&body[..end])
            }
            None => {
                self.pos = self.input.len();
                Token::comment(body)
            }
        }
    }

    fn scan_end_tag(&mut self) -> Token {
        let rest = self.rest();
        let name_end = 2 + tag_name_len(&rest[2..]);
        let name = rest[2..name_end].to_ascii_lowercase();
        match rest[name_end..].find('>') {
            Some(gt) => {
                self.pos += name_end + gt + 1;
                Token::end_tag(&name)
            }
            None => self.finish(),
        }
    }

    fn scan_start_tag(&mut self) -> Token {
        let rest = self.rest();
        let name_end = 1 + tag_name_len(&rest[1..]);
        let name = rest[1..name_end].to_ascii_lowercase();
        let Some(gt) = find_tag_end(rest.as_bytes(), name_end) else {
            return self.finish();
        };
        self.pos += gt + 1;

        let mut source = &rest[name_end..gt];
        let self_closing = source.ends_with('/') && !ends_in_unquoted_value(source);
        if self_closing {
            source = &source[..source.len() - 1];
        }

        let kind = if self_closing {
            TokenKind::SelfClosingTag
        } else {
            if name == "plaintext" {
                self.plaintext = true;
            } else if is_raw_text(&name) {
                self.raw_text_tag = Some(name.clone());
            }
            TokenKind::StartTag
        };

        Token {
            kind,
            data: name,
            attributes: parse_attributes(source),
        }
    }
}

impl Lexer for Tokenizer<'_> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Ok(self.scan())
    }
}

/// `<` followed by something that can open a tag, comment or declaration
fn starts_markup(rest: &[u8]) -> bool {
    if rest.first() != Some(&b'<') {
        return false;
    }
    match rest.get(1) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'!' || *b == b'?' => true,
        Some(b'/') => rest.len() > 2,
        _ => false,
    }
}

fn tag_name_len(s: &str) -> usize {
    s.bytes()
        .position(|b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
        .unwrap_or(s.len())
}

/// Index of the `>` closing a tag, skipping quoted attribute values
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    let mut prev = 0u8;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if (b == b'"' || b == b'\'') && prev == b'=' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
        if !b.is_ascii_whitespace() {
            prev = b;
        }
    }
    None
}

fn parse_attributes(source: &str) -> Attributes {
    ATTRIBUTE_REGEX
        .captures_iter(source)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Attribute::new(caps[1].to_ascii_lowercase(), value)
        })
        .collect()
}

/// Whether the last attribute in `source` is an unquoted value running to
/// its end, as in `href=http://example.com/`
fn ends_in_unquoted_value(source: &str) -> bool {
    ATTRIBUTE_REGEX
        .captures_iter(source)
        .last()
        .and_then(|caps| caps.get(4))
        .is_some_and(|value| value.end() == source.len())
}

/// Offset of `</tag` followed by whitespace, `/`, `>` or end of input
fn find_close_tag(haystack: &str, tag: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut i = 0;
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        let at = i + rel;
        let name_start = at + 2;
        let name_end = name_start + tag.len();
        if bytes.get(at + 1) == Some(&b'/')
            && bytes
                .get(name_start..name_end)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag.as_bytes()))
            && bytes
                .get(name_end)
                .map_or(true, |b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>')
        {
            return Some(at);
        }
        i = at + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            if token.is_end_of_input() {
                return tokens;
            }
            tokens.push(token);
        }
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            tokenize("<p>Hello</p>"),
            vec![Token::start_tag("p", vec![]), Token::text("Hello"), Token::end_tag("p")]
        );
    }

    #[test]
    fn test_names_are_lowercased() {
        assert_eq!(
            tokenize("<DIV ID=x></Div>"),
            vec![Token::start_tag("div", vec![("id", "x")]), Token::end_tag("div")]
        );
    }

    #[test]
    fn test_attribute_forms() {
        let tokens = tokenize(r#"<input disabled value='a b' name="q" size=10 data-x = "y">"#);
        assert_eq!(
            tokens,
            vec![Token::start_tag(
                "input",
                vec![
                    ("disabled", ""),
                    ("value", "a b"),
                    ("name", "q"),
                    ("size", "10"),
                    ("data-x", "y"),
                ],
            )]
        );
    }

    #[test]
    fn test_unquoted_url_value() {
        assert_eq!(
            tokenize("<a href=http://example.com>"),
            vec![Token::start_tag("a", vec![("href", "http://example.com")])]
        );
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        assert_eq!(
            tokenize(r#"<a title="1 > 0">x"#),
            vec![Token::start_tag("a", vec![("title", "1 > 0")]), Token::text("x")]
        );
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(
            tokenize(r#"<br/><img src="a.png" />"#),
            vec![
                Token::self_closing_tag("br", vec![]),
                Token::self_closing_tag("img", vec![("src", "a.png")]),
            ]
        );
    }

    #[test]
    fn test_unquoted_value_keeps_trailing_slash() {
        assert_eq!(
            tokenize("<a href=http://example.com/>Hi!</a>"),
            vec![
                Token::start_tag("a", vec![("href", "http://example.com/")]),
                Token::text("Hi!"),
                Token::end_tag("a"),
            ]
        );
        assert_eq!(
            tokenize("<div class=x/>"),
            vec![Token::start_tag("div", vec![("class", "x/")])]
        );
    }

    #[test]
    fn test_slash_after_attribute_closes_tag() {
        assert_eq!(
            tokenize(r#"<img src=a.png /><input disabled/><br id='x'/>"#),
            vec![
                Token::self_closing_tag("img", vec![("src", "a.png")]),
                Token::self_closing_tag("input", vec![("disabled", "")]),
                Token::self_closing_tag("br", vec![("id", "x")]),
            ]
        );
    }

    #[test]
    fn test_duplicate_attributes_are_kept() {
        assert_eq!(
            tokenize("<p class=a class=b>"),
            vec![Token::start_tag("p", vec![("class", "a"), ("class", "b")])]
        );
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            tokenize("a &amp; b < c"),
            vec![Token::text("a &amp; b < c")]
        );
    }

    #[test]
    fn test_comment_and_doctype() {
        assert_eq!(
            tokenize("<!DOCTYPE html><!-- note -->x"),
            vec![Token::doctype("html"), Token::comment(" note "), Token::text("x")]
        );
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        assert_eq!(tokenize("a<!-- b"), vec![Token::text("a"), Token::comment(" b")]);
    }

    #[test]
    fn test_bogus_comments() {
        assert_eq!(
            tokenize("<?xml version=\"1.0\"?><!foo></ 1>"),
            vec![
                Token::comment("?xml version=\"1.0\"?"),
                Token::comment("foo"),
                Token::comment(" 1"),
            ]
        );
    }

    #[test]
    fn test_empty_end_tag_is_dropped() {
        assert_eq!(tokenize("a</>b"), vec![Token::text("a"), Token::text("b")]);
    }

    #[test]
    fn test_script_body_is_raw_text() {
        assert_eq!(
            tokenize("<script>if (a<b) { x = '</p>'; }</SCRIPT >"),
            vec![
                Token::start_tag("script", vec![]),
                Token::text("if (a<b) { x = '</p>'; }"),
                Token::end_tag("script"),
            ]
        );
    }

    #[test]
    fn test_empty_raw_text_body() {
        assert_eq!(
            tokenize(r#"<script src="foo.js"></script>"#),
            vec![
                Token::start_tag("script", vec![("src", "foo.js")]),
                Token::end_tag("script"),
            ]
        );
    }

    #[test]
    fn test_plaintext_swallows_rest() {
        assert_eq!(
            tokenize("<plaintext><b>x</b>"),
            vec![Token::start_tag("plaintext", vec![]), Token::text("<b>x</b>")]
        );
    }

    #[test]
    fn test_truncated_tag_is_dropped() {
        assert_eq!(tokenize("Hi<a href=\"x"), vec![Token::text("Hi")]);
    }

    #[test]
    fn test_end_of_input_repeats() {
        let mut tokenizer = Tokenizer::new("");
        assert!(tokenizer.next_token().unwrap().is_end_of_input());
        assert!(tokenizer.next_token().unwrap().is_end_of_input());
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            tokenize("<p>こんにちは<br>世界</p>"),
            vec![
                Token::start_tag("p", vec![]),
                Token::text("こんにちは"),
                Token::start_tag("br", vec![]),
                Token::text("世界"),
                Token::end_tag("p"),
            ]
        );
    }
}
