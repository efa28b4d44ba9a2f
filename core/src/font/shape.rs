/// Opening delimiter of an inline icon tag (`<icon:ID>`).
pub const ICON_TAG_OPEN: &str = "<icon:";
/// Closing delimiter of an inline icon tag.
pub const ICON_TAG_CLOSE: char = '>';

/// A unit of laid out text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Char(char),
    Space,
    Icon(&'a str),
}

/// Splits `text` into tokens.
///
/// `<icon:ID>` becomes one `Icon` token; an opening delimiter with no closing
/// `>` after it is ordinary text.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

/// Iterator returned by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(tail) = self.rest.strip_prefix(ICON_TAG_OPEN) {
            if let Some(end) = tail.find(ICON_TAG_CLOSE) {
                let id = &tail[..end];
                self.rest = &tail[end + ICON_TAG_CLOSE.len_utf8()..];
                return Some(Token::Icon(id));
            }
        }

        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(if c == ' ' { Token::Space } else { Token::Char(c) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            tokenize("a b").collect::<Vec<_>>(),
            vec![Token::Char('a'), Token::Space, Token::Char('b')]
        );
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn test_icon_tags() {
        assert_eq!(
            tokenize("x<icon:heart>y<icon:>").collect::<Vec<_>>(),
            vec![Token::Char('x'), Token::Icon("heart"), Token::Char('y'), Token::Icon("")]
        );
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        let tokens = tokenize("<icon:oops").collect::<Vec<_>>();
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[0], Token::Char('<'));
        assert_eq!(tokens[5], Token::Char(':'));
        assert!(tokens.iter().all(|t| matches!(t, Token::Char(_))));
    }

    #[test]
    fn test_tag_closes_at_first_delimiter() {
        assert_eq!(
            tokenize("<icon:a>b>").collect::<Vec<_>>(),
            vec![Token::Icon("a"), Token::Char('b'), Token::Char('>')]
        );
    }

    #[test]
    fn test_multibyte() {
        assert_eq!(tokenize("é<icon:ü>").collect::<Vec<_>>(), vec![Token::Char('é'), Token::Icon("ü")]);
    }
}
