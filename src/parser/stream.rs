//! Lookahead buffer between the lexer and the parser
//!
//! [`TokenStream`] gives the parser two primitives over a [`TokenSource`]:
//!
//! - [`TokenStream::advance`] consumes the token at the cursor;
//! - [`TokenStream::peek`] looks `k` tokens ahead without consuming.
//!
//! Tokens fetched for a peek are cached in order and handed out again by
//! later `advance` calls, so lookahead never drops, duplicates or reorders
//! input and the source is never asked for the same token twice.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{LexError, Lexer, Token};
use log::trace;

/// Anything that can hand out tokens one at a time.
///
/// Once exhausted a source must keep returning an end-of-input token.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, LexError>;
}

impl<I: Iterator<Item = char>> TokenSource for Lexer<I> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Lexer::next_token(self)
    }
}

/// Pre-lexed tokens, used to drive single productions in tests and to
/// re-parse a token listing.
#[derive(Debug, Clone)]
pub struct TokenVec {
    tokens: std::vec::IntoIter<Token>,
    end: SourceLocation,
}

impl TokenVec {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|t| {
                let width = t.lexeme.chars().count();
                SourceLocation::new(t.location.line, t.location.column + width)
            })
            .unwrap_or_else(|| SourceLocation::new(1, 1));
        Self {
            tokens: tokens.into_iter(),
            end,
        }
    }
}

impl TokenSource for TokenVec {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Ok(self.tokens.next().unwrap_or_else(|| Token::eof(self.end)))
    }
}

/// Token buffer with a consume cursor.
///
/// `buffer[cursor..]` is always exactly the sequence the source would
/// produce next.
pub struct TokenStream<S: TokenSource> {
    source: S,
    buffer: Vec<Token>,
    cursor: usize,
    /// Tokens consumed over the whole session, for diagnostics.
    consumed: usize,
}

impl<S: TokenSource> TokenStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            cursor: 0,
            consumed: 0,
        }
    }

    /// Return the token at the cursor and move past it.
    pub fn advance(&mut self) -> Result<Token, LexError> {
        self.fill(1)?;
        let token = self.buffer[self.cursor].clone();
        self.cursor += 1;
        self.consumed += 1;

        // Everything before the cursor is dead; drop it once the buffer drains.
        if self.cursor == self.buffer.len() {
            self.buffer.clear();
            self.cursor = 0;
        }

        Ok(token)
    }

    /// Look at the `k`-th unconsumed token (`k = 1` is the next one).
    ///
    /// # Panics
    ///
    /// Panics if `k` is zero.
    pub fn peek(&mut self, k: usize) -> Result<&Token, LexError> {
        assert!(k >= 1, "peek index starts at 1");
        self.fill(k)?;
        Ok(&self.buffer[self.cursor + k - 1])
    }

    /// Number of tokens consumed so far, i.e. the 0-based index of the
    /// next token in the whole token sequence.
    pub fn position(&self) -> usize {
        self.consumed
    }

    /// Number of fetched but unconsumed tokens.
    pub fn buffered(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    fn fill(&mut self, k: usize) -> Result<(), LexError> {
        while self.buffer.len() < self.cursor + k {
            let token = self.source.next_token()?;
            trace!(
                "fetched {} {:?} at {}",
                token.kind.code(),
                token.lexeme,
                token.location
            );
            self.buffer.push(token);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;

    /// Source that counts how often it is asked for a token.
    struct Counting {
        inner: Lexer<std::vec::IntoIter<char>>,
        calls: usize,
    }

    impl Counting {
        fn new(source: &str) -> Self {
            Self {
                inner: Lexer::from_chars(source.chars().collect::<Vec<_>>().into_iter()),
                calls: 0,
            }
        }
    }

    impl TokenSource for Counting {
        fn next_token(&mut self) -> Result<Token, LexError> {
            self.calls += 1;
            self.inner.next_token()
        }
    }

    fn stream(source: &str) -> TokenStream<Lexer<std::str::Chars<'_>>> {
        TokenStream::new(Lexer::new(source))
    }

    #[test]
    fn test_advance_in_order() {
        let mut s = stream("a = 1 ;");

        assert_eq!(s.advance().unwrap().lexeme, "a");
        assert_eq!(s.advance().unwrap().lexeme, "=");
        assert_eq!(s.advance().unwrap().lexeme, "1");
        assert_eq!(s.advance().unwrap().lexeme, ";");
        assert!(s.advance().unwrap().is(TokenKind::Eof));
        assert_eq!(s.position(), 5);
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut s = stream("int x ( ) ;");

        let first = s.peek(3).unwrap().clone();
        let second = s.peek(3).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.kind, TokenKind::LParen);
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_advance_after_peek_returns_peeked_sequence() {
        let mut s = stream("void f ( int a ) { }");

        let peeked: Vec<Token> = (1..=5).map(|k| s.peek(k).unwrap().clone()).collect();
        let advanced: Vec<Token> = (0..5).map(|_| s.advance().unwrap()).collect();

        assert_eq!(peeked, advanced);
        assert_eq!(s.peek(1).unwrap().kind, TokenKind::RParen);
    }

    #[test]
    fn test_peek_one_matches_next_advance() {
        let mut s = stream("x [ 2 ]");

        s.peek(4).unwrap();
        let next = s.peek(1).unwrap().clone();
        assert_eq!(s.advance().unwrap(), next);

        let next = s.peek(1).unwrap().clone();
        assert_eq!(s.advance().unwrap(), next);
        assert_eq!(s.buffered(), 2);
    }

    #[test]
    fn test_tokens_fetched_once() {
        let mut s = TokenStream::new(Counting::new("a b c"));

        s.peek(3).unwrap();
        s.peek(2).unwrap();
        s.peek(1).unwrap();
        assert_eq!(s.source.calls, 3);

        for _ in 0..3 {
            s.advance().unwrap();
        }
        assert_eq!(s.source.calls, 3);

        s.advance().unwrap();
        assert_eq!(s.source.calls, 4);
    }

    #[test]
    fn test_peek_past_end_yields_eof() {
        let mut s = stream("a");

        assert!(s.peek(4).unwrap().is(TokenKind::Eof));
        assert_eq!(s.advance().unwrap().lexeme, "a");
        assert!(s.peek(1).unwrap().is(TokenKind::Eof));
    }

    #[test]
    fn test_lex_error_surfaces_on_peek() {
        let mut s = stream("a ! b");

        assert_eq!(s.peek(1).unwrap().lexeme, "a");
        assert!(matches!(s.peek(2), Err(LexError::BareBang(_))));
    }

    #[test]
    fn test_token_vec_source() {
        let loc = SourceLocation::new(1, 1);
        let mut s = TokenStream::new(TokenVec::new(vec![
            Token::new(TokenKind::Ident, "f", loc),
            Token::new(TokenKind::LParen, "(", SourceLocation::new(1, 2)),
        ]));

        assert_eq!(s.peek(2).unwrap().kind, TokenKind::LParen);
        let eof = s.peek(3).unwrap();
        assert!(eof.is(TokenKind::Eof));
        assert_eq!(eof.location, SourceLocation::new(1, 3));
    }
}
