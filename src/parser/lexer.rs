//! Lexer (tokenizer) for source text
//!
//! Converts a character stream into an ordered sequence of [`Token`]s, one
//! token per call to [`Lexer::next_token`]. The lexer has no grammar
//! knowledge; the parser pulls from it through
//! [`TokenStream`](crate::parser::stream::TokenStream).
//!
//! The character source is any `Iterator<Item = char>`. The lexer keeps at
//! most one character it has looked at but not yet classified, so the
//! source never needs an "unget" primitive.

use super::ast::SourceLocation;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::Chars;
use thiserror::Error;

/// Closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Identifiers and literals
    Ident,
    IntConst,
    CharConst,
    StrConst,

    // Keywords
    Const,
    Int,
    Char,
    Void,
    Main,
    If,
    Else,
    Do,
    While,
    For,
    Scanf,
    Printf,
    Return,

    // Operators
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=
    EqEq,  // ==
    NotEq, // !=
    Assign, // =

    // Punctuation
    Semicolon, // ;
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }

    // End of input
    Eof,
}

impl TokenKind {
    /// Category code printed in terminal trace records.
    pub fn code(self) -> &'static str {
        match self {
            TokenKind::Ident => "IDENFR",
            TokenKind::IntConst => "INTCON",
            TokenKind::CharConst => "CHARCON",
            TokenKind::StrConst => "STRCON",
            TokenKind::Const => "CONSTTK",
            TokenKind::Int => "INTTK",
            TokenKind::Char => "CHARTK",
            TokenKind::Void => "VOIDTK",
            TokenKind::Main => "MAINTK",
            TokenKind::If => "IFTK",
            TokenKind::Else => "ELSETK",
            TokenKind::Do => "DOTK",
            TokenKind::While => "WHILETK",
            TokenKind::For => "FORTK",
            TokenKind::Scanf => "SCANFTK",
            TokenKind::Printf => "PRINTFTK",
            TokenKind::Return => "RETURNTK",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINU",
            TokenKind::Star => "MULT",
            TokenKind::Slash => "DIV",
            TokenKind::Lt => "LSS",
            TokenKind::Le => "LEQ",
            TokenKind::Gt => "GRE",
            TokenKind::Ge => "GEQ",
            TokenKind::EqEq => "EQL",
            TokenKind::NotEq => "NEQ",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Semicolon => "SEMICN",
            TokenKind::Comma => "COMMA",
            TokenKind::LParen => "LPARENT",
            TokenKind::RParen => "RPARENT",
            TokenKind::LBracket => "LBRACK",
            TokenKind::RBracket => "RBRACK",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Eof => "EOF",
        }
    }

    /// `int` or `char`, the types a declaration can start with.
    pub fn is_value_type(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Char)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge
                | TokenKind::EqEq
                | TokenKind::NotEq
        )
    }

    pub fn is_additive(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, TokenKind::Star | TokenKind::Slash)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::IntConst => write!(f, "integer literal"),
            TokenKind::CharConst => write!(f, "char literal"),
            TokenKind::StrConst => write!(f, "string literal"),
            TokenKind::Const => write!(f, "'const'"),
            TokenKind::Int => write!(f, "'int'"),
            TokenKind::Char => write!(f, "'char'"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::Main => write!(f, "'main'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Scanf => write!(f, "'scanf'"),
            TokenKind::Printf => write!(f, "'printf'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// Reserved words. Matching is case-sensitive.
static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    [
        ("const", TokenKind::Const),
        ("int", TokenKind::Int),
        ("char", TokenKind::Char),
        ("void", TokenKind::Void),
        ("main", TokenKind::Main),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("do", TokenKind::Do),
        ("while", TokenKind::While),
        ("for", TokenKind::For),
        ("scanf", TokenKind::Scanf),
        ("printf", TokenKind::Printf),
        ("return", TokenKind::Return),
    ]
    .into_iter()
    .collect()
});

/// A classified lexical unit.
///
/// For string and char literals `lexeme` holds the text between the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenKind::Eof, "", location)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// `CODE lexeme`, the line format of token listings and trace records.
    pub fn listing(&self) -> Listing<'_> {
        Listing(self)
    }
}

/// Display adapter returned by [`Token::listing`].
pub struct Listing<'a>(&'a Token);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.kind.code(), self.0.lexeme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::IntConst => write!(f, "integer literal {}", self.lexeme),
            TokenKind::CharConst => write!(f, "char literal '{}'", self.lexeme),
            TokenKind::StrConst => write!(f, "string literal \"{}\"", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal starting at {0}")]
    UnterminatedString(SourceLocation),

    #[error("unterminated char literal starting at {0}")]
    UnterminatedChar(SourceLocation),

    #[error("'!' must be followed by '=' at {0}")]
    BareBang(SourceLocation),

    #[error("unexpected character {ch:?} at {location}")]
    UnexpectedChar { ch: char, location: SourceLocation },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnterminatedString(loc)
            | LexError::UnterminatedChar(loc)
            | LexError::BareBang(loc)
            | LexError::UnexpectedChar { location: loc, .. } => *loc,
        }
    }
}

/// Lexer over a character stream
pub struct Lexer<I: Iterator<Item = char>> {
    chars: I,
    /// Character read from `chars` but not yet consumed.
    pending: Option<char>,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Lexer<Chars<'a>> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'a str) -> Self {
        Self::from_chars(input.chars())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn from_chars(chars: I) -> Self {
        Self {
            chars,
            pending: None,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Tokenize the entire input. The end-of-input marker is not included.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    /// Return the next token, or an end-of-input token once the source is
    /// exhausted. Calling again after end of input keeps returning it.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::eof(loc));
        };

        match ch {
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '0'..='9' => Ok(self.number_literal(ch, loc)),

            '"' => {
                let text = self
                    .quoted('"')
                    .ok_or(LexError::UnterminatedString(loc))?;
                Ok(Token::new(TokenKind::StrConst, text, loc))
            }

            '\'' => {
                let text = self
                    .quoted('\'')
                    .ok_or(LexError::UnterminatedChar(loc))?;
                Ok(Token::new(TokenKind::CharConst, text, loc))
            }

            '<' => Ok(self.with_optional_eq(ch, TokenKind::Lt, TokenKind::Le, loc)),
            '>' => Ok(self.with_optional_eq(ch, TokenKind::Gt, TokenKind::Ge, loc)),
            '=' => Ok(self.with_optional_eq(ch, TokenKind::Assign, TokenKind::EqEq, loc)),
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::NotEq, "!=", loc))
                } else {
                    Err(LexError::BareBang(loc))
                }
            }

            _ => match single_char_kind(ch) {
                Some(kind) => Ok(Token::new(kind, ch.to_string(), loc)),
                None => Err(LexError::UnexpectedChar { ch, location: loc }),
            },
        }
    }

    /// Identifier or reserved word starting with `first_char`.
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = KEYWORDS.get(ident.as_str()).copied().unwrap_or(TokenKind::Ident);
        Token::new(kind, ident, loc)
    }

    /// Unsigned integer literal, kept as its digit text.
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::IntConst, digits, loc)
    }

    /// Text up to the closing `quote`, which is consumed but not included.
    /// `None` if the source ends first.
    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.advance()? {
                ch if ch == quote => return Some(text),
                ch => text.push(ch),
            }
        }
    }

    /// `single` or, when the next character is `=`, the two-character `double`.
    fn with_optional_eq(
        &mut self,
        first: char,
        single: TokenKind,
        double: TokenKind,
        loc: SourceLocation,
    ) -> Token {
        if self.peek() == Some('=') {
            self.advance();
            Token::new(double, format!("{first}="), loc)
        } else {
            Token::new(single, first.to_string(), loc)
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_whitespace() || ch == '\x0b') {
            self.advance();
        }
    }

    /// Look at the next character, pulling it from the source if needed.
    fn peek(&mut self) -> Option<char> {
        if self.pending.is_none() {
            self.pending = self.chars.next();
        }
        self.pending
    }

    /// Consume the next character.
    fn advance(&mut self) -> Option<char> {
        let ch = self.pending.take().or_else(|| self.chars.next())?;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to, not including, end of input. Stops after the
    /// first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is(TokenKind::Eof) => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

fn single_char_kind(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        _ => return None,
    };
    Some(kind)
}
