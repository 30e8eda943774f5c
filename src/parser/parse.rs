//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token-matching helpers, and the program entry
//! point.
//!
//! # Parser Architecture
//!
//! The Parser is a predictive recursive descent parser with one method per
//! grammar nonterminal:
//! - This module: Parser struct, helper methods, `<程序>`
//! - `declarations`: constant, variable and function definitions
//! - `statements`: statements, conditions and loops
//! - `expressions`: expressions, calls and integer literals
//!
//! The parser has no state of its own beyond the [`TokenStream`] cursor and
//! the call stack. It never backtracks: every choice between productions is
//! made by peeking at most three tokens ahead.
//!
//! # Trace
//!
//! Each matched token is reported to the [`TraceSink`] as it is consumed,
//! and each production reports its own completion after all of its
//! children, so the trace is a post-order walk of the derivation.

use crate::parser::ast::{NonTerminal, SourceLocation};
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parser::stream::{TokenSource, TokenStream, TokenVec};
use crate::trace::{TraceRecord, TraceSink};
use log::{debug, trace};
use std::io;
use std::str::Chars;
use thiserror::Error;

/// Parser error type
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    #[error(
        "parse error at {}: expected {expected}, found {found} (token #{index})",
        .found.location
    )]
    Unexpected {
        expected: String,
        found: Token,
        /// 0-based position of `found` in the token sequence.
        index: usize,
    },

    #[error("trace sink failed: {0}")]
    Sink(#[from] io::Error),

    #[error("input nested more than {limit} productions deep at {location}")]
    TooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

/// Maximum number of productions open at once.
///
/// Every parenthesized factor opens three (expression, term, factor), so
/// this allows roughly 170 levels of parentheses while keeping the
/// recursion well inside a 2 MiB thread stack.
pub const MAX_DEPTH: usize = 512;

/// Recursive descent parser emitting a derivation trace
pub struct Parser<S: TokenSource, T: TraceSink> {
    pub(crate) stream: TokenStream<S>,
    pub(crate) sink: T,
    /// Productions currently open.
    depth: usize,
}

impl<'a, T: TraceSink> Parser<Lexer<Chars<'a>>, T> {
    /// Parser reading source text directly.
    pub fn new(source: &'a str, sink: T) -> Self {
        Self::with_source(Lexer::new(source), sink)
    }
}

impl<T: TraceSink> Parser<TokenVec, T> {
    /// Parser over an already tokenized input.
    pub fn from_tokens(tokens: Vec<Token>, sink: T) -> Self {
        Self::with_source(TokenVec::new(tokens), sink)
    }
}

impl<S: TokenSource, T: TraceSink> Parser<S, T> {
    pub fn with_source(source: S, sink: T) -> Self {
        Self {
            stream: TokenStream::new(source),
            sink,
            depth: 0,
        }
    }

    /// Parse a whole program.
    ///
    /// ```text
    /// <程序> ::= [<常量说明>] [<变量说明>] {<有返回值函数定义> | <无返回值函数定义>} <主函数>
    /// ```
    ///
    /// The entry function must be followed by end of input.
    pub fn parse_program(&mut self) -> Result<(), ParseError> {
        debug!("parsing program");
        self.production(NonTerminal::Program, |p| {
            if p.check(TokenKind::Const)? {
                p.parse_const_decl()?;
            }

            if p.at_var_definition()? {
                p.parse_var_decl()?;
            }

            loop {
                match p.current_kind()? {
                    TokenKind::Int | TokenKind::Char => p.parse_value_func_def()?,
                    TokenKind::Void => {
                        if p.lookahead_kind(1)? == TokenKind::Main {
                            debug!("'void main' reached, leaving function definitions");
                            break;
                        }
                        p.parse_void_func_def()?;
                    }
                    _ => break,
                }
            }

            p.parse_main_func()?;

            if !p.check(TokenKind::Eof)? {
                return Err(p.unexpected("end of input after the main function"));
            }
            Ok(())
        })
    }

    /// Give back the trace sink.
    pub fn into_sink(self) -> T {
        self.sink
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    // ===== Helper methods =====

    /// Run `body` as the derivation of `nonterminal`, then emit its
    /// completion record.
    ///
    /// Fails with [`ParseError::TooDeep`] once [`MAX_DEPTH`] productions
    /// are open.
    pub(crate) fn production<F>(
        &mut self,
        nonterminal: NonTerminal,
        body: F,
    ) -> Result<(), ParseError>
    where
        F: FnOnce(&mut Self) -> Result<(), ParseError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                location: self.stream.peek(1)?.location,
            });
        }

        self.depth += 1;
        let result = self
            .sink
            .begin(nonterminal)
            .map_err(ParseError::from)
            .and_then(|()| body(self));
        self.depth -= 1;
        result?;

        trace!("completed {}", nonterminal);
        self.sink.record(TraceRecord::NonTerminal(nonterminal))?;
        Ok(())
    }

    pub(crate) fn current_kind(&mut self) -> Result<TokenKind, ParseError> {
        Ok(self.stream.peek(1)?.kind)
    }

    /// Kind of the token `n` positions after the current one.
    pub(crate) fn lookahead_kind(&mut self, n: usize) -> Result<TokenKind, ParseError> {
        Ok(self.stream.peek(n + 1)?.kind)
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.current_kind()? == kind)
    }

    /// Match the current token whatever it is.
    pub(crate) fn bump(&mut self) -> Result<(), ParseError> {
        let token = self.stream.advance()?;
        trace!("matched {} {:?}", token.kind.code(), token.lexeme);
        self.sink.record(TraceRecord::Terminal(token))?;
        Ok(())
    }

    /// Match the current token, which must be of `kind`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.check(kind)? {
            self.bump()
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    /// Match an `int` or `char` type specifier.
    pub(crate) fn expect_value_type(&mut self) -> Result<(), ParseError> {
        if self.current_kind()?.is_value_type() {
            self.bump()
        } else {
            Err(self.unexpected("type specifier 'int' or 'char'"))
        }
    }

    /// `int`/`char` followed by an identifier that is not followed by `(`.
    ///
    /// Separates a variable definition from a function definition, which
    /// share their first two tokens.
    pub(crate) fn at_var_definition(&mut self) -> Result<bool, ParseError> {
        if !self.current_kind()?.is_value_type() {
            return Ok(false);
        }
        if self.lookahead_kind(2)? == TokenKind::LParen {
            debug!("type specifier starts a function definition");
            Ok(false)
        } else {
            debug!("type specifier starts a variable definition");
            Ok(true)
        }
    }

    /// Error for the current token not starting `expected`.
    pub(crate) fn unexpected(&mut self, expected: impl Into<String>) -> ParseError {
        let index = self.stream.position();
        match self.stream.peek(1) {
            Ok(found) => ParseError::Unexpected {
                expected: expected.into(),
                found: found.clone(),
                index,
            },
            Err(err) => err.into(),
        }
    }
}
