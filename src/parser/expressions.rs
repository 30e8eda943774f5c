//! Expression parsing implementation
//!
//! Expressions are layered in three nonterminals, each left-associative:
//!
//! ```text
//! <表达式> ::= [+|-] <项> { (+|-) <项> }
//! <项>     ::= <因子> { (*|/) <因子> }
//! <因子>   ::= <标识符> | <标识符> '[' <表达式> ']' | '(' <表达式> ')'
//!            | <整数> | <字符> | <有返回值函数调用语句>
//! <整数>   ::= [+|-] <无符号整数>
//!
//! <有返回值函数调用语句> ::= <标识符> '(' <值参数表> ')'
//! <无返回值函数调用语句> ::= <标识符> '(' <值参数表> ')'
//! <值参数表>             ::= <表达式> { , <表达式> } | <空>
//! ```
//!
//! A sign is accepted in front of a whole expression and in front of an
//! integer literal factor, never in front of a term.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::NonTerminal;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::stream::TokenSource;
use crate::trace::TraceSink;
use log::debug;

impl<S: TokenSource, T: TraceSink> Parser<S, T> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Expression, |p| {
            if p.current_kind()?.is_additive() {
                p.bump()?;
            }
            p.parse_term()?;
            while p.current_kind()?.is_additive() {
                p.bump()?;
                p.parse_term()?;
            }
            Ok(())
        })
    }

    pub(crate) fn parse_term(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Term, |p| {
            p.parse_factor()?;
            while p.current_kind()?.is_multiplicative() {
                p.bump()?;
                p.parse_factor()?;
            }
            Ok(())
        })
    }

    pub(crate) fn parse_factor(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Factor, |p| match p.current_kind()? {
            TokenKind::Ident => match p.lookahead_kind(1)? {
                TokenKind::LParen => {
                    debug!("identifier followed by '(' in expression: value call");
                    p.parse_value_call()
                }
                TokenKind::LBracket => {
                    debug!("identifier followed by '[' in expression: array element");
                    p.bump()?;
                    p.bump()?;
                    p.parse_expression()?;
                    p.expect(TokenKind::RBracket)
                }
                _ => {
                    debug!("identifier in expression: plain variable");
                    p.bump()
                }
            },
            TokenKind::LParen => {
                debug!("'(' in expression: parenthesized expression");
                p.bump()?;
                p.parse_expression()?;
                p.expect(TokenKind::RParen)
            }
            TokenKind::IntConst | TokenKind::Plus | TokenKind::Minus => {
                debug!("integer literal factor");
                p.parse_integer()
            }
            TokenKind::CharConst => {
                debug!("char literal factor");
                p.bump()
            }
            _ => Err(p.unexpected("identifier, literal or '('")),
        })
    }

    /// Parse a call whose result is used: `f(a, b)`
    pub(crate) fn parse_value_call(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ValueCall, |p| p.parse_call_body())
    }

    /// Parse a call in statement position
    pub(crate) fn parse_void_call(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::VoidCall, |p| p.parse_call_body())
    }

    /// Parse call arguments, possibly none
    pub(crate) fn parse_arg_table(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ArgTable, |p| {
            if p.check(TokenKind::RParen)? {
                return Ok(());
            }
            p.parse_expression()?;
            while p.check(TokenKind::Comma)? {
                p.bump()?;
                p.parse_expression()?;
            }
            Ok(())
        })
    }

    pub(crate) fn parse_unsigned_integer(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::UnsignedInteger, |p| {
            p.expect(TokenKind::IntConst)
        })
    }

    /// Parse an optionally signed integer literal
    pub(crate) fn parse_integer(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Integer, |p| {
            if p.current_kind()?.is_additive() {
                p.bump()?;
            }
            p.parse_unsigned_integer()
        })
    }

    fn parse_call_body(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LParen)?;
        self.parse_arg_table()?;
        self.expect(TokenKind::RParen)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{NonTerminal, SourceLocation};
    use crate::parser::lexer::{Token, TokenKind};
    use crate::parser::parse::tests::production_lines;
    use crate::parser::parse::{ParseError, Parser};
    use crate::trace::TraceRecord;

    #[test_log::test]
    fn test_precedence_layers() {
        let lines = production_lines("a + b * 2", |p| p.parse_expression()).unwrap();

        assert_eq!(
            lines,
            vec![
                "IDENFR a",
                "<因子>",
                "<项>",
                "PLUS +",
                "IDENFR b",
                "<因子>",
                "MULT *",
                "INTCON 2",
                "<无符号整数>",
                "<整数>",
                "<因子>",
                "<项>",
                "<表达式>",
            ]
        );
    }

    #[test]
    fn test_leading_sign_and_signed_factor() {
        let lines = production_lines("- -3", |p| p.parse_expression()).unwrap();

        assert_eq!(
            lines,
            vec![
                "MINU -",
                "MINU -",
                "INTCON 3",
                "<无符号整数>",
                "<整数>",
                "<因子>",
                "<项>",
                "<表达式>",
            ]
        );
    }

    #[test_log::test]
    fn test_call_in_expression_is_value_call() {
        let lines = production_lines("f(x, 1) + g()", |p| p.parse_expression()).unwrap();

        assert_eq!(lines.iter().filter(|l| *l == "<有返回值函数调用语句>").count(), 2);
        assert!(!lines.contains(&"<无返回值函数调用语句>".to_string()));
        assert_eq!(lines.iter().filter(|l| *l == "<值参数表>").count(), 2);
    }

    #[test_log::test]
    fn test_indexed_and_parenthesized_factors() {
        let lines = production_lines("a[i] / (b - 'c')", |p| p.parse_term()).unwrap();

        assert_eq!(&lines[..3], ["IDENFR a", "LBRACK [", "IDENFR i"]);
        assert!(lines.contains(&"CHARCON c".to_string()));
        assert_eq!(lines.iter().filter(|l| *l == "<表达式>").count(), 2);
        assert_eq!(lines.last().unwrap(), "<项>");
    }

    #[test]
    fn test_factor_rejects_operator() {
        let err = production_lines("* 2", |p| p.parse_factor()).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { index: 0, .. }));
    }

    #[test]
    fn test_factor_from_seeded_tokens() {
        let loc = SourceLocation::new(1, 1);
        let tokens = vec![
            Token::new(TokenKind::Ident, "v", loc),
            Token::new(TokenKind::LBracket, "[", loc),
            Token::new(TokenKind::IntConst, "0", loc),
            Token::new(TokenKind::RBracket, "]", loc),
        ];

        let mut parser = Parser::from_tokens(tokens, Vec::new());
        parser.parse_factor().unwrap();
        let records = parser.into_sink();

        assert_eq!(records.last(), Some(&TraceRecord::NonTerminal(NonTerminal::Factor)));
        assert_eq!(
            records.iter().filter_map(TraceRecord::token_kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Ident,
                TokenKind::LBracket,
                TokenKind::IntConst,
                TokenKind::RBracket,
            ]
        );
    }
}
