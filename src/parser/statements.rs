//! Statement parsing implementation
//!
//! This module handles parsing of compound statements and every statement
//! form:
//!
//! - Assignments: `x = e;`, `a[i] = e;`
//! - Control flow: `if`/`else`, `while`, `do`/`while`, `for`
//! - Calls: `f(args);`
//! - I/O: `scanf(...)`, `printf(...)`
//! - `return`, blocks `{ ... }` and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! <复合语句> ::= [<常量说明>] [<变量说明>] <语句列>
//! <语句列>   ::= { <语句> }
//! <语句>     ::= <条件语句> | <循环语句> | '{' <语句列> '}'
//!              | <有返回值函数调用语句>; | <无返回值函数调用语句>;
//!              | <赋值语句>; | <读语句>; | <写语句>; | <空>; | <返回语句>;
//! <赋值语句> ::= <标识符> = <表达式> | <标识符> '[' <表达式> ']' = <表达式>
//! <条件语句> ::= if '(' <条件> ')' <语句> [ else <语句> ]
//! <条件>     ::= <表达式> <关系运算符> <表达式> | <表达式>
//! <循环语句> ::= while '(' <条件> ')' <语句>
//!              | do <语句> while '(' <条件> ')'
//!              | for '(' <标识符> = <表达式> ; <条件> ; <标识符> = <标识符> (+|-) <步长> ')' <语句>
//! <步长>     ::= <无符号整数>
//! <读语句>   ::= scanf '(' <标识符> { , <标识符> } ')'
//! <写语句>   ::= printf '(' <字符串> , <表达式> ')' | printf '(' <字符串> ')' | printf '(' <表达式> ')'
//! <返回语句> ::= return [ '(' <表达式> ')' ]
//! ```
//!
//! A call in statement position is always parsed as a void call: telling
//! the two call forms apart would need the callee's declaration, and the
//! parser keeps no symbol table.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::NonTerminal;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::stream::TokenSource;
use crate::trace::TraceSink;
use log::debug;

/// Statement form selected by the statement's first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementForm {
    Conditional,
    Loop,
    Block,
    Read,
    Write,
    Return,
    Empty,
    /// Assignment or call, decided by the token after the identifier.
    Identifier,
}

impl StatementForm {
    fn classify(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::If => Some(StatementForm::Conditional),
            TokenKind::While | TokenKind::Do | TokenKind::For => Some(StatementForm::Loop),
            TokenKind::LBrace => Some(StatementForm::Block),
            TokenKind::Scanf => Some(StatementForm::Read),
            TokenKind::Printf => Some(StatementForm::Write),
            TokenKind::Return => Some(StatementForm::Return),
            TokenKind::Semicolon => Some(StatementForm::Empty),
            TokenKind::Ident => Some(StatementForm::Identifier),
            TokenKind::IntConst
            | TokenKind::CharConst
            | TokenKind::StrConst
            | TokenKind::Const
            | TokenKind::Int
            | TokenKind::Char
            | TokenKind::Void
            | TokenKind::Main
            | TokenKind::Else
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Assign
            | TokenKind::Comma
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::RBrace
            | TokenKind::Eof => None,
        }
    }
}

impl<S: TokenSource, T: TraceSink> Parser<S, T> {
    /// Parse a function body (without its braces)
    pub(crate) fn parse_compound_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::CompoundStmt, |p| {
            if p.check(TokenKind::Const)? {
                p.parse_const_decl()?;
            }
            if p.at_var_definition()? {
                p.parse_var_decl()?;
            }
            p.parse_stmt_list()
        })
    }

    /// Parse statements until a token that cannot start one
    pub(crate) fn parse_stmt_list(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::StmtList, |p| {
            while StatementForm::classify(p.current_kind()?).is_some() {
                p.parse_statement()?;
            }
            Ok(())
        })
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Statement, |p| {
            let Some(form) = StatementForm::classify(p.current_kind()?) else {
                return Err(p.unexpected("statement"));
            };

            match form {
                StatementForm::Conditional => p.parse_cond_stmt(),
                StatementForm::Loop => p.parse_loop_stmt(),
                StatementForm::Block => {
                    p.bump()?;
                    p.parse_stmt_list()?;
                    p.expect(TokenKind::RBrace)
                }
                StatementForm::Read => {
                    p.parse_read_stmt()?;
                    p.expect(TokenKind::Semicolon)
                }
                StatementForm::Write => {
                    p.parse_write_stmt()?;
                    p.expect(TokenKind::Semicolon)
                }
                StatementForm::Return => {
                    p.parse_return_stmt()?;
                    p.expect(TokenKind::Semicolon)
                }
                StatementForm::Empty => p.bump(),
                StatementForm::Identifier => {
                    if p.lookahead_kind(1)? == TokenKind::LParen {
                        debug!("identifier followed by '(' in statement position: void call");
                        p.parse_void_call()?;
                    } else {
                        debug!("identifier in statement position: assignment");
                        p.parse_assign_stmt()?;
                    }
                    p.expect(TokenKind::Semicolon)
                }
            }
        })
    }

    /// Parse an assignment, optionally to an array element
    pub(crate) fn parse_assign_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::AssignStmt, |p| {
            p.expect(TokenKind::Ident)?;
            if p.check(TokenKind::LBracket)? {
                p.bump()?;
                p.parse_expression()?;
                p.expect(TokenKind::RBracket)?;
            }
            p.expect(TokenKind::Assign)?;
            p.parse_expression()
        })
    }

    /// Parse if statement
    pub(crate) fn parse_cond_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::CondStmt, |p| {
            p.expect(TokenKind::If)?;
            p.expect(TokenKind::LParen)?;
            p.parse_condition()?;
            p.expect(TokenKind::RParen)?;
            p.parse_statement()?;

            if p.check(TokenKind::Else)? {
                p.bump()?;
                p.parse_statement()?;
            }
            Ok(())
        })
    }

    /// Parse a condition: an expression, optionally compared with another
    pub(crate) fn parse_condition(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Condition, |p| {
            p.parse_expression()?;
            if p.current_kind()?.is_relational() {
                p.bump()?;
                p.parse_expression()?;
            }
            Ok(())
        })
    }

    /// Parse while, do-while, or for loop
    pub(crate) fn parse_loop_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::LoopStmt, |p| match p.current_kind()? {
            TokenKind::While => {
                p.bump()?;
                p.expect(TokenKind::LParen)?;
                p.parse_condition()?;
                p.expect(TokenKind::RParen)?;
                p.parse_statement()
            }
            TokenKind::Do => {
                p.bump()?;
                p.parse_statement()?;
                p.expect(TokenKind::While)?;
                p.expect(TokenKind::LParen)?;
                p.parse_condition()?;
                p.expect(TokenKind::RParen)
            }
            TokenKind::For => {
                p.bump()?;
                p.expect(TokenKind::LParen)?;

                p.expect(TokenKind::Ident)?;
                p.expect(TokenKind::Assign)?;
                p.parse_expression()?;
                p.expect(TokenKind::Semicolon)?;

                p.parse_condition()?;
                p.expect(TokenKind::Semicolon)?;

                // The update is restricted to `id = id (+|-) <步长>`.
                p.expect(TokenKind::Ident)?;
                p.expect(TokenKind::Assign)?;
                p.expect(TokenKind::Ident)?;
                if !p.current_kind()?.is_additive() {
                    return Err(p.unexpected("'+' or '-' in for-loop step"));
                }
                p.bump()?;
                p.parse_step()?;

                p.expect(TokenKind::RParen)?;
                p.parse_statement()
            }
            _ => Err(p.unexpected("'while', 'do' or 'for'")),
        })
    }

    pub(crate) fn parse_step(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::Step, |p| p.parse_unsigned_integer())
    }

    /// Parse `scanf(a, b, ...)`
    pub(crate) fn parse_read_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ReadStmt, |p| {
            p.expect(TokenKind::Scanf)?;
            p.expect(TokenKind::LParen)?;
            p.expect(TokenKind::Ident)?;
            while p.check(TokenKind::Comma)? {
                p.bump()?;
                p.expect(TokenKind::Ident)?;
            }
            p.expect(TokenKind::RParen)
        })
    }

    /// Parse `printf("text")`, `printf("text", e)` or `printf(e)`
    pub(crate) fn parse_write_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::WriteStmt, |p| {
            p.expect(TokenKind::Printf)?;
            p.expect(TokenKind::LParen)?;

            if p.check(TokenKind::StrConst)? {
                p.production(NonTerminal::StringConst, |p| p.bump())?;
                if p.check(TokenKind::Comma)? {
                    p.bump()?;
                    p.parse_expression()?;
                }
            } else {
                p.parse_expression()?;
            }

            p.expect(TokenKind::RParen)
        })
    }

    /// Parse `return` or `return (e)`
    pub(crate) fn parse_return_stmt(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ReturnStmt, |p| {
            p.expect(TokenKind::Return)?;
            if p.check(TokenKind::LParen)? {
                p.bump()?;
                p.parse_expression()?;
                p.expect(TokenKind::RParen)?;
            }
            Ok(())
        })
    }
}
