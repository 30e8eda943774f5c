//! Declaration parsing implementation
//!
//! This module handles constant and variable declarations and the three
//! kinds of function definition.
//!
//! # Grammar
//!
//! ```text
//! <常量说明>         ::= const <常量定义> ; { const <常量定义> ; }
//! <常量定义>         ::= int <标识符> = <整数> { , <标识符> = <整数> }
//!                      | char <标识符> = <字符> { , <标识符> = <字符> }
//! <变量说明>         ::= <变量定义> ; { <变量定义> ; }
//! <变量定义>         ::= <类型标识符> <变量> { , <变量> }
//! <变量>             ::= <标识符> | <标识符> '[' <无符号整数> ']'
//! <声明头部>         ::= int <标识符> | char <标识符>
//! <有返回值函数定义> ::= <声明头部> '(' <参数表> ')' '{' <复合语句> '}'
//! <无返回值函数定义> ::= void <标识符> '(' <参数表> ')' '{' <复合语句> '}'
//! <主函数>           ::= void main '(' ')' '{' <复合语句> '}'
//! <参数表>           ::= <类型标识符> <标识符> { , <类型标识符> <标识符> } | <空>
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::NonTerminal;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::stream::TokenSource;
use crate::trace::TraceSink;

impl<S: TokenSource, T: TraceSink> Parser<S, T> {
    /// Parse a constant declaration block
    pub(crate) fn parse_const_decl(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ConstDecl, |p| {
            p.expect(TokenKind::Const)?;
            p.parse_const_def()?;
            p.expect(TokenKind::Semicolon)?;

            while p.check(TokenKind::Const)? {
                p.bump()?;
                p.parse_const_def()?;
                p.expect(TokenKind::Semicolon)?;
            }
            Ok(())
        })
    }

    /// Parse one constant definition: `int a = 1, b = -2` or `char c = 'x'`
    pub(crate) fn parse_const_def(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ConstDef, |p| match p.current_kind()? {
            TokenKind::Int => {
                p.bump()?;
                loop {
                    p.expect(TokenKind::Ident)?;
                    p.expect(TokenKind::Assign)?;
                    p.parse_integer()?;
                    if !p.check(TokenKind::Comma)? {
                        return Ok(());
                    }
                    p.bump()?;
                }
            }
            TokenKind::Char => {
                p.bump()?;
                loop {
                    p.expect(TokenKind::Ident)?;
                    p.expect(TokenKind::Assign)?;
                    p.expect(TokenKind::CharConst)?;
                    if !p.check(TokenKind::Comma)? {
                        return Ok(());
                    }
                    p.bump()?;
                }
            }
            _ => Err(p.unexpected("'int' or 'char' after 'const'")),
        })
    }

    /// Parse a variable declaration block.
    ///
    /// Stops before a `type identifier (` sequence, which starts a function
    /// definition instead.
    pub(crate) fn parse_var_decl(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::VarDecl, |p| {
            loop {
                p.parse_var_def()?;
                p.expect(TokenKind::Semicolon)?;
                if !p.at_var_definition()? {
                    return Ok(());
                }
            }
        })
    }

    /// Parse one variable definition: `int a, b[10], c`
    pub(crate) fn parse_var_def(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::VarDef, |p| {
            p.expect_value_type()?;
            loop {
                p.expect(TokenKind::Ident)?;
                if p.check(TokenKind::LBracket)? {
                    p.bump()?;
                    p.parse_unsigned_integer()?;
                    p.expect(TokenKind::RBracket)?;
                }
                if !p.check(TokenKind::Comma)? {
                    return Ok(());
                }
                p.bump()?;
            }
        })
    }

    pub(crate) fn parse_decl_head(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::DeclHead, |p| {
            p.expect_value_type()?;
            p.expect(TokenKind::Ident)
        })
    }

    /// Parse a function returning `int` or `char`
    pub(crate) fn parse_value_func_def(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ValueFuncDef, |p| {
            p.parse_decl_head()?;
            p.parse_function_rest()
        })
    }

    /// Parse a `void` function other than `main`
    pub(crate) fn parse_void_func_def(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::VoidFuncDef, |p| {
            p.expect(TokenKind::Void)?;
            p.expect(TokenKind::Ident)?;
            p.parse_function_rest()
        })
    }

    /// Parse `void main() { ... }`
    pub(crate) fn parse_main_func(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::MainFunc, |p| {
            p.expect(TokenKind::Void)?;
            p.expect(TokenKind::Main)?;
            p.expect(TokenKind::LParen)?;
            p.expect(TokenKind::RParen)?;
            p.expect(TokenKind::LBrace)?;
            p.parse_compound_stmt()?;
            p.expect(TokenKind::RBrace)
        })
    }

    /// Parse a parameter table, possibly empty
    pub(crate) fn parse_param_table(&mut self) -> Result<(), ParseError> {
        self.production(NonTerminal::ParamTable, |p| {
            if !p.current_kind()?.is_value_type() {
                return Ok(());
            }
            p.bump()?;
            p.expect(TokenKind::Ident)?;
            while p.check(TokenKind::Comma)? {
                p.bump()?;
                p.expect_value_type()?;
                p.expect(TokenKind::Ident)?;
            }
            Ok(())
        })
    }

    /// `( <参数表> ) { <复合语句> }`, shared by both non-main function forms.
    fn parse_function_rest(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LParen)?;
        self.parse_param_table()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        self.parse_compound_stmt()?;
        self.expect(TokenKind::RBrace)
    }
}
