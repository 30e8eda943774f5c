//! # Introduction
//!
//! `cmini` is the front end of a compiler for a small C-like teaching
//! language. It tokenizes a program, parses it with a predictive recursive
//! descent parser, and reports the derivation as a post-order trace of
//! matched tokens and completed grammar productions.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → TokenStream → Parser → TraceSink
//! ```
//!
//! 1. [`parser::lexer`] splits source text into [`parser::lexer::Token`]s.
//! 2. [`parser::stream`] buffers tokens for bounded lookahead.
//! 3. [`parser::parse`] drives one procedure per grammar nonterminal.
//! 4. [`trace`] receives the records: in memory, as text lines, or as a
//!    [`parser::ast::SyntaxNode`] tree.
//!
//! ## Example
//!
//! ```
//! use cmini::parser::parse::Parser;
//!
//! let mut parser = Parser::new("void main() { }", Vec::new());
//! parser.parse_program().unwrap();
//! let lines: Vec<String> = parser.into_sink().iter().map(|r| r.to_string()).collect();
//! assert_eq!(lines.last().map(String::as_str), Some("<程序>"));
//! ```

pub mod parser;
pub mod trace;
