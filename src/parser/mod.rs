//! Front end for the teaching language
//!
//! This module turns source text into a derivation trace:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`stream`]: Lookahead buffer over a token source
//! - [`parse`]: Parsing (tokens → trace records)
//! - [`ast`]: Grammar vocabulary and the derivation tree
//!
//! # Supported Language
//!
//! - Types: `int`, `char`, `void`, one-dimensional arrays of fixed size
//! - Declarations: constants, global and local variables, functions, `void main()`
//! - Statements: assignment, `if`/`else`, `while`, `do`-`while`, `for`,
//!   `scanf`, `printf`, `return`, calls, blocks, empty statements
//! - Expressions: `+ - * /`, indexing, parentheses, calls, literals
//!
//! # Parser Implementation
//!
//! Hand-written predictive recursive descent parser, split by grammar area
//! into [`parse`], `declarations`, `statements` and `expressions`.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod stream;
