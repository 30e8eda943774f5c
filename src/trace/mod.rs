//! Derivation trace records and the sinks that receive them
//!
//! The parser reports its work as a flat, post-order sequence of
//! [`TraceRecord`]s: one terminal record per matched token and one
//! nonterminal record per completed production. Where those records go is
//! up to the [`TraceSink`]:
//!
//! - `Vec<TraceRecord>` keeps them in memory;
//! - [`WriteSink`] prints one line per record to any [`io::Write`];
//! - [`TreeBuilder`] rebuilds the derivation tree as a [`SyntaxNode`].

use crate::parser::ast::{NonTerminal, SyntaxNode};
use crate::parser::lexer::{Token, TokenKind};
use std::fmt;
use std::io::{self, Write};

/// One line of the derivation trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    /// A token was matched.
    Terminal(Token),
    /// A production finished, after all of its children.
    NonTerminal(NonTerminal),
}

impl TraceRecord {
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            TraceRecord::Terminal(token) => Some(token.kind),
            TraceRecord::NonTerminal(_) => None,
        }
    }

    pub fn nonterminal(&self) -> Option<NonTerminal> {
        match self {
            TraceRecord::Terminal(_) => None,
            TraceRecord::NonTerminal(nt) => Some(*nt),
        }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::Terminal(token) => write!(f, "{}", token.listing()),
            TraceRecord::NonTerminal(nt) => f.write_str(nt.tag()),
        }
    }
}

/// Destination for trace records.
pub trait TraceSink {
    /// A production is about to parse its children.
    fn begin(&mut self, _nonterminal: NonTerminal) -> io::Result<()> {
        Ok(())
    }

    /// Append one record.
    fn record(&mut self, record: TraceRecord) -> io::Result<()>;
}

impl TraceSink for Vec<TraceRecord> {
    fn record(&mut self, record: TraceRecord) -> io::Result<()> {
        self.push(record);
        Ok(())
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn begin(&mut self, nonterminal: NonTerminal) -> io::Result<()> {
        (**self).begin(nonterminal)
    }

    fn record(&mut self, record: TraceRecord) -> io::Result<()> {
        (**self).record(record)
    }
}

/// Writes each record as a text line.
pub struct WriteSink<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> WriteSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> TraceSink for WriteSink<W> {
    fn record(&mut self, record: TraceRecord) -> io::Result<()> {
        writeln!(self.out, "{}", record)?;
        self.lines += 1;
        Ok(())
    }
}

/// Rebuilds the derivation tree from `begin`/`record` calls.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    /// Open productions, innermost last, each with the children seen so far.
    open: Vec<(NonTerminal, Vec<SyntaxNode>)>,
    root: Option<SyntaxNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The completed tree, if the outermost production has finished.
    pub fn finish(self) -> Option<SyntaxNode> {
        self.root
    }

    fn attach(&mut self, node: SyntaxNode) -> io::Result<()> {
        match self.open.last_mut() {
            Some((_, children)) => children.push(node),
            None if self.root.is_none() => self.root = Some(node),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "record after the derivation root was completed",
                ))
            }
        }
        Ok(())
    }
}

impl TraceSink for TreeBuilder {
    fn begin(&mut self, nonterminal: NonTerminal) -> io::Result<()> {
        self.open.push((nonterminal, Vec::new()));
        Ok(())
    }

    fn record(&mut self, record: TraceRecord) -> io::Result<()> {
        match record {
            TraceRecord::Terminal(token) => self.attach(token.into()),
            TraceRecord::NonTerminal(kind) => {
                let (open_kind, children) = self.open.pop().ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{} completed without being started", kind),
                    )
                })?;
                if open_kind != kind {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{} completed while {} was open", kind, open_kind),
                    ));
                }
                self.attach(SyntaxNode::Node { kind, children })
            }
        }
    }
}
