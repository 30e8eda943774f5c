// Grammar vocabulary shared by the lexer, the parser and the trace sinks

use crate::parser::lexer::Token;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Grammar nonterminals, one per parsing procedure.
///
/// The parser never builds a value of this type for its own use; it only
/// names the production whose completion record is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    Program,
    ConstDecl,
    ConstDef,
    UnsignedInteger,
    Integer,
    VarDecl,
    VarDef,
    DeclHead,
    ValueFuncDef,
    VoidFuncDef,
    MainFunc,
    ParamTable,
    CompoundStmt,
    StmtList,
    Statement,
    AssignStmt,
    CondStmt,
    Condition,
    LoopStmt,
    Step,
    ReadStmt,
    WriteStmt,
    ReturnStmt,
    Expression,
    Term,
    Factor,
    ValueCall,
    VoidCall,
    ArgTable,
    StringConst,
}

impl NonTerminal {
    /// Tag printed for this nonterminal's completion record.
    pub fn tag(self) -> &'static str {
        match self {
            NonTerminal::Program => "<程序>",
            NonTerminal::ConstDecl => "<常量说明>",
            NonTerminal::ConstDef => "<常量定义>",
            NonTerminal::UnsignedInteger => "<无符号整数>",
            NonTerminal::Integer => "<整数>",
            NonTerminal::VarDecl => "<变量说明>",
            NonTerminal::VarDef => "<变量定义>",
            NonTerminal::DeclHead => "<声明头部>",
            NonTerminal::ValueFuncDef => "<有返回值函数定义>",
            NonTerminal::VoidFuncDef => "<无返回值函数定义>",
            NonTerminal::MainFunc => "<主函数>",
            NonTerminal::ParamTable => "<参数表>",
            NonTerminal::CompoundStmt => "<复合语句>",
            NonTerminal::StmtList => "<语句列>",
            NonTerminal::Statement => "<语句>",
            NonTerminal::AssignStmt => "<赋值语句>",
            NonTerminal::CondStmt => "<条件语句>",
            NonTerminal::Condition => "<条件>",
            NonTerminal::LoopStmt => "<循环语句>",
            NonTerminal::Step => "<步长>",
            NonTerminal::ReadStmt => "<读语句>",
            NonTerminal::WriteStmt => "<写语句>",
            NonTerminal::ReturnStmt => "<返回语句>",
            NonTerminal::Expression => "<表达式>",
            NonTerminal::Term => "<项>",
            NonTerminal::Factor => "<因子>",
            NonTerminal::ValueCall => "<有返回值函数调用语句>",
            NonTerminal::VoidCall => "<无返回值函数调用语句>",
            NonTerminal::ArgTable => "<值参数表>",
            NonTerminal::StringConst => "<字符串>",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Materialized derivation tree.
///
/// Built on demand by [`crate::trace::TreeBuilder`]; children appear in
/// source order.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Leaf(Token),
    Node {
        kind: NonTerminal,
        children: Vec<SyntaxNode>,
    },
}

impl SyntaxNode {
    /// Nonterminal of an interior node, `None` for leaves.
    pub fn kind(&self) -> Option<NonTerminal> {
        match self {
            SyntaxNode::Leaf(_) => None,
            SyntaxNode::Node { kind, .. } => Some(*kind),
        }
    }

    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Leaf(_) => &[],
            SyntaxNode::Node { children, .. } => children,
        }
    }

    /// All leaf tokens in left-to-right order.
    pub fn terminals(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_terminals(&mut out);
        out
    }

    fn collect_terminals<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            SyntaxNode::Leaf(token) => out.push(token),
            SyntaxNode::Node { children, .. } => {
                for child in children {
                    child.collect_terminals(out);
                }
            }
        }
    }

    /// Number of interior nodes of the given kind, including `self`.
    pub fn count(&self, kind: NonTerminal) -> usize {
        let own = usize::from(self.kind() == Some(kind));
        own + self
            .children()
            .iter()
            .map(|child| child.count(kind))
            .sum::<usize>()
    }

    /// Indented one-line-per-node rendering, two spaces per level.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self {
            SyntaxNode::Leaf(token) => {
                out.push_str(&format!("{}\n", token.listing()));
            }
            SyntaxNode::Node { kind, children } => {
                out.push_str(kind.tag());
                out.push('\n');
                for child in children {
                    child.render_into(out, depth + 1);
                }
            }
        }
    }
}

impl From<Token> for SyntaxNode {
    fn from(token: Token) -> Self {
        SyntaxNode::Leaf(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;

    fn leaf(kind: TokenKind, lexeme: &str) -> SyntaxNode {
        SyntaxNode::Leaf(Token::new(kind, lexeme, SourceLocation::new(1, 1)))
    }

    #[test]
    fn test_terminals_in_order() {
        let tree = SyntaxNode::Node {
            kind: NonTerminal::Integer,
            children: vec![
                leaf(TokenKind::Minus, "-"),
                SyntaxNode::Node {
                    kind: NonTerminal::UnsignedInteger,
                    children: vec![leaf(TokenKind::IntConst, "7")],
                },
            ],
        };

        let lexemes: Vec<&str> = tree.terminals().iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["-", "7"]);
        assert_eq!(tree.count(NonTerminal::UnsignedInteger), 1);
        assert_eq!(tree.count(NonTerminal::Integer), 1);
        assert!(matches!(&tree.children()[0], SyntaxNode::Leaf(t) if t.kind == TokenKind::Minus));
    }

    #[test]
    fn test_render_indents_children() {
        let tree = SyntaxNode::Node {
            kind: NonTerminal::Step,
            children: vec![SyntaxNode::Node {
                kind: NonTerminal::UnsignedInteger,
                children: vec![leaf(TokenKind::IntConst, "1")],
            }],
        };

        assert_eq!(tree.render(), "<步长>\n  <无符号整数>\n    INTCON 1\n");
    }
}
