// Integration tests for tokenization and lookahead

use cmini::parser::lexer::{LexError, Lexer, TokenKind};
use cmini::parser::stream::TokenStream;

const FIXTURE: &str = include_str!("fixtures/program.txt");

fn listing(source: &str) -> Vec<String> {
    Lexer::new(source)
        .tokenize()
        .unwrap()
        .iter()
        .map(|t| t.listing().to_string())
        .collect()
}

#[test]
fn test_fixture_listing_head() {
    let lines = listing(FIXTURE);

    assert_eq!(
        &lines[..12],
        [
            "CONSTTK const",
            "INTTK int",
            "IDENFR MAX",
            "ASSIGN =",
            "INTCON 10",
            "COMMA ,",
            "IDENFR MIN",
            "ASSIGN =",
            "MINU -",
            "INTCON 10",
            "SEMICN ;",
            "CONSTTK const",
        ]
    );
    assert!(lines.contains(&"STRCON value = ".to_string()));
    assert!(lines.contains(&"STRCON \\n".to_string()));
    assert!(lines.contains(&"CHARCON z".to_string()));
    assert!(lines.contains(&"NEQ !=".to_string()));
    assert!(lines.contains(&"GEQ >=".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("RBRACE }"));
}

#[test]
fn test_every_operator() {
    let kinds: Vec<TokenKind> = Lexer::new("+ - * / < <= > >= == != = ; , ( ) [ ] { }")
        .tokenize()
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Lt,
            TokenKind::Le,
            TokenKind::Gt,
            TokenKind::Ge,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Assign,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn test_le_versus_spaced_lt_assign() {
    assert_eq!(listing("a<=b"), ["IDENFR a", "LEQ <=", "IDENFR b"]);
    assert_eq!(listing("a< =b"), ["IDENFR a", "LSS <", "ASSIGN =", "IDENFR b"]);
}

#[test]
fn test_lex_error_positions() {
    let err = Lexer::new("int a;\nchar c = 'x;").tokenize().unwrap_err();
    assert!(matches!(err, LexError::UnterminatedChar(_)));
    assert_eq!(err.location().line, 2);
    assert_eq!(err.location().column, 10);

    let err = Lexer::new("x = #1;").tokenize().unwrap_err();
    assert!(matches!(err, LexError::UnexpectedChar { ch: '#', .. }));
}

#[test]
fn test_stream_over_fixture_replays_tokens() {
    let tokens = Lexer::new(FIXTURE).tokenize().unwrap();
    let mut stream = TokenStream::new(Lexer::new(FIXTURE));

    for (i, expected) in tokens.iter().enumerate() {
        assert_eq!(stream.position(), i);
        assert_eq!(stream.peek(1).unwrap(), expected);
        if let Some(next) = tokens.get(i + 2) {
            assert_eq!(stream.peek(3).unwrap(), next);
        }
        assert_eq!(&stream.advance().unwrap(), expected);
    }
    assert!(stream.advance().unwrap().is(TokenKind::Eof));
}
