//! Lexer shared by the circuit and molecule front-ends.
//!
//! Input is tokenized one line at a time so that every token can be traced
//! back to its line; newlines never reach the lexer.

use logos::Logos;

/// Tokens of the circuit line grammar and the molecule text blocks.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// An identifier in single or double quotes; holds the unquoted name.
    #[regex(r#""[a-zA-Z_][a-zA-Z0-9_]*""#, unquote)]
    #[regex(r#"'[a-zA-Z_][a-zA-Z0-9_]*'"#, unquote)]
    QuotedIdentifier(String),

    // Punctuation
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token("=")]
    Eq,

    #[token(":")]
    Colon,

    #[token("-")]
    Minus,

    #[token("+")]
    Plus,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::QuotedIdentifier(s) => write!(f, "\"{s}\""),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Eq => write!(f, "="),
            Token::Colon => write!(f, ":"),
            Token::Minus => write!(f, "-"),
            Token::Plus => write!(f, "+"),
        }
    }
}

fn unquote(lex: &mut logos::Lexer<'_, Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// A token with its byte span inside the line.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

/// Tokenize one line of input.
pub fn tokenize(line: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span }));
        } else {
            let slice = &line[span.clone()];
            tokens.push(Err((span, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

/// Tokenize a line, failing on the first invalid token.
pub(crate) fn tokenize_line(line: &str, line_no: usize) -> Result<Vec<Token>, crate::ParseError> {
    tokenize(line)
        .into_iter()
        .map(|r| {
            r.map(|t| t.token).map_err(|(span, message)| crate::ParseError::LexerError {
                line: line_no,
                message: format!("{message} at column {}", span.start + 1),
            })
        })
        .collect()
}
