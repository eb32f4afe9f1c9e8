//! Parser for the circuit line grammar.
//!
//! One gate per line:
//!
//! ```text
//! circuit:
//! Ry(target=(0,), parameter=a)
//! X(target=(1,), control=(0,))
//! ```
//!
//! Keyword arguments may appear in any order. Tuples accept a trailing
//! comma, a bare integer is read as a one-element tuple. Parameter names
//! may be quoted (`parameter="a"`). Blank lines and
//! `#` comments are ignored, as is a leading `circuit:` header.

use quantmark_ir::{CircuitDescriptor, GateKind, GateOp, QubitId};

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, tokenize_line};

/// Parse circuit text into a descriptor.
pub fn parse_circuit(source: &str) -> ParseResult<CircuitDescriptor> {
    let mut circuit = CircuitDescriptor::new();
    let mut seen_content = false;

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        let tokens = tokenize_line(text, line)?;
        if tokens.is_empty() {
            continue;
        }

        let mut parser = LineParser::new(tokens, line);
        if !seen_content && parser.is_header() {
            seen_content = true;
            continue;
        }
        seen_content = true;

        circuit.push(parser.parse_gate()?);
    }

    Ok(circuit)
}

/// Parse a single gate line.
pub fn parse_gate_line(text: &str, line: usize) -> ParseResult<GateOp> {
    let tokens = tokenize_line(text, line)?;
    LineParser::new(tokens, line).parse_gate()
}

/// Parser state for one line.
struct LineParser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl LineParser {
    fn new(tokens: Vec<Token>, line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
        }
    }

    fn is_eol(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line,
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    fn eol(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedEol {
            line: self.line,
            expected: expected.into(),
        }
    }

    /// Expect a specific token.
    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        let label = expected.to_string();
        let found = self.advance().ok_or_else(|| self.eol(&format!("'{label}'")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(expected) {
            return Err(self.unexpected(&format!("'{label}'"), &found));
        }
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self, what: &str) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(self.unexpected(what, &other)),
            None => Err(self.eol(what)),
        }
    }

    /// A bare or quoted identifier.
    fn parameter_name(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name) | Token::QuotedIdentifier(name)) => Ok(name),
            Some(other) => Err(self.unexpected("parameter name", &other)),
            None => Err(self.eol("parameter name")),
        }
    }

    /// `circuit:` alone on a line.
    fn is_header(&self) -> bool {
        matches!(
            self.tokens.as_slice(),
            [Token::Identifier(name), Token::Colon] if name.eq_ignore_ascii_case("circuit")
        )
    }

    fn parse_gate(&mut self) -> ParseResult<GateOp> {
        let name = self.identifier("gate name")?;
        let kind = GateKind::from_name(&name).ok_or_else(|| ParseError::UnknownGate {
            line: self.line,
            name: name.clone(),
        })?;

        self.expect(&Token::LParen)?;

        let mut targets: Option<Vec<QubitId>> = None;
        let mut controls: Option<Vec<QubitId>> = None;
        let mut parameter: Option<String> = None;

        if !self.check(&Token::RParen) {
            loop {
                let key = self.identifier("argument name")?;
                self.expect(&Token::Eq)?;

                match key.to_ascii_lowercase().as_str() {
                    "target" => {
                        if targets.is_some() {
                            return Err(self.duplicate(&key));
                        }
                        targets = Some(self.parse_qubit_tuple()?);
                    }
                    "control" => {
                        if controls.is_some() {
                            return Err(self.duplicate(&key));
                        }
                        controls = Some(self.parse_qubit_tuple()?);
                    }
                    "parameter" => {
                        if parameter.is_some() {
                            return Err(self.duplicate(&key));
                        }
                        parameter = Some(self.parameter_name()?);
                    }
                    _ => {
                        return Err(ParseError::UnknownArgument {
                            line: self.line,
                            name: key,
                        });
                    }
                }

                if !self.consume(&Token::Comma) || self.check(&Token::RParen) {
                    break;
                }
            }
        }

        self.expect(&Token::RParen)?;
        if let Some(extra) = self.advance() {
            return Err(self.unexpected("end of line", &extra));
        }

        let targets = targets.ok_or(ParseError::MissingTarget { line: self.line })?;
        GateOp::new(kind, targets, controls.unwrap_or_default(), parameter).map_err(|source| {
            ParseError::InvalidGate {
                line: self.line,
                source,
            }
        })
    }

    fn duplicate(&self, name: &str) -> ParseError {
        ParseError::DuplicateArgument {
            line: self.line,
            name: name.to_string(),
        }
    }

    /// `(i, j, ...)` with optional trailing comma, or a bare index.
    fn parse_qubit_tuple(&mut self) -> ParseResult<Vec<QubitId>> {
        if !self.consume(&Token::LParen) {
            return Ok(vec![self.parse_qubit()?]);
        }

        let mut qubits = Vec::new();
        while !self.check(&Token::RParen) {
            if self.is_eol() {
                return Err(self.eol("')'"));
            }
            qubits.push(self.parse_qubit()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(qubits)
    }

    fn parse_qubit(&mut self) -> ParseResult<QubitId> {
        match self.advance() {
            Some(Token::IntLiteral(index)) => u32::try_from(index)
                .map(QubitId)
                .map_err(|_| ParseError::IndexOutOfRange {
                    line: self.line,
                    index,
                }),
            Some(Token::Minus) => match self.advance() {
                Some(Token::IntLiteral(index)) => Err(ParseError::NegativeIndex {
                    line: self.line,
                    index,
                }),
                Some(other) => Err(self.unexpected("qubit index", &other)),
                None => Err(self.eol("qubit index")),
            },
            Some(other) => Err(self.unexpected("qubit index", &other)),
            None => Err(self.eol("qubit index")),
        }
    }
}
