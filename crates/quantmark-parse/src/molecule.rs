//! Molecule text blocks.
//!
//! Benchmark configurations describe the molecule with four text fields:
//!
//! - geometry, one atom per line (`Li 0.0 0.0 1.6`), optionally preceded by
//!   the two header lines of an XYZ file
//! - basis set name (`sto-3g`)
//! - active orbitals, one irrep per line followed by orbital indices (`A1 1 2`)
//! - transformation name (`jordan-wigner`, `bravyi-kitaev`, `parity`, or a
//!   custom mapping name)

use std::collections::BTreeSet;

use quantmark_ir::{ActiveSpace, Atom, MoleculeDescriptor, Transformation, canonical_symbol};

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, tokenize_line};

/// Parse a geometry block into atoms.
pub fn parse_geometry(source: &str) -> ParseResult<Vec<Atom>> {
    let mut lines = source.lines().enumerate().peekable();

    // XYZ header: atom count line, then a free-form comment line.
    while lines.next_if(|(_, text)| text.trim().is_empty()).is_some() {}
    if lines
        .peek()
        .is_some_and(|(_, text)| text.trim().parse::<usize>().is_ok())
    {
        lines.next();
        lines.next();
    }

    let mut atoms = Vec::new();
    for (idx, text) in lines {
        let line = idx + 1;
        let tokens = tokenize_line(text, line)?;
        if tokens.is_empty() {
            continue;
        }
        atoms.push(parse_atom(&tokens, line)?);
    }

    Ok(atoms)
}

fn parse_atom(tokens: &[Token], line: usize) -> ParseResult<Atom> {
    let invalid = |message: String| ParseError::InvalidGeometry { line, message };

    let (symbol, rest) = match tokens.split_first() {
        Some((Token::Identifier(symbol), rest)) => (symbol, rest),
        Some((other, _)) => {
            return Err(invalid(format!("expected element symbol, found '{other}'")));
        }
        None => return Err(invalid("empty atom line".into())),
    };

    let mut coords = Vec::with_capacity(3);
    let mut sign: Option<f64> = None;
    for token in rest {
        match (token, sign) {
            (Token::Minus, None) => sign = Some(-1.0),
            (Token::Plus, None) => sign = Some(1.0),
            (Token::Comma, None) => {}
            (Token::FloatLiteral(v), s) => {
                coords.push(s.unwrap_or(1.0) * v);
                sign = None;
            }
            (Token::IntLiteral(v), s) => {
                coords.push(s.unwrap_or(1.0) * *v as f64);
                sign = None;
            }
            (other, _) => return Err(invalid(format!("expected coordinate, found '{other}'"))),
        }
    }
    if sign.is_some() {
        return Err(invalid("dangling sign".into()));
    }

    let position: [f64; 3] = coords.as_slice().try_into().map_err(|_| {
        invalid(format!(
            "atom '{symbol}' needs 3 coordinates, got {}",
            coords.len()
        ))
    })?;

    let symbol = canonical_symbol(symbol).map_or_else(|| symbol.clone(), str::to_string);
    Ok(Atom::new(symbol, position))
}

/// Parse an active-orbital block (`A1 1\nB1 0`).
///
/// Each line names an irrep followed by one or more orbital indices. Lines
/// naming the same irrep are merged.
pub fn parse_active_orbitals(source: &str) -> ParseResult<ActiveSpace> {
    let mut active = ActiveSpace::new();

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        let tokens = tokenize_line(text, line)?;
        if tokens.is_empty() {
            continue;
        }

        let invalid = |message: String| ParseError::InvalidActiveOrbitals { line, message };

        let mut iter = tokens.into_iter();
        let irrep = match iter.next() {
            Some(Token::Identifier(name)) => name,
            Some(other) => return Err(invalid(format!("expected irrep label, found '{other}'"))),
            None => continue,
        };

        let mut orbitals = BTreeSet::new();
        for token in iter {
            match token {
                Token::IntLiteral(i) => {
                    let i = u32::try_from(i)
                        .map_err(|_| invalid(format!("orbital index {i} out of range")))?;
                    orbitals.insert(i);
                }
                Token::Comma => {}
                Token::Minus => return Err(invalid("negative orbital index".into())),
                other => return Err(invalid(format!("expected orbital index, found '{other}'"))),
            }
        }
        if orbitals.is_empty() {
            return Err(invalid(format!("irrep '{irrep}' lists no orbitals")));
        }

        active.entry(irrep).or_default().extend(orbitals);
    }

    Ok(active)
}

/// Parse a fermion-to-qubit mapping name.
pub fn parse_transformation(source: &str) -> ParseResult<Transformation> {
    let name = source.trim();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidTransformation(source.to_string()));
    }

    let key: String = name
        .chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .collect::<String>()
        .to_ascii_lowercase();

    Ok(match key.as_str() {
        "jordanwigner" | "jw" => Transformation::JordanWigner,
        "bravyikitaev" | "bk" => Transformation::BravyiKitaev,
        "parity" => Transformation::Parity,
        _ => Transformation::Custom(name.to_string()),
    })
}

/// Assemble and validate a molecule from its text fields.
///
/// Blank optional fields are treated as absent.
pub fn parse_molecule(
    geometry: &str,
    basis_set: &str,
    active_orbitals: Option<&str>,
    transformation: Option<&str>,
) -> ParseResult<MoleculeDescriptor> {
    let atoms = parse_geometry(geometry)?;
    let mut molecule = MoleculeDescriptor::new(atoms, basis_set.trim())?;

    if let Some(text) = active_orbitals.filter(|t| !t.trim().is_empty()) {
        molecule = molecule.with_active_orbitals(parse_active_orbitals(text)?)?;
    }
    if let Some(text) = transformation.filter(|t| !t.trim().is_empty()) {
        molecule = molecule.with_transformation(parse_transformation(text)?);
    }

    Ok(molecule)
}
