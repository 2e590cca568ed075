use std::path::Path;

use ahash::AHashMap;
use anyhow::{Context, Result};

mod error;
pub use error::BlosumError;

/// Built-in matrices; any other `--blosum` argument is treated as a path.
const BLOSUM62: &str = include_str!("blosum62.txt");
const BLOSUM90: &str = include_str!("blosum90.txt");

/// A BLOSUM-style substitution matrix.
///
/// The text format is the NCBI one: optional `#` comment lines, an alphabet
/// row, then one row per amino acid holding integer scores. Non-letter
/// alphabet entries (`*`, ambiguity codes kept aside) are retained so that
/// columns stay aligned, but only uppercase letters can score.
#[derive(Debug, Clone)]
pub struct Blosum {
    alphabet: Vec<char>,
    rows    : AHashMap<char, Vec<i32>>,
}

impl Blosum {
    /// Resolve `name` to a built-in matrix, or load it from disk.
    ///
    /// # Errors
    /// If the file cannot be opened or is malformed.
    pub fn from_name_or_path(name: &str) -> Result<Self> {
        match name {
            "blosum62" => Self::parse(BLOSUM62),
            "blosum90" => Self::parse(BLOSUM90),
            path => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|source| BlosumError::OpenFile{path: Path::new(path).to_path_buf(), source})
                    .context("While loading a substitution matrix")?;
                Self::parse(&contents)
            }
        }
    }

    /// Parse matrix text.
    ///
    /// # Errors
    /// If no alphabet row is present, or any scored row does not carry one
    /// integer per alphabet entry.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'));

        let (_, alphabet_row) = lines.next().ok_or(BlosumError::MissingAlphabet)?;
        let alphabet: Vec<char> = alphabet_row
            .split_whitespace()
            .filter_map(|field| {
                let mut chars = field.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            })
            .collect();
        if alphabet.is_empty() {
            return Err(BlosumError::MissingAlphabet.into())
        }

        let mut rows = AHashMap::with_capacity(alphabet.len());
        for (index, line) in lines {
            let lineno = index + 1;
            let mut fields = line.split_whitespace();
            let letter = match fields.next() {
                Some(field) if field.len() == 1 => field.chars().next().expect("Field should hold one char"),
                _ => return Err(BlosumError::MalformedRow{lineno, reason: String::from("missing row letter")}.into()),
            };
            let scores = fields
                .map(str::parse)
                .collect::<Result<Vec<i32>, _>>()
                .map_err(|e| BlosumError::MalformedRow{lineno, reason: e.to_string()})?;
            if scores.len() != alphabet.len() {
                return Err(BlosumError::MalformedRow{
                    lineno,
                    reason: format!("expected {} scores, found {}", alphabet.len(), scores.len()),
                }.into())
            }
            if letter.is_ascii_uppercase() {
                rows.insert(letter, scores);
            }
        }
        Ok(Self { alphabet, rows })
    }

    /// Substitution score between two residues, or `None` when either is
    /// absent from the matrix.
    pub fn score(&self, first: char, second: char) -> Option<i32> {
        let column = self.alphabet.iter().position(|&c| c == second)?;
        self.rows.get(&first).map(|scores| scores[column])
    }

    /// The scored residues, in alphabet order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied().filter(|c| self.rows.contains_key(c))
    }

    /// Every single-residue substitution of `window` scoring at least
    /// `cutoff`, identity substitutions excluded.
    pub fn permute_window(&self, window: &str, cutoff: i32) -> Vec<String> {
        let mut permutations = Vec::new();
        for (position, residue) in window.char_indices() {
            for substitute in self.letters().filter(|&s| s != residue) {
                if self.score(residue, substitute).is_some_and(|score| score >= cutoff) {
                    let mut variant = String::from(window);
                    variant.replace_range(position..=position, &substitute.to_string());
                    permutations.push(variant);
                }
            }
        }
        permutations
    }
}
