//! Split a shell line into words

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{IsidoreError, Result};

#[derive(Parser)]
#[grammar = "../grammar/shell.pest"]
struct LineParser;

/// Split `input` into words the way a POSIX shell would, minus expansions.
pub fn split(input: &str) -> Result<Vec<String>> {
    let line = LineParser::parse(Rule::line, input)
        .map_err(|e| IsidoreError::Parse(format!("Malformed command: {}", e.variant.message())))?
        .next()
        .ok_or_else(|| IsidoreError::Parse("Malformed command".to_string()))?;

    Ok(line
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::word)
        .map(word)
        .collect())
}

fn word(pair: Pair<'_, Rule>) -> String {
    let mut out = String::new();
    for piece in pair.into_inner() {
        match piece.as_rule() {
            Rule::single_quoted => out.extend(piece.into_inner().map(|p| p.as_str())),
            Rule::double_quoted => {
                for part in piece.into_inner() {
                    match part.as_rule() {
                        Rule::double_escape => out.push_str(&part.as_str()[1..]),
                        _ => out.push_str(part.as_str()),
                    }
                }
            }
            Rule::escaped => out.push_str(&piece.as_str()[1..]),
            _ => out.push_str(piece.as_str()),
        }
    }
    out
}
