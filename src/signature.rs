//! Decomposition of raw method signatures into classified return types.

use crate::error::StubgenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Classification of one return-type token, in zero-value terms.
pub enum ReturnKind {
    /// The literal `error` type.
    Error,
    /// Pointer type (`*T`).
    Pointer,
    /// Slice or array type (`[]T`, `[N]T`).
    Slice,
    /// Map type (`map[K]V`).
    Map,
    /// Channel type (`chan T`, `<-chan T`).
    Channel,
    /// The `string` primitive.
    Str,
    /// The `bool` primitive.
    Bool,
    /// Integer primitives (`int`, sized variants).
    Int,
    /// Floating-point primitives.
    Float,
    /// Anything unrecognized; zero value falls back to a nil reference.
    Other,
}

#[derive(Debug, Clone)]
/// One return-type token: its raw source text and its classification.
pub struct ReturnType {
    pub raw: String,
    pub kind: ReturnKind,
}

/// Splits a raw declaration line into its parameter group and return clause.
///
/// The parameter group is delimited by paren-depth tracking from the method
/// name's opening paren; the trimmed remainder of the line is the return
/// clause (possibly empty).
pub fn split_signature(signature: &str) -> Result<(&str, &str), StubgenError> {
    let open = signature.find('(').ok_or_else(|| {
        StubgenError::SignatureError(format!("no parameter list in '{signature}'"))
    })?;

    let mut depth = 0usize;
    for (offset, ch) in signature[open..].char_indices() {
        let i = open + offset;
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let params = &signature[open + 1..i];
                    let returns = signature[i + 1..].trim();
                    return Ok((params, returns));
                }
            }
            _ => {}
        }
    }

    Err(StubgenError::SignatureError(format!(
        "unbalanced parameter list in '{signature}'"
    )))
}

/// Parses the ordered return-type tokens of a declaration line.
///
/// Supports an empty return clause, a single bare type, and a
/// parenthesized comma-separated list (split at paren/bracket depth 0).
pub fn parse_return_types(signature: &str) -> Result<Vec<ReturnType>, StubgenError> {
    let (_, returns) = split_signature(signature)?;
    if returns.is_empty() {
        return Ok(Vec::new());
    }

    let inner = if returns.starts_with('(') && returns.ends_with(')') {
        &returns[1..returns.len() - 1]
    } else {
        returns
    };

    Ok(split_top_level(inner)
        .into_iter()
        .map(|raw| ReturnType {
            kind: classify(&raw),
            raw,
        })
        .collect())
}

fn split_top_level(list: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for ch in list.chars() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        tokens.push(last.to_string());
    }
    tokens
}

/// Classification precedence follows the zero-value rules: the literal
/// error type first, then sigil prefixes, then exact primitive names, then
/// the nil-reference fallback.
fn classify(token: &str) -> ReturnKind {
    if token == "error" {
        return ReturnKind::Error;
    }
    if token.starts_with('*') {
        return ReturnKind::Pointer;
    }
    if token.starts_with('[') {
        return ReturnKind::Slice;
    }
    if token.starts_with("map[") {
        return ReturnKind::Map;
    }
    if token.starts_with("chan ") || token.starts_with("<-chan ") || token.starts_with("chan<- ") {
        return ReturnKind::Channel;
    }
    match token {
        "string" => ReturnKind::Str,
        "bool" => ReturnKind::Bool,
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" => ReturnKind::Int,
        "float" | "float32" | "float64" => ReturnKind::Float,
        _ => ReturnKind::Other,
    }
}
