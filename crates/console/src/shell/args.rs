//! Word splitting and argument parsing

use super::error::{ShellError, ShellResult};

/// Split a line on whitespace; double quotes group words and `\"` escapes a quote inside them
pub fn split_words(line: &str) -> ShellResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some(next) => current.push(next),
                None => return Err(ShellError::UnterminatedQuote),
            },
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(ShellError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// `key=value`; the value may be empty
pub fn parse_field(word: &str) -> ShellResult<(String, String)> {
    match word.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ShellError::ExpectedField(word.to_string())),
    }
}

pub fn parse_id(word: Option<&String>) -> ShellResult<i64> {
    let word = word.ok_or(ShellError::MissingArgument("id"))?;
    word.parse()
        .map_err(|_| ShellError::InvalidId(word.to_string()))
}

pub fn parse_bool(value: &str) -> ShellResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(ShellError::InvalidBool(value.to_string())),
    }
}
