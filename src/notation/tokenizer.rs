//! Splits PGN text into tokens.
//!
//! Whitespace separates tokens, except that a `{...}` block is one comment
//! token and a `[Key "Value"]` line is one header token. A number marker glued
//! to its move (`1.e4`, `12...Nf6`) is split into two tokens.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::error::NotationError;
use super::pgn::GameResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Header { key: String, value: String },
    /// `N.` for White, `N...` for Black
    MoveNumber { number: u32, black: bool },
    Move(String),
    Comment(String),
    Nag(u32),
    Result(GameResult),
    OpenVariation,
    CloseVariation,
    /// Anything else; the parser rejects it
    Unknown(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Header { key, value } => write!(f, "[{key} \"{value}\"]"),
            Token::MoveNumber { number, black } => {
                write!(f, "{number}{}", if *black { "..." } else { "." })
            }
            Token::Move(san) => f.write_str(san),
            Token::Comment(text) => write!(f, "{{{text}}}"),
            Token::Nag(n) => write!(f, "${n}"),
            Token::Result(result) => write!(f, "{result}"),
            Token::OpenVariation => f.write_str("("),
            Token::CloseVariation => f.write_str(")"),
            Token::Unknown(text) => f.write_str(text),
        }
    }
}

const DELIMITERS: [char; 5] = ['{', '[', '(', ')', ';'];

/// Tokenize PGN `text`.
pub fn tokenize(text: &str) -> Result<Vec<Token>, NotationError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                let body = take_until(text, &mut chars, '}')
                    .ok_or(NotationError::UnterminatedComment)?;
                tokens.push(Token::Comment(body.trim().to_string()));
            }
            ';' => {
                chars.next();
                let body = take_until(text, &mut chars, '\n').unwrap_or(&text[start + 1..]);
                tokens.push(Token::Comment(body.trim().to_string()));
            }
            '[' => {
                chars.next();
                let body = take_header(text, &mut chars).ok_or_else(|| {
                    NotationError::MalformedHeader {
                        line: text[start..].lines().next().unwrap_or_default().to_string(),
                    }
                })?;
                tokens.push(parse_header(body)?);
            }
            '(' => {
                chars.next();
                tokens.push(Token::OpenVariation);
            }
            ')' => {
                chars.next();
                tokens.push(Token::CloseVariation);
            }
            _ => {
                let mut end = text.len();
                while let Some(&(idx, c)) = chars.peek() {
                    if c.is_whitespace() || DELIMITERS.contains(&c) {
                        end = idx;
                        break;
                    }
                    chars.next();
                }
                classify_word(&text[start..end], &mut tokens);
            }
        }
    }
    Ok(tokens)
}

/// Consume up to and including `close`, returning the text before it.
fn take_until<'a>(
    text: &'a str,
    chars: &mut Peekable<CharIndices<'a>>,
    close: char,
) -> Option<&'a str> {
    let start = chars.peek().map_or(text.len(), |&(idx, _)| idx);
    for (idx, c) in chars.by_ref() {
        if c == close {
            return Some(&text[start..idx]);
        }
    }
    None
}

/// Consume a header body up to its closing `]`, skipping brackets inside
/// the quoted value.
fn take_header<'a>(text: &'a str, chars: &mut Peekable<CharIndices<'a>>) -> Option<&'a str> {
    let start = chars.peek().map_or(text.len(), |&(idx, _)| idx);
    let mut quoted = false;
    let mut escaped = false;
    for (idx, c) in chars.by_ref() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ']' if !quoted => return Some(&text[start..idx]),
            _ => {}
        }
    }
    None
}

fn parse_header(body: &str) -> Result<Token, NotationError> {
    let malformed = || NotationError::MalformedHeader {
        line: format!("[{body}]"),
    };
    let body = body.trim();
    let (key, rest) = body.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let quoted = rest
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(malformed)?;
    if key.is_empty() {
        return Err(malformed());
    }

    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next().ok_or_else(malformed)?),
            '"' => return Err(malformed()),
            _ => value.push(c),
        }
    }
    Ok(Token::Header {
        key: key.to_string(),
        value,
    })
}

fn classify_word(word: &str, tokens: &mut Vec<Token>) {
    if let Ok(result) = word.parse::<GameResult>() {
        tokens.push(Token::Result(result));
        return;
    }
    if let Some(digits) = word.strip_prefix('$') {
        match digits.parse::<u32>() {
            Ok(n) => tokens.push(Token::Nag(n)),
            Err(_) => tokens.push(Token::Unknown(word.to_string())),
        }
        return;
    }

    if word.starts_with("0-0") {
        tokens.push(Token::Move(word.trim_end_matches(['!', '?']).to_string()));
        return;
    }

    let digit_end = word
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(word.len());
    if digit_end > 0 {
        let rest = &word[digit_end..];
        let dots = rest.len() - rest.trim_start_matches('.').len();
        match (word[..digit_end].parse::<u32>(), dots) {
            (Ok(number), 1) => tokens.push(Token::MoveNumber {
                number,
                black: false,
            }),
            (Ok(number), n) if n >= 2 => tokens.push(Token::MoveNumber {
                number,
                black: true,
            }),
            _ => {
                tokens.push(Token::Unknown(word.to_string()));
                return;
            }
        }
        let rest = &rest[dots..];
        if !rest.is_empty() {
            classify_word(rest, tokens);
        }
        return;
    }

    // Move suffixes such as "!?" carry no move information.
    let san = word.trim_end_matches(['!', '?']);
    if san.is_empty() {
        return;
    }
    if san.starts_with(|c: char| c.is_ascii_alphabetic()) {
        tokens.push(Token::Move(san.to_string()));
    } else {
        tokens.push(Token::Unknown(word.to_string()));
    }
}
