//! PGN movetext parsing and writing.
//!
//! The parser is a small state machine over [`Token`]s. It accepts one game
//! without variations: headers, then numbered move pairs with optional
//! comments and NAGs, then an optional result.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::NotationError;
use super::tokenizer::{tokenize, Token};
use crate::board::Square;
use crate::game::AnnotationColor;

/// Game termination marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// `*`: unfinished or unknown
    Ongoing,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        })
    }
}

impl FromStr for GameResult {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-0" => Ok(GameResult::WhiteWins),
            "0-1" => Ok(GameResult::BlackWins),
            "1/2-1/2" => Ok(GameResult::Draw),
            "*" => Ok(GameResult::Ongoing),
            _ => Err(NotationError::UnexpectedToken {
                index: 0,
                token: s.to_string(),
                expected: "a game result",
            }),
        }
    }
}

/// One SAN move with everything attached to it in the movetext.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedMove {
    pub san: String,
    pub comments: Vec<String>,
    /// `%csl` entries
    pub marks: Vec<(AnnotationColor, Square)>,
    /// `%cal` entries
    pub arrows: Vec<(AnnotationColor, Square, Square)>,
    /// `%clk` value, kept as written
    pub clock: Option<String>,
}

impl ParsedMove {
    #[must_use]
    pub fn new(san: impl Into<String>) -> Self {
        ParsedMove {
            san: san.into(),
            ..ParsedMove::default()
        }
    }

    fn has_commands(&self) -> bool {
        !self.marks.is_empty() || !self.arrows.is_empty() || self.clock.is_some()
    }
}

/// A numbered White/Black move pair. A game set up with Black to move
/// opens with a pair whose `white` is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnPair {
    pub number: u32,
    pub white: Option<ParsedMove>,
    pub black: Option<ParsedMove>,
}

/// Headers, moves and result of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedGame {
    /// Header pairs in input order.
    pub headers: Vec<(String, String)>,
    /// Comments before the first move.
    pub comments: Vec<String>,
    pub moves: Vec<TurnPair>,
    pub result: Option<GameResult>,
}

impl ParsedGame {
    /// Value of the first header named `key`.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Moves in play order.
    pub fn plies(&self) -> impl Iterator<Item = &ParsedMove> + '_ {
        self.moves
            .iter()
            .flat_map(|pair| pair.white.iter().chain(pair.black.iter()))
    }

    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.plies().count()
    }

    fn last_move_mut(&mut self) -> Option<&mut ParsedMove> {
        let pair = self.moves.last_mut()?;
        match pair.black {
            Some(ref mut black) => Some(black),
            None => pair.white.as_mut(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    MoveNumber,
    WhiteMove,
    AfterWhite,
    BlackMove,
    AfterBlack,
}

impl Stage {
    const fn expected(self) -> &'static str {
        match self {
            Stage::MoveNumber => "a move number",
            Stage::WhiteMove => "White's move",
            Stage::AfterWhite => "Black's move or an annotation",
            Stage::BlackMove => "Black's move",
            Stage::AfterBlack => "a move number or a result",
        }
    }
}

/// Parse one game of PGN text.
///
/// Parsing stops at the first result token; anything after it is ignored.
pub fn parse_notation_text(text: &str) -> Result<ParsedGame, NotationError> {
    let tokens = tokenize(text)?;
    let mut game = ParsedGame::default();
    let mut stage = Stage::MoveNumber;
    let mut number = 0u32;

    for (index, token) in tokens.iter().enumerate() {
        let expected = stage.expected();
        let unexpected = || NotationError::UnexpectedToken {
            index,
            token: token.to_string(),
            expected,
        };

        match (stage, token) {
            (_, Token::OpenVariation | Token::CloseVariation) => {
                return Err(NotationError::Variation { index });
            }
            (Stage::MoveNumber, Token::Header { key, value }) => {
                game.headers.push((key.clone(), value.clone()));
            }
            (Stage::MoveNumber, Token::Comment(text)) => {
                let mut intro = ParsedMove::default();
                read_comment(text, &mut intro)?;
                game.comments.append(&mut intro.comments);
            }
            (Stage::MoveNumber, Token::MoveNumber { number: n, black }) => {
                if *n == 0 {
                    return Err(NotationError::WrongMoveNumber {
                        expected: 1,
                        found: 0,
                    });
                }
                number = *n;
                if *black {
                    game.moves.push(TurnPair {
                        number,
                        white: None,
                        black: None,
                    });
                    stage = Stage::BlackMove;
                } else {
                    stage = Stage::WhiteMove;
                }
            }
            (Stage::WhiteMove, Token::Move(san)) => {
                game.moves.push(TurnPair {
                    number,
                    white: Some(ParsedMove::new(san.as_str())),
                    black: None,
                });
                stage = Stage::AfterWhite;
            }
            (Stage::AfterWhite, Token::MoveNumber { number: n, black: true }) => {
                if *n != number {
                    return Err(NotationError::WrongMoveNumber {
                        expected: number,
                        found: *n,
                    });
                }
                stage = Stage::BlackMove;
            }
            (Stage::AfterWhite | Stage::BlackMove, Token::Move(san)) => {
                if let Some(pair) = game.moves.last_mut() {
                    pair.black = Some(ParsedMove::new(san.as_str()));
                }
                stage = Stage::AfterBlack;
            }
            (Stage::AfterWhite | Stage::AfterBlack, Token::Comment(text)) => {
                if let Some(mv) = game.last_move_mut() {
                    read_comment(text, mv)?;
                }
            }
            // NAGs are accepted and dropped.
            (Stage::AfterWhite | Stage::AfterBlack, Token::Nag(_)) => {}
            (Stage::AfterBlack, Token::MoveNumber { number: n, black: false }) => {
                if *n != number + 1 {
                    return Err(NotationError::WrongMoveNumber {
                        expected: number + 1,
                        found: *n,
                    });
                }
                number = *n;
                stage = Stage::WhiteMove;
            }
            (Stage::MoveNumber | Stage::AfterWhite | Stage::AfterBlack, Token::Result(result)) => {
                game.result = Some(*result);
                return Ok(game);
            }
            _ => return Err(unexpected()),
        }
    }

    match stage {
        Stage::WhiteMove | Stage::BlackMove => Err(NotationError::UnexpectedEnd {
            expected: stage.expected(),
        }),
        _ => Ok(game),
    }
}

/// Move `text` into `target`: `[%...]` commands become marks, arrows and
/// clock; what remains is one comment.
fn read_comment(text: &str, target: &mut ParsedMove) -> Result<(), NotationError> {
    let mut plain = String::new();
    let mut rest = text;
    while let Some(open) = rest.find("[%") {
        plain.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find(']') else {
            return Err(NotationError::InvalidAnnotation {
                text: rest[open..].to_string(),
            });
        };
        apply_command(&after[..close], target)?;
        rest = &after[close + 1..];
    }
    plain.push_str(rest);

    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    if !plain.is_empty() {
        target.comments.push(plain);
    }
    Ok(())
}

fn apply_command(command: &str, target: &mut ParsedMove) -> Result<(), NotationError> {
    let (name, args) = command.trim().split_once(' ').unwrap_or((command.trim(), ""));
    let entries = args.split(',').map(str::trim).filter(|e| !e.is_empty());
    match name {
        "csl" => {
            for entry in entries {
                let (color, squares) = split_brush(entry)?;
                let [square] = parse_squares::<1>(entry, squares)?;
                target.marks.push((color, square));
            }
        }
        "cal" => {
            for entry in entries {
                let (color, squares) = split_brush(entry)?;
                let [from, to] = parse_squares::<2>(entry, squares)?;
                target.arrows.push((color, from, to));
            }
        }
        "clk" => target.clock = Some(args.trim().to_string()),
        // %eval, %emt and friends are not kept.
        _ => {}
    }
    Ok(())
}

fn split_brush(entry: &str) -> Result<(AnnotationColor, &str), NotationError> {
    let mut chars = entry.chars();
    chars
        .next()
        .and_then(AnnotationColor::from_char)
        .map(|color| (color, chars.as_str()))
        .ok_or_else(|| NotationError::InvalidAnnotation {
            text: entry.to_string(),
        })
}

fn parse_squares<const N: usize>(
    entry: &str,
    text: &str,
) -> Result<[Square; N], NotationError> {
    let invalid = || NotationError::InvalidAnnotation {
        text: entry.to_string(),
    };
    if !text.is_ascii() || text.len() != N * 2 {
        return Err(invalid());
    }
    let mut squares = [Square(0, 0); N];
    for (i, slot) in squares.iter_mut().enumerate() {
        *slot = text[i * 2..i * 2 + 2].parse().map_err(|_| invalid())?;
    }
    Ok(squares)
}

fn write_annotations(out: &mut Vec<String>, mv: &ParsedMove) {
    for comment in &mv.comments {
        out.push(format!("{{{comment}}}"));
    }
    if mv.has_commands() {
        let mut commands = Vec::new();
        if !mv.marks.is_empty() {
            let marks: Vec<String> = mv
                .marks
                .iter()
                .map(|(color, sq)| format!("{}{sq}", color.to_char()))
                .collect();
            commands.push(format!("[%csl {}]", marks.join(",")));
        }
        if !mv.arrows.is_empty() {
            let arrows: Vec<String> = mv
                .arrows
                .iter()
                .map(|(color, from, to)| format!("{}{from}{to}", color.to_char()))
                .collect();
            commands.push(format!("[%cal {}]", arrows.join(",")));
        }
        if let Some(clock) = &mv.clock {
            commands.push(format!("[%clk {clock}]"));
        }
        out.push(format!("{{{}}}", commands.join(" ")));
    }
}

fn has_annotations(mv: &ParsedMove) -> bool {
    !mv.comments.is_empty() || mv.has_commands()
}

/// Render `game` as PGN that [`parse_notation_text`] reads back unchanged.
#[must_use]
pub fn write_game(game: &ParsedGame) -> String {
    let mut text = String::new();
    for (key, value) in &game.headers {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        text.push_str(&format!("[{key} \"{escaped}\"]\n"));
    }
    if !game.headers.is_empty() {
        text.push('\n');
    }

    let mut tokens: Vec<String> = game.comments.iter().map(|c| format!("{{{c}}}")).collect();
    for pair in &game.moves {
        match &pair.white {
            Some(white) => {
                tokens.push(format!("{}.", pair.number));
                tokens.push(white.san.clone());
                write_annotations(&mut tokens, white);
                if let Some(black) = &pair.black {
                    if has_annotations(white) {
                        tokens.push(format!("{}...", pair.number));
                    }
                    tokens.push(black.san.clone());
                    write_annotations(&mut tokens, black);
                }
            }
            None => {
                if let Some(black) = &pair.black {
                    tokens.push(format!("{}...", pair.number));
                    tokens.push(black.san.clone());
                    write_annotations(&mut tokens, black);
                }
            }
        }
    }
    tokens.push(game.result.unwrap_or(GameResult::Ongoing).to_string());
    text.push_str(&tokens.join(" "));
    text
}
