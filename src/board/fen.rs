//! FEN import and export for positions.
//!
//! Castling rights map onto the moved-piece set (a missing right marks the
//! corner rook as moved, a side with no rights marks its king as moved) and
//! an en passant square becomes a synthesized double-step last move.

use std::collections::BTreeSet;

use super::error::FenError;
use super::{
    file_to_index, rank_to_index, Board, CastleSide, Color, LastMove, Piece, PieceId, Position,
    Square,
};

/// A parsed FEN record.
#[derive(Clone, Debug)]
pub struct FenSetup {
    pub position: Position,
    pub halfmove_clock: u32,
    /// Plies played before this position (0 for the initial position).
    pub ply: u32,
}

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// Pieces are numbered per color and type in square order (a1 first).
    pub fn try_from_fen(fen: &str) -> Result<FenSetup, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut placed: Vec<(Square, Color, Piece)> = Vec::new();
        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::InvalidRank { rank: rank_idx });
            }
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file + 1,
                    });
                }
                placed.push((Square(7 - rank_idx, file), color, piece));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::TooManyFiles {
                    rank: rank_idx,
                    files: file,
                });
            }
        }

        placed.sort_by_key(|(sq, _, _)| *sq);
        let mut board = Board::empty();
        let mut counters = [[0u8; 6]; 2];
        let mut totals = [0usize; 2];
        for (sq, color, piece) in placed {
            totals[color.index()] += 1;
            if totals[color.index()] > 16 {
                return Err(FenError::TooManyPieces { color });
            }
            let instance = &mut counters[color.index()][piece.index()];
            board.place(sq, PieceId::new(color, piece, *instance));
            *instance += 1;
        }
        for color in Color::BOTH {
            let found = counters[color.index()][Piece::King.index()] as usize;
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut rights: BTreeSet<(Color, CastleSide)> = BTreeSet::new();
        for c in parts[2].chars() {
            match c {
                'K' => rights.insert((Color::White, CastleSide::King)),
                'Q' => rights.insert((Color::White, CastleSide::Queen)),
                'k' => rights.insert((Color::Black, CastleSide::King)),
                'q' => rights.insert((Color::Black, CastleSide::Queen)),
                '-' => false,
                _ => return Err(FenError::InvalidCastling { char: c }),
            };
        }
        let moved = moved_from_rights(&board, &rights);

        let last_move = if parts[3] == "-" {
            None
        } else {
            Some(synthesize_double_step(&board, turn, parts[3])?)
        };

        let halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove: u32 = parts
            .get(5)
            .and_then(|s| s.parse().ok())
            .unwrap_or(1)
            .max(1);
        let ply = (fullmove - 1)
            .checked_mul(2)
            .and_then(|p| p.checked_add(u32::from(turn == Color::Black)))
            .ok_or_else(|| FenError::InvalidFullmove {
                found: parts.get(5).copied().unwrap_or_default().to_string(),
            })?;

        let waiting = turn.opponent();
        if let Some(king) = board.king_square(waiting) {
            if board.is_square_attacked(king, turn) {
                return Err(FenError::OpponentInCheck { color: waiting });
            }
        }

        Ok(FenSetup {
            position: Position::from_parts(board, turn, moved, last_move),
            halfmove_clock,
            ply,
        })
    }

    /// Castling rights implied by the moved-piece set.
    #[must_use]
    pub fn castling_available(&self, color: Color, side: CastleSide) -> bool {
        let rank = color.back_rank();
        let unmoved = |sq: Square, kind: Piece| {
            self.board.piece_at(sq).is_some_and(|id| {
                id.color == color
                    && self.board.info(id).effective() == kind
                    && !self.moved.contains(&id)
            })
        };
        unmoved(Square(rank, 4), Piece::King) && unmoved(Square(rank, side.rook_file()), Piece::Rook)
    }

    /// Render as FEN with the given counters.
    #[must_use]
    pub fn to_fen(&self, halfmove_clock: u32, ply: u32) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.board.kind_at(Square(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.turn == Color::White { "w" } else { "b" };
        let mut castling = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ] {
            if self.castling_available(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .last_move
            .filter(LastMove::is_double_pawn_step)
            .map_or_else(
                || "-".to_string(),
                |last| Square((last.from.rank() + last.to.rank()) / 2, last.to.file()).to_string(),
            );

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            halfmove_clock,
            ply / 2 + 1
        )
    }
}

fn moved_from_rights(board: &Board, rights: &BTreeSet<(Color, CastleSide)>) -> BTreeSet<PieceId> {
    let mut moved = BTreeSet::new();
    for color in Color::BOTH {
        let rank = color.back_rank();
        let mut any_right = false;
        for side in [CastleSide::King, CastleSide::Queen] {
            if rights.contains(&(color, side)) {
                any_right = true;
            } else if let Some(id) = board.piece_at(Square(rank, side.rook_file())) {
                moved.insert(id);
            }
        }
        if let Some(king) = board.king_square(color).and_then(|sq| {
            let id = board.piece_at(sq)?;
            (!any_right || sq != Square(rank, 4)).then_some(id)
        }) {
            moved.insert(king);
        }
    }
    moved
}

fn synthesize_double_step(board: &Board, turn: Color, text: &str) -> Result<LastMove, FenError> {
    let invalid = || FenError::InvalidEnPassant {
        found: text.to_string(),
    };
    let mut chars = text.chars();
    let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(invalid());
    };
    let file = file_to_index(f).ok_or_else(invalid)?;
    let rank = rank_to_index(r).ok_or_else(invalid)?;

    let mover = turn.opponent();
    let dir = mover.pawn_direction();
    let passed = Square(rank, file);
    let from = passed.offset(-dir, 0).ok_or_else(invalid)?;
    let to = passed.offset(dir, 0).ok_or_else(invalid)?;
    if from.rank() != mover.pawn_start_rank() {
        return Err(invalid());
    }
    let pawn = board
        .piece_at(to)
        .filter(|id| id.color == mover && board.info(*id).effective() == Piece::Pawn)
        .ok_or_else(invalid)?;

    Ok(LastMove {
        piece: pawn,
        from,
        to,
        captured: None,
        en_passant: false,
        castle: None,
        promotion: None,
        moved_as: Piece::Pawn,
    })
}
