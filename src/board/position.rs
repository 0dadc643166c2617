//! Board model: square occupancy, piece identity and raw move application.

use std::collections::{BTreeMap, BTreeSet};

use super::{CastleSide, Color, LastMove, Piece, PieceId, PieceInfo, Square};

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// Square occupancy plus the promotion table.
///
/// Each square holds at most one `PieceId` and each id sits on at most one
/// square. A promoted piece keeps its id; its new type lives in `promotions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<PieceId>; 64],
    promotions: BTreeMap<PieceId, Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

impl Board {
    /// A board with no pieces.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            promotions: BTreeMap::new(),
        }
    }

    /// The standard starting setup.
    ///
    /// Instances count from the a-file: the a-rook is instance 0, the h-rook
    /// instance 1, and pawns are numbered by file.
    #[must_use]
    pub fn standard() -> Self {
        let mut board = Board::empty();
        let mut counters = [[0u8; 6]; 2];
        for color in Color::BOTH {
            for (file, &piece) in BACK_RANK.iter().enumerate() {
                let instance = &mut counters[color.index()][piece.index()];
                board.place(
                    Square(color.back_rank(), file),
                    PieceId::new(color, piece, *instance),
                );
                *instance += 1;
            }
            for file in 0..8 {
                board.place(
                    Square(color.pawn_start_rank(), file),
                    PieceId::new(color, Piece::Pawn, file as u8),
                );
            }
        }
        board
    }

    /// The piece standing on `sq`, if any. Off-board squares are empty.
    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        if !sq.is_on_board() {
            return None;
        }
        self.squares[sq.as_index()]
    }

    /// Derived view of a piece id on this board.
    #[must_use]
    pub fn info(&self, id: PieceId) -> PieceInfo {
        PieceInfo {
            color: id.color,
            kind: id.kind,
            promoted: self.promotions.get(&id).copied(),
        }
    }

    #[inline]
    #[must_use]
    pub fn info_at(&self, sq: Square) -> Option<PieceInfo> {
        self.piece_at(sq).map(|id| self.info(id))
    }

    /// Color and effective type of the piece on `sq`.
    #[inline]
    #[must_use]
    pub fn kind_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.info_at(sq).map(|info| (info.color, info.effective()))
    }

    #[inline]
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|id| id.color)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Occupied squares in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, PieceId)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|id| (Square::from_index(idx), id)))
    }

    /// Occupied squares of one color in index order.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = (Square, PieceId)> + '_ {
        self.occupied().filter(move |(_, id)| id.color == color)
    }

    /// Every piece on the board with its derived info.
    #[must_use]
    pub fn pieces(&self) -> BTreeMap<PieceId, PieceInfo> {
        self.occupied()
            .map(|(_, id)| (id, self.info(id)))
            .collect()
    }

    #[must_use]
    pub fn square_of(&self, id: PieceId) -> Option<Square> {
        self.occupied()
            .find(|(_, other)| *other == id)
            .map(|(sq, _)| sq)
    }

    /// Square of `color`'s king, if one is on the board.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, id)| id.color == color && id.kind == Piece::King)
            .map(|(sq, _)| sq)
    }

    /// Number of pieces on the board.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|slot| slot.is_some()).count()
    }

    /// Put `id` on `sq`, returning whatever stood there.
    pub(crate) fn place(&mut self, sq: Square, id: PieceId) -> Option<PieceId> {
        self.squares[sq.as_index()].replace(id)
    }

    /// Remove and return the piece on `sq`.
    pub(crate) fn take(&mut self, sq: Square) -> Option<PieceId> {
        self.squares[sq.as_index()].take()
    }

    pub(crate) fn promote(&mut self, id: PieceId, kind: Piece) {
        self.promotions.insert(id, kind);
    }

    /// Apply a move without validating it.
    ///
    /// Special moves are detected from geometry: a pawn reaching its last
    /// rank promotes to `promotion`, a diagonal pawn step onto an empty square
    /// captures en passant, and a king moving two files castles with the rook
    /// on that wing.
    ///
    /// # Panics
    /// Panics if `from` is empty; callers validate the move first.
    pub(crate) fn play(&mut self, from: Square, to: Square, promotion: Piece) -> LastMove {
        let Some(id) = self.piece_at(from) else {
            panic!("play from empty square {from}");
        };
        let color = id.color;
        let moved_as = self.info(id).effective();

        let promoted = (moved_as == Piece::Pawn && to.rank() == color.pawn_promotion_rank())
            .then_some(promotion);

        let mut captured = None;
        let en_passant =
            moved_as == Piece::Pawn && from.file() != to.file() && self.is_empty(to);
        if en_passant {
            captured = self.take(Square(from.rank(), to.file()));
        }

        let castle = if moved_as == Piece::King {
            CastleSide::from_king_move(from, to)
        } else {
            None
        };
        if let Some(side) = castle {
            let rank = from.rank();
            if let Some(rook) = self.take(Square(rank, side.rook_file())) {
                self.place(Square(rank, side.rook_target_file()), rook);
            }
        }

        self.take(from);
        if let Some(victim) = self.place(to, id) {
            captured = Some(victim);
        }
        if let Some(kind) = promoted {
            self.promote(id, kind);
        }

        LastMove {
            piece: id,
            from,
            to,
            captured,
            en_passant,
            castle,
            promotion: promoted,
            moved_as,
        }
    }
}

/// Everything move generation needs beyond the board itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) moved: BTreeSet<PieceId>,
    pub(crate) last_move: Option<LastMove>,
}

impl Default for Position {
    fn default() -> Self {
        Position::standard()
    }
}

impl Position {
    #[must_use]
    pub fn standard() -> Self {
        Position::from_parts(Board::standard(), Color::White, BTreeSet::new(), None)
    }

    #[must_use]
    pub fn from_parts(
        board: Board,
        turn: Color,
        moved: BTreeSet<PieceId>,
        last_move: Option<LastMove>,
    ) -> Self {
        Position {
            board,
            turn,
            moved,
            last_move,
        }
    }

    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    #[must_use]
    pub fn moved(&self) -> &BTreeSet<PieceId> {
        &self.moved
    }

    #[inline]
    #[must_use]
    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    /// Apply a move, record the mover as moved and flip the turn.
    pub(crate) fn play(&mut self, from: Square, to: Square, promotion: Piece) -> LastMove {
        let last = self.board.play(from, to, promotion);
        self.moved.insert(last.piece);
        self.last_move = Some(last);
        self.turn = self.turn.opponent();
        last
    }
}
