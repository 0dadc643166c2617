//! Square marks, arrows and comments attached to a game state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Square;

/// Brush color of a mark or arrow, matching the PGN `%csl`/`%cal` letters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnnotationColor {
    Green,
    Red,
    Blue,
    Yellow,
}

impl AnnotationColor {
    pub const ALL: [AnnotationColor; 4] = [
        AnnotationColor::Green,
        AnnotationColor::Red,
        AnnotationColor::Blue,
        AnnotationColor::Yellow,
    ];

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'G' => Some(AnnotationColor::Green),
            'R' => Some(AnnotationColor::Red),
            'B' => Some(AnnotationColor::Blue),
            'Y' => Some(AnnotationColor::Yellow),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            AnnotationColor::Green => 'G',
            AnnotationColor::Red => 'R',
            AnnotationColor::Blue => 'B',
            AnnotationColor::Yellow => 'Y',
        }
    }
}

impl fmt::Display for AnnotationColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnnotationColor::Green => "green",
            AnnotationColor::Red => "red",
            AnnotationColor::Blue => "blue",
            AnnotationColor::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

/// Marks and arrows per brush color, plus free-text comments.
///
/// Every brush color always has an entry, possibly empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotations {
    marks: BTreeMap<AnnotationColor, BTreeSet<Square>>,
    arrows: BTreeMap<AnnotationColor, BTreeSet<(Square, Square)>>,
    comments: Vec<String>,
}

impl Default for Annotations {
    fn default() -> Self {
        Annotations {
            marks: AnnotationColor::ALL
                .into_iter()
                .map(|c| (c, BTreeSet::new()))
                .collect(),
            arrows: AnnotationColor::ALL
                .into_iter()
                .map(|c| (c, BTreeSet::new()))
                .collect(),
            comments: Vec::new(),
        }
    }
}

impl Annotations {
    /// Remove the mark on `square` if any color has it, else add it in `color`.
    ///
    /// Returns true when the mark was added. Off-board squares are ignored.
    pub fn toggle_mark(&mut self, square: Square, color: AnnotationColor) -> bool {
        if !square.is_on_board() {
            return false;
        }
        let mut removed = false;
        for set in self.marks.values_mut() {
            removed |= set.remove(&square);
        }
        if !removed {
            self.insert_mark(square, color);
        }
        !removed
    }

    /// Remove the arrow if any color has it, else add it in `color`.
    ///
    /// Returns true when the arrow was added. Off-board squares are ignored.
    pub fn toggle_arrow(&mut self, from: Square, to: Square, color: AnnotationColor) -> bool {
        if !from.is_on_board() || !to.is_on_board() {
            return false;
        }
        let mut removed = false;
        for set in self.arrows.values_mut() {
            removed |= set.remove(&(from, to));
        }
        if !removed {
            self.insert_arrow(from, to, color);
        }
        !removed
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.comments.push(text.into());
    }

    pub(crate) fn insert_mark(&mut self, square: Square, color: AnnotationColor) {
        self.marks.entry(color).or_default().insert(square);
    }

    pub(crate) fn insert_arrow(&mut self, from: Square, to: Square, color: AnnotationColor) {
        self.arrows.entry(color).or_default().insert((from, to));
    }

    /// Squares marked in `color`.
    pub fn marks(&self, color: AnnotationColor) -> impl Iterator<Item = Square> + '_ {
        self.marks.get(&color).into_iter().flatten().copied()
    }

    /// Arrows drawn in `color`.
    pub fn arrows(&self, color: AnnotationColor) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.arrows.get(&color).into_iter().flatten().copied()
    }

    /// Brush color of the mark on `square`, if any.
    #[must_use]
    pub fn mark_color(&self, square: Square) -> Option<AnnotationColor> {
        self.marks
            .iter()
            .find(|(_, set)| set.contains(&square))
            .map(|(color, _)| *color)
    }

    /// Brush color of the arrow from `from` to `to`, if any.
    #[must_use]
    pub fn arrow_color(&self, from: Square, to: Square) -> Option<AnnotationColor> {
        self.arrows
            .iter()
            .find(|(_, set)| set.contains(&(from, to)))
            .map(|(color, _)| *color)
    }

    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
            && self.marks.values().all(BTreeSet::is_empty)
            && self.arrows.values().all(BTreeSet::is_empty)
    }
}
