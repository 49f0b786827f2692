use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SequenceError};

/// Anything that can sit in a stimulus sequence.
pub trait Symbol: Copy + Eq + fmt::Debug {}

impl<T: Copy + Eq + fmt::Debug> Symbol for T {}

// SHAPES ----------------------------------------------------------------------

/// Shapes drawn inside the two flickering circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    #[serde(rename = "r")]
    Rectangle,
    #[serde(rename = "c")]
    Circle,
    #[serde(rename = "i")]
    InvertedTriangle,
    #[serde(rename = "t")]
    Triangle,
    #[serde(rename = "h")]
    Hourglass,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Rectangle,
        Shape::Circle,
        Shape::InvertedTriangle,
        Shape::Triangle,
        Shape::Hourglass,
    ];

    /// Single-letter code used in image file names and the marker stream.
    pub fn code(self) -> char {
        match self {
            Shape::Rectangle => 'r',
            Shape::Circle => 'c',
            Shape::InvertedTriangle => 'i',
            Shape::Triangle => 't',
            Shape::Hourglass => 'h',
        }
    }

    pub fn from_code(code: char) -> Option<Shape> {
        Shape::ALL.into_iter().find(|shape| shape.code() == code)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<char> for Shape {
    type Error = SequenceError;

    fn try_from(code: char) -> Result<Self> {
        Shape::from_code(code)
            .ok_or_else(|| SequenceError::invalid(format!("unknown shape code '{}'", code)))
    }
}

/// Fixed-size lookup table with one slot per [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTable<T> {
    slots: [T; 5],
}

impl<T> ShapeTable<T> {
    pub fn from_fn(mut f: impl FnMut(Shape) -> T) -> Self {
        Self {
            slots: Shape::ALL.map(|shape| f(shape)),
        }
    }

    pub fn get(&self, shape: Shape) -> &T {
        &self.slots[shape.index()]
    }

    pub fn get_mut(&mut self, shape: Shape) -> &mut T {
        &mut self.slots[shape.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Shape, &T)> {
        Shape::ALL.into_iter().zip(self.slots.iter())
    }
}

// ALPHABET --------------------------------------------------------------------

/// Ordered symbol set with one distinguished target symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet<S> {
    symbols: Vec<S>,
    target: S,
    non_targets: Vec<S>,
}

impl<S: Symbol> Alphabet<S> {
    pub const MIN_SIZE: usize = 3;

    pub fn new(symbols: Vec<S>, target: S) -> Result<Self> {
        if symbols.len() < Self::MIN_SIZE {
            return Err(SequenceError::invalid(format!(
                "alphabet needs at least {} symbols, got {}",
                Self::MIN_SIZE,
                symbols.len()
            )));
        }

        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(SequenceError::invalid(format!(
                    "alphabet lists {:?} more than once",
                    symbol
                )));
            }
        }

        if !symbols.contains(&target) {
            return Err(SequenceError::invalid(format!(
                "target {:?} is not part of the alphabet {:?}",
                target, symbols
            )));
        }

        let non_targets = symbols
            .iter()
            .copied()
            .filter(|&symbol| symbol != target)
            .collect();

        Ok(Self {
            symbols,
            target,
            non_targets,
        })
    }

    pub fn symbols(&self) -> &[S] {
        &self.symbols
    }

    pub fn target(&self) -> S {
        self.target
    }

    /// The alphabet with the target removed, in the original order.
    pub fn non_targets(&self) -> &[S] {
        &self.non_targets
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_target(&self, symbol: S) -> bool {
        symbol == self.target
    }
}

impl Alphabet<Shape> {
    /// The five lab shapes with the hourglass as the counted target.
    pub fn shapes() -> Result<Self> {
        Self::new(Shape::ALL.to_vec(), Shape::Hourglass)
    }
}
