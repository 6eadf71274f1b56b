//! Grid positions and hierarchical [`Address`]es.
//!
//! An address is a path through nested circuit instances: every element
//! but the last names the block that holds a sub-circuit instance inside
//! the instance named by the previous element, and the last element
//! names the leaf gate.

use smallvec::SmallVec;
use std::fmt;

/// A cell position on the editor grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Hierarchical, position-based path to one gate.
///
/// Uses `SmallVec<[Position; 4]>` so that addresses up to four levels of
/// nesting stay on the stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address {
    path: SmallVec<[Position; 4]>,
}

impl Address {
    /// The empty address. It does not name any gate.
    pub fn new() -> Self {
        Self {
            path: SmallVec::new(),
        }
    }

    /// A single-segment address naming a gate in the root circuit.
    pub fn leaf(position: Position) -> Self {
        let mut path = SmallVec::new();
        path.push(position);
        Self { path }
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the address has no segments.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Segment at `depth`, if any.
    pub fn get(&self, depth: usize) -> Option<Position> {
        self.path.get(depth).copied()
    }

    /// The final segment (the leaf gate's position).
    pub fn last(&self) -> Option<Position> {
        self.path.last().copied()
    }

    /// All segments except the last, i.e. the instance path.
    pub fn parent_path(&self) -> &[Position] {
        match self.path.split_last() {
            Some((_, parents)) => parents,
            None => &[],
        }
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[Position] {
        &self.path
    }

    /// Append a segment at the innermost end.
    pub fn push(&mut self, position: Position) {
        self.path.push(position);
    }

    /// Prepend a segment, making this address relative to an enclosing
    /// instance placed at `position`.
    pub fn nest(&mut self, position: Position) {
        self.path.insert(0, position);
    }

    /// `origin` followed by `self`.
    pub fn joined_under(&self, origin: &Address) -> Address {
        let mut path: SmallVec<[Position; 4]> = SmallVec::with_capacity(origin.len() + self.len());
        path.extend_from_slice(&origin.path);
        path.extend_from_slice(&self.path);
        Address { path }
    }
}

impl From<&[Position]> for Address {
    fn from(segments: &[Position]) -> Self {
        Self {
            path: SmallVec::from_slice(segments),
        }
    }
}

impl FromIterator<Position> for Address {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            path: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " > ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn leaf_has_no_parent_path() {
        let a = Address::leaf(p(1, 2));
        assert_eq!(a.len(), 1);
        assert!(a.parent_path().is_empty());
        assert_eq!(a.last(), Some(p(1, 2)));
    }

    #[test]
    fn nest_prepends() {
        let mut a = Address::leaf(p(3, 3));
        a.nest(p(0, 1));
        a.nest(p(9, 9));
        assert_eq!(a.segments(), &[p(9, 9), p(0, 1), p(3, 3)]);
        assert_eq!(a.parent_path(), &[p(9, 9), p(0, 1)]);
    }

    #[test]
    fn joined_under_concatenates() {
        let origin: Address = [p(1, 0), p(2, 0)].into_iter().collect();
        let rel = Address::leaf(p(5, 5));
        let full = rel.joined_under(&origin);
        assert_eq!(full.segments(), &[p(1, 0), p(2, 0), p(5, 5)]);
    }

    #[test]
    fn empty_address() {
        let a = Address::new();
        assert!(a.is_empty());
        assert_eq!(a.last(), None);
        assert!(a.parent_path().is_empty());
    }

    #[test]
    fn display_lists_segments() {
        let a: Address = [p(1, 2), p(3, 4)].into_iter().collect();
        assert_eq!(a.to_string(), "[(1, 2) > (3, 4)]");
    }

    proptest! {
        #[test]
        fn equality_is_elementwise(xs in proptest::collection::vec((-50i32..50, -50i32..50), 0..8)) {
            let a: Address = xs.iter().map(|&(x, y)| p(x, y)).collect();
            let b: Address = xs.iter().map(|&(x, y)| p(x, y)).collect();
            prop_assert_eq!(&a, &b);
            if let Some(last) = a.last() {
                let mut c = a.clone();
                c.push(last);
                prop_assert_ne!(&a, &c);
            }
        }
    }
}
