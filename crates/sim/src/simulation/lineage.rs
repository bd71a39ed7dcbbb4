//! The binary lineage tree and root-to-node paths.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, SimulationError};
use crate::genome::Cell;

/// Which daughter to follow at a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub const fn as_char(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}

/// A root-to-node walk through the lineage, one direction per division.
///
/// # Examples
///
/// ```rust
/// # use cellevo_sim::simulation::{Direction, LineagePath};
/// let path: LineagePath = "LRR".parse().unwrap();
/// assert_eq!(path.leaf_index(), 3);
/// assert_eq!(LineagePath::from_leaf_index(3, 3).unwrap(), path);
/// assert_eq!("011".parse::<LineagePath>().unwrap(), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LineagePath(Vec<Direction>);

impl LineagePath {
    /// The empty path, addressing the founder.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path to leaf `index` (0-based, left to right) of a tree with
    /// `generations` divisions. The most significant bit is the first
    /// division; a set bit means Right.
    pub fn from_leaf_index(index: usize, generations: usize) -> Result<Self> {
        let leaves = 1usize.checked_shl(generations as u32).unwrap_or(0);
        if generations >= usize::BITS as usize || index >= leaves {
            return Err(SimulationError::config(format!(
                "leaf index {index} out of range for {generations} generations"
            )));
        }
        let path = (0..generations)
            .rev()
            .map(|bit| {
                if index >> bit & 1 == 1 {
                    Direction::Right
                } else {
                    Direction::Left
                }
            })
            .collect();
        Ok(Self(path))
    }

    /// Left-to-right index of the node among those at its generation.
    pub fn leaf_index(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, d| (acc << 1) | usize::from(*d == Direction::Right))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn directions(&self) -> &[Direction] {
        &self.0
    }

    /// This path extended by one division.
    pub fn child(&self, direction: Direction) -> Self {
        let mut path = self.0.clone();
        path.push(direction);
        Self(path)
    }

    /// The first `len` steps.
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }
}

impl FromStr for LineagePath {
    type Err = SimulationError;

    /// Parse `L`/`R` (any case) or `0`/`1` steps. An empty string is the
    /// root.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .chars()
            .map(|c| match c {
                'L' | 'l' | '0' => Ok(Direction::Left),
                'R' | 'r' | '1' => Ok(Direction::Right),
                other => Err(SimulationError::config(format!(
                    "invalid path step '{other}' (expected L/R or 0/1)"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl fmt::Display for LineagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for d in &self.0 {
            write!(f, "{}", d.as_char())?;
        }
        Ok(())
    }
}

/// A lineage tree node owning one cell and, unless terminal, its two
/// daughters.
#[derive(Debug, Clone)]
pub struct Node {
    cell: Cell,
    children: Option<Box<(Node, Node)>>,
}

impl Node {
    /// A terminal node.
    pub fn leaf(cell: Cell) -> Self {
        Self {
            cell,
            children: None,
        }
    }

    /// A node with two daughters, which must be exactly one generation
    /// younger.
    pub fn with_children(cell: Cell, left: Node, right: Node) -> Result<Self> {
        let expected = cell.generation() + 1;
        for child in [&left, &right] {
            if child.generation() != expected || child.cell.is_founder() {
                return Err(SimulationError::config(format!(
                    "daughter at generation {} cannot descend from generation {}",
                    child.generation(),
                    cell.generation()
                )));
            }
        }
        Ok(Self {
            cell,
            children: Some(Box::new((left, right))),
        })
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.cell.generation()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn left(&self) -> Option<&Node> {
        self.children.as_deref().map(|(l, _)| l)
    }

    pub fn right(&self) -> Option<&Node> {
        self.children.as_deref().map(|(_, r)| r)
    }

    pub fn children(&self) -> Option<(&Node, &Node)> {
        self.children.as_deref().map(|(l, r)| (l, r))
    }

    pub fn child(&self, direction: Direction) -> Option<&Node> {
        match direction {
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }

    /// Depth of the subtree if every terminal node sits at the same
    /// depth.
    fn uniform_depth(&self) -> Option<usize> {
        match self.children() {
            None => Some(0),
            Some((l, r)) => {
                let depth = l.uniform_depth()?;
                (r.uniform_depth()? == depth).then_some(depth + 1)
            }
        }
    }
}

/// The full lineage: a founder at generation 0 and a complete binary tree
/// of divisions down to `generations`.
#[derive(Debug, Clone)]
pub struct LineageTree {
    root: Node,
    generations: usize,
}

impl LineageTree {
    /// Wrap a root node. The root must hold the founder and every leaf must
    /// sit at the same generation.
    pub fn new(root: Node) -> Result<Self> {
        if !root.cell().is_founder() || root.generation() != 0 {
            return Err(SimulationError::config("lineage root must be a founder cell"));
        }
        let generations = root
            .uniform_depth()
            .ok_or_else(|| SimulationError::config("lineage tree leaves at uneven depths"))?;
        Ok(Self { root, generations })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    #[inline]
    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn leaf_count(&self) -> usize {
        1 << self.generations
    }

    pub fn node_count(&self) -> usize {
        (1 << (self.generations + 1)) - 1
    }

    /// Terminal cells, left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![&self.root],
        }
    }

    /// The node reached by following `path` from the root.
    pub fn node(&self, path: &LineagePath) -> Result<&Node> {
        if path.len() > self.generations {
            return Err(SimulationError::PathTooLong {
                requested: path.len(),
                available: self.generations,
            });
        }
        let mut node = &self.root;
        for &d in path.directions() {
            node = node.child(d).ok_or(SimulationError::PathTooLong {
                requested: path.len(),
                available: node.generation(),
            })?;
        }
        Ok(node)
    }

    /// Visit every node depth-first, parents before children and left
    /// before right.
    pub fn walk<F: FnMut(&LineagePath, &Node)>(&self, mut visit: F) {
        let mut stack = vec![(LineagePath::root(), &self.root)];
        while let Some((path, node)) = stack.pop() {
            visit(&path, node);
            if let Some((l, r)) = node.children() {
                stack.push((path.child(Direction::Right), r));
                stack.push((path.child(Direction::Left), l));
            }
        }
    }

    /// Number of events recorded at each generation (index 0 is the founder
    /// and always 0).
    pub fn events_per_generation(&self) -> Vec<usize> {
        let mut counts = vec![0; self.generations + 1];
        self.walk(|_, node| counts[node.generation()] += node.cell().events().len());
        counts
    }

    /// Total number of recorded events.
    pub fn event_count(&self) -> usize {
        self.events_per_generation().iter().sum()
    }
}

/// Iterator over the terminal cells of a tree, left to right.
#[derive(Clone)]
pub struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Cell;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node.children() {
                None => return Some(node.cell()),
                Some((l, r)) => {
                    self.stack.push(r);
                    self.stack.push(l);
                }
            }
        }
        None
    }
}
