//! Rank-to-value mapping over an integer range with removals.
//!
//! A [`GapDistribution`] starts out representing every integer in
//! `[0, len)`. Removing a value punches a gap; [`GapDistribution::project`]
//! then maps a dense rank over the remaining values to the value holding
//! that rank. Drawing a uniform rank and projecting it is how the pair
//! generator samples without replacement.
//!
//! The tree is materialized lazily: a leaf covering more than one value only
//! splits when a removal lands inside it. Nodes live in an arena and
//! children are always allocated as an adjacent pair, so a node only stores
//! the index of its left child.

#[derive(Debug, PartialEq, Eq)]
struct Node {
    /// Number of removed values inside `[lower, upper)`.
    skips: usize,
    lower: usize,
    upper: usize,
    /// Arena index of the left child; the right child sits at `left + 1`.
    left: Option<usize>,
}

impl Node {
    const fn leaf(lower: usize, upper: usize) -> Self {
        Self {
            skips: 0,
            lower,
            upper,
            left: None,
        }
    }
}

/// Distribution of gaps in the integer range `[0, len)`.
///
/// # Examples
/// ```
/// use parmsf_core::GapDistribution;
///
/// let mut gaps = GapDistribution::new(5);
/// assert!(gaps.remove(1));
/// assert!(gaps.remove(3));
/// let remaining: Vec<_> = (0..gaps.remaining()).map(|rank| gaps.project(rank)).collect();
/// assert_eq!(remaining, vec![0, 2, 4]);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct GapDistribution {
    nodes: Vec<Node>,
}

impl GapDistribution {
    /// Creates a distribution covering `[0, len)` with no gaps.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![Node::leaf(0, len)],
        }
    }

    /// Returns the size of the full range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root().map_or(0, |root| root.upper)
    }

    /// Returns `true` when the range is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of values removed so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.root().map_or(0, |root| root.skips)
    }

    /// Returns the number of values still present.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.count())
    }

    /// Returns `true` when `value` has been removed.
    #[must_use]
    pub fn is_removed(&self, value: usize) -> bool {
        let Some(mut node) = self.root() else {
            return false;
        };
        while let Some((left, right)) = self.children(node) {
            node = if value < right.lower { left } else { right };
        }
        node.upper == node.lower + 1 && node.skips > 0
    }

    /// Maps `index`, a rank among the remaining values, to the value holding
    /// that rank.
    ///
    /// The rank is re-derived from the current skip counts on every call, so
    /// projections stay valid after any sequence of removals. `index` must be
    /// below [`GapDistribution::remaining`]; larger inputs map past the end
    /// of the range.
    #[must_use]
    pub fn project(&self, mut index: usize) -> usize {
        let Some(mut node) = self.root() else {
            return index;
        };
        while let Some((left, right)) = self.children(node) {
            let shifted = index + left.skips;
            if shifted >= right.lower {
                index = shifted;
                node = right;
            } else {
                node = left;
            }
        }
        index
    }

    /// Removes `value` from the distribution.
    ///
    /// Returns `false` and leaves the distribution untouched when the value
    /// was already removed or lies outside the range.
    pub fn remove(&mut self, value: usize) -> bool {
        if value >= self.len() {
            return false;
        }

        let mut path = Vec::new();
        let mut current = 0;
        loop {
            path.push(current);
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            let (lower, upper, skips, left) = (node.lower, node.upper, node.skips, node.left);
            let left = match left {
                Some(left) => left,
                None if upper == lower + 1 => {
                    if skips > 0 {
                        return false;
                    }
                    break;
                }
                None => self.split(current),
            };
            let Some(right) = self.nodes.get(left + 1) else {
                return false;
            };
            current = if value < right.lower { left } else { left + 1 };
        }

        for index in path {
            if let Some(node) = self.nodes.get_mut(index) {
                node.skips += 1;
            }
        }
        true
    }

    /// Returns an independent copy of the whole tree.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            nodes: self
                .nodes
                .iter()
                .map(|node| Node {
                    skips: node.skips,
                    lower: node.lower,
                    upper: node.upper,
                    left: node.left,
                })
                .collect(),
        }
    }

    /// Splits the leaf at `index` and returns the arena index of its left
    /// child.
    fn split(&mut self, index: usize) -> usize {
        let left = self.nodes.len();
        let Some(node) = self.nodes.get_mut(index) else {
            return left;
        };
        node.left = Some(left);
        let (lower, upper) = (node.lower, node.upper);
        let middle = lower + (upper - lower) / 2;
        self.nodes
            .extend([Node::leaf(lower, middle), Node::leaf(middle, upper)]);
        left
    }

    fn children(&self, node: &Node) -> Option<(&Node, &Node)> {
        match self.nodes.get(node.left?..)? {
            [left, right, ..] => Some((left, right)),
            _ => None,
        }
    }

    fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }
}
