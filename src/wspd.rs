use crate::octree::{NodeId, Octree, OctreeNode};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// An unordered pair of octree nodes certified well separated.
///
/// `first` and `second` keep the orientation in which the pair was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeparatedPair {
    pub first: NodeId,
    pub second: NodeId,
}

impl SeparatedPair {
    /// Orientation-independent key, smaller identifier first.
    pub fn key(&self) -> (NodeId, NodeId) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }
}

/// Returns true if `u` and `v` are `s`-well separated: the gap between their
/// bounding spheres is at least `s` times the larger of the two radii.
pub fn is_well_separated(u: &OctreeNode, v: &OctreeNode, s: f64) -> bool {
    let ru = u.bounding_radius();
    let rv = v.bounding_radius();
    let gap = u.center().distance(&v.center()) - (ru + rv);
    gap >= s * ru.max(rv)
}

/// Well-separated pair decomposition of an [`Octree`].
pub struct Wspd<'a> {
    tree: &'a Octree,
    separation: f64,
    pairs: Vec<SeparatedPair>,
    seen: HashSet<(NodeId, NodeId)>,
}

impl<'a> Wspd<'a> {
    /// Decomposes the whole tree, starting from the pair (root, root).
    pub fn new(tree: &'a Octree, s: f64) -> Self {
        Self::from_pair(tree, tree.root(), tree.root(), s)
    }

    /// Decomposes starting from the pair `(u, v)` instead of (root, root).
    ///
    /// Nodes that do not belong to `tree` and non-positive `s` yield an empty
    /// decomposition.
    pub fn from_pair(tree: &'a Octree, u: NodeId, v: NodeId, s: f64) -> Self {
        let mut wspd = Wspd {
            tree,
            separation: s,
            pairs: Vec::new(),
            seen: HashSet::new(),
        };
        wspd.decompose(u, v);
        debug!(pairs = wspd.pairs.len(), s, "decomposition built");
        wspd
    }

    fn decompose(&mut self, u: NodeId, v: NodeId) {
        let s = self.separation;
        if s.is_nan() || s <= 0.0 {
            return;
        }
        let tree = self.tree;
        let mut stack = vec![(u, v)];

        while let Some((u, v)) = stack.pop() {
            let (Some(nu), Some(nv)) = (tree.get(u), tree.get(v)) else {
                continue;
            };
            if u == v && nu.is_leaf() {
                continue;
            }
            if is_well_separated(nu, nv, s) {
                self.insert(u, v);
                continue;
            }

            // Split the larger box. A leaf has no children and radius zero, so the
            // other side is always the one refined.
            let refine_v = if nu.is_leaf() {
                true
            } else if nv.is_leaf() {
                false
            } else {
                nu.level() > nv.level()
            };
            if refine_v {
                stack.extend(nv.children().map(|c| (u, c)));
            } else {
                stack.extend(nu.children().map(|c| (c, v)));
            }
        }
    }

    fn insert(&mut self, first: NodeId, second: NodeId) {
        let pair = SeparatedPair { first, second };
        if self.seen.insert(pair.key()) {
            self.pairs.push(pair);
        }
    }

    pub fn tree(&self) -> &'a Octree {
        self.tree
    }

    pub fn separation(&self) -> f64 {
        self.separation
    }

    pub fn pairs(&self) -> &[SeparatedPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeparatedPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns true if `{u, v}` is part of the decomposition, in either orientation.
    pub fn contains(&self, u: NodeId, v: NodeId) -> bool {
        self.seen.contains(&SeparatedPair { first: u, second: v }.key())
    }
}

impl<'a, 'b> IntoIterator for &'b Wspd<'a> {
    type Item = &'b SeparatedPair;
    type IntoIter = std::slice::Iter<'b, SeparatedPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl Wspd<'_> {
    fn fmt_side(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let node = self.tree.node(id);
        match node.single_point() {
            Some(p) => write!(f, "R: {}, P: {}", node.bounding_radius(), self.tree.point(p)),
            None => write!(f, "R: {}, C: {}", node.bounding_radius(), node.center()),
        }
    }
}

impl fmt::Display for Wspd<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pair in &self.pairs {
            self.fmt_side(f, pair.first)?;
            f.write_str("  ")?;
            self.fmt_side(f, pair.second)?;
            f.write_str(" ,\n")?;
        }
        Ok(())
    }
}
