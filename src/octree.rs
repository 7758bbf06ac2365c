use crate::bounds::BoundingBox;
use crate::error::{Error, Result};
use crate::point::Point;
use tracing::{debug, trace, warn};

const NO_NODE: u32 = u32::MAX;

/// Default maximum level of a node (the root is level 1).
///
/// Halving a cube about 2100 times spans every finite `f64` scale, so distinct
/// points are normally separated well before this level. Splitting also stops
/// once a child's center no longer moves away from its parent's.
pub const DEFAULT_MAX_DEPTH: u32 = 2100;

/// Stable identifier of a node inside its [`Octree`] arena.
///
/// Identifiers are assigned in creation order and never reused, so the root is
/// always the smallest one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What to do with two points that cannot be told apart by subdivision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the build with [`Error::DegenerateGeometry`].
    #[default]
    Reject,
    /// Keep the first point as the leaf point and record the newcomer as merged.
    Merge,
}

/// Construction parameters of an [`Octree`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreeConfig {
    /// Deepest level a node may be split to.
    pub max_depth: u32,
    pub duplicates: DuplicatePolicy,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

impl OctreeConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}

/// Two input points that ended up sharing one leaf under [`DuplicatePolicy::Merge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoincidentPoints {
    /// Index of the point stored as the leaf's single point.
    pub kept: usize,
    /// Index of the point absorbed into that leaf.
    pub merged: usize,
}

/// A cubical region of an [`Octree`].
#[derive(Clone, Debug)]
pub struct OctreeNode {
    level: u32,
    center: Point,
    half: [f64; 3],
    children: [u32; 8],
    parent: u32,
    current_points: Vec<usize>,
    single_point: Option<usize>,
}

impl OctreeNode {
    /// Depth of the node, the root being level 1.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Edge length of the node's cube along each axis.
    ///
    /// May be infinite for a root spanning most of the `f64` range; see
    /// [`OctreeNode::half_extents`].
    pub fn diameters(&self) -> [f64; 3] {
        self.half.map(|h| h * 2.0)
    }

    /// Half edge length of the node's cube along each axis.
    pub fn half_extents(&self) -> [f64; 3] {
        self.half
    }

    pub fn bounds(&self) -> BoundingBox<3> {
        let c = self.center.to_array();
        BoundingBox::new(
            std::array::from_fn(|i| c[i] - self.half[i]),
            std::array::from_fn(|i| c[i] + self.half[i]),
        )
    }

    /// Child in octant slot `octant` (0..8), if populated.
    pub fn child(&self, octant: usize) -> Option<NodeId> {
        match self.children.get(octant) {
            Some(&id) if id != NO_NODE => Some(NodeId(id)),
            _ => None,
        }
    }

    /// Populated children in octant order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter(|&&id| id != NO_NODE).map(|&id| NodeId(id))
    }

    pub fn parent(&self) -> Option<NodeId> {
        (self.parent != NO_NODE).then_some(NodeId(self.parent))
    }

    /// Indices of every point routed through this node, in insertion order.
    pub fn current_points(&self) -> &[usize] {
        &self.current_points
    }

    /// Index of the point held by this node if it is a leaf.
    pub fn single_point(&self) -> Option<usize> {
        self.single_point
    }

    pub fn is_leaf(&self) -> bool {
        self.single_point.is_some()
    }

    /// The first point ever routed into this node.
    pub fn representative(&self) -> usize {
        self.current_points[0]
    }

    /// Radius of the sphere circumscribing the node: zero for a leaf, otherwise
    /// half the space diagonal of its cube.
    pub fn bounding_radius(&self) -> f64 {
        if self.is_leaf() {
            return 0.0;
        }
        self.half[0].hypot(self.half[1]).hypot(self.half[2])
    }

    /// Returns true if `p` lies strictly inside the node's cube.
    pub fn contains_strict(&self, p: &Point) -> bool {
        self.bounds().contains_strict(&p.to_array())
    }
}

/// Octant slot of `p` relative to `center`.
///
/// Bit 2 is set when `p` lies on the negative x side, bit 1 for y and bit 0 for z.
/// A coordinate equal to the center's goes to the positive side.
#[inline]
pub fn octant(center: &Point, p: &Point) -> usize {
    let mut ind = 0;
    if p.x < center.x { ind |= 4; }
    if p.y < center.y { ind |= 2; }
    if p.z < center.z { ind |= 1; }
    ind
}

/// An octree over a fixed point set, built by inserting points one at a time and
/// splitting leaves until every leaf holds a single point.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. The tree is
/// read-only once built.
pub struct Octree {
    points: Vec<Point>,
    nodes: Vec<OctreeNode>,
    config: OctreeConfig,
    coincident: Vec<CoincidentPoints>,
    depth: u32,
}

impl Octree {
    /// Builds an octree over `points` with the default configuration.
    pub fn build(points: &[Point]) -> Result<Octree> {
        Self::build_with(points, OctreeConfig::default())
    }

    /// Builds an octree over `points`.
    ///
    /// The root is the cube described by [`BoundingBox::root_cell`], which
    /// contains every point strictly. The first point becomes the root leaf and the others
    /// are inserted in order.
    pub fn build_with(points: &[Point], config: OctreeConfig) -> Result<Octree> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index });
        }
        let (center, half) = BoundingBox::root_cell(points).ok_or(Error::InvalidInput {
            required: 1,
            found: points.len(),
        })?;

        let mut tree = Octree {
            points: points.to_vec(),
            nodes: Vec::with_capacity(points.len() * 2),
            config,
            coincident: Vec::new(),
            depth: 1,
        };
        tree.nodes.push(OctreeNode {
            level: 1,
            center: Point::from(center),
            half: [half; 3],
            children: [NO_NODE; 8],
            parent: NO_NODE,
            current_points: vec![0],
            single_point: Some(0),
        });

        for index in 1..points.len() {
            tree.insert(index)?;
        }

        debug!(
            points = tree.points.len(),
            nodes = tree.nodes.len(),
            leaves = tree.leaf_count(),
            depth = tree.depth,
            merged = tree.coincident.len(),
            "octree built"
        );
        Ok(tree)
    }

    fn insert(&mut self, index: usize) -> Result<()> {
        let p = self.points[index];
        let mut node = 0;

        loop {
            self.nodes[node].current_points.push(index);
            let ind = octant(&self.nodes[node].center, &p);

            let child = self.nodes[node].children[ind];
            if child != NO_NODE {
                node = child as usize;
                continue;
            }

            let Some(resident) = self.nodes[node].single_point else {
                self.add_child(node, ind, index);
                return Ok(());
            };

            let q = self.points[resident];
            let resident_ind = octant(&self.nodes[node].center, &q);
            if resident_ind != ind {
                self.nodes[node].single_point = None;
                self.add_child(node, resident_ind, resident);
                self.add_child(node, ind, index);
                return Ok(());
            }

            // Both points fall into the same octant: push the resident one level
            // down and try again from there.
            let level = self.nodes[node].level;
            let stalled = self.child_center(node, ind) == self.nodes[node].center;
            if q == p || level >= self.config.max_depth || stalled {
                return self.merge(node, resident, index);
            }
            trace!(level, resident, index, "splitting leaf");
            node = self.add_child(node, ind, resident);
            let parent = self.nodes[node].parent as usize;
            self.nodes[parent].single_point = None;
        }
    }

    fn merge(&mut self, node: usize, resident: usize, index: usize) -> Result<()> {
        let level = self.nodes[node].level;
        match self.config.duplicates {
            DuplicatePolicy::Reject => Err(Error::DegenerateGeometry {
                first: resident,
                second: index,
                level,
            }),
            DuplicatePolicy::Merge => {
                warn!(kept = resident, merged = index, level, "merging coincident points into one leaf");
                self.coincident.push(CoincidentPoints { kept: resident, merged: index });
                Ok(())
            }
        }
    }

    /// Center of the octant slot `ind` of `node`. Equal to the node's own center
    /// once the half extents drop below the center's precision.
    fn child_center(&self, node: usize, ind: usize) -> Point {
        let node = &self.nodes[node];
        let sign = |bit: usize| if ind & bit == 0 { 1.0 } else { -1.0 };
        Point::new(
            node.center.x + sign(4) * node.half[0] / 2.0,
            node.center.y + sign(2) * node.half[1] / 2.0,
            node.center.z + sign(1) * node.half[2] / 2.0,
        )
    }

    /// Creates the leaf holding point `index` in octant slot `ind` of `parent`.
    fn add_child(&mut self, parent: usize, ind: usize, index: usize) -> usize {
        let center = self.child_center(parent, ind);
        let node = &self.nodes[parent];
        let child = OctreeNode {
            level: node.level + 1,
            center,
            half: node.half.map(|h| h / 2.0),
            children: [NO_NODE; 8],
            parent: parent as u32,
            current_points: vec![index],
            single_point: Some(index),
        };

        let id = self.nodes.len();
        self.depth = self.depth.max(child.level);
        self.nodes.push(child);
        self.nodes[parent].children[ind] = id as u32;
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node with identifier `id`.
    ///
    /// Ids obtained from this tree ([`Octree::root`], [`Octree::leaves`],
    /// [`OctreeNode::children`], [`OctreeNode::parent`]) or from a [`Wspd`] built
    /// over it are always valid. An id taken from another, larger tree panics;
    /// use [`Octree::get`] for those.
    ///
    /// [`Wspd`]: crate::Wspd
    pub fn node(&self, id: NodeId) -> &OctreeNode {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&OctreeNode> {
        self.nodes.get(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Input points, indexed as in the slice given to [`Octree::build`].
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    /// Identifiers of every leaf, in creation order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Level of the deepest node.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Point pairs merged into a shared leaf under [`DuplicatePolicy::Merge`].
    pub fn coincident(&self) -> &[CoincidentPoints] {
        &self.coincident
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }
}
