//! Dynamic bounding volume hierarchy.
//!
//! A binary tree of axis-aligned bounding boxes built by incremental,
//! SAH-guided insertion rather than a top-down split. New leaves are
//! grafted next to the sibling whose enlargement costs the least, and the
//! walk back to the root applies local grandchild/uncle rotations whenever
//! one strictly lowers the total surface-area cost. The structure is
//! mutable while the scene is assembled and strictly read-only during
//! rendering.

use core::base::*;
use core::geometry::*;

/// Index of a node in the tree's node pool.
pub type NodeProxy = i32;

/// Sentinel for "no node".
pub const NULL_NODE: NodeProxy = -1;

/// Margin added around leaf boxes so refit comparisons are not exact
/// float equality.
const AABB_MARGIN: Float = 1e-4;

/// Initial capacity of explicit traversal stacks.
const STACK_CAPACITY: usize = 256;

#[derive(Clone)]
struct Node<T> {
    aabb: Bounds3f,
    parent: NodeProxy,
    child1: NodeProxy,
    child2: NodeProxy,
    /// Next entry in the free list while the node is unallocated.
    next: NodeProxy,
    data: T,
}

impl<T> Node<T> {
    fn is_leaf(&self) -> bool {
        self.child1 == NULL_NODE
    }
}

/// A bounding volume hierarchy over user data handles. The tree stores one
/// `Copy` payload per leaf (typically an index into an external primitive
/// list) and never owns geometry itself.
pub struct Bvh<T: Copy + Default> {
    nodes: Vec<Node<T>>,
    root: NodeProxy,
    free_list: NodeProxy,
    leaf_count: usize,
}

impl<T: Copy + Default> Default for Bvh<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> Bvh<T> {
    /// Create an empty `Bvh`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(32),
            root: NULL_NODE,
            free_list: NULL_NODE,
            leaf_count: 0,
        }
    }

    /// Returns the number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Returns true if the tree holds no leaves.
    pub fn is_empty(&self) -> bool {
        self.root == NULL_NODE
    }

    /// Returns the root proxy, or `NULL_NODE` for an empty tree.
    pub fn root(&self) -> NodeProxy {
        self.root
    }

    /// Returns the (possibly margin-expanded) box stored for a node.
    ///
    /// * `proxy` - The node.
    pub fn aabb(&self, proxy: NodeProxy) -> &Bounds3f {
        assert!(0 <= proxy && (proxy as usize) < self.nodes.len());
        &self.nodes[proxy as usize].aabb
    }

    /// Returns the user data stored on a leaf.
    ///
    /// * `proxy` - The leaf node.
    pub fn data(&self, proxy: NodeProxy) -> T {
        assert!(0 <= proxy && (proxy as usize) < self.nodes.len());
        self.nodes[proxy as usize].data
    }

    /// Returns true if the node is a leaf.
    ///
    /// * `proxy` - The node.
    pub fn is_leaf(&self, proxy: NodeProxy) -> bool {
        assert!(0 <= proxy && (proxy as usize) < self.nodes.len());
        self.nodes[proxy as usize].is_leaf()
    }

    /// Returns the children of an internal node, `None` for a leaf.
    ///
    /// * `proxy` - The node.
    pub fn children(&self, proxy: NodeProxy) -> Option<(NodeProxy, NodeProxy)> {
        assert!(0 <= proxy && (proxy as usize) < self.nodes.len());
        let node = &self.nodes[proxy as usize];
        if node.is_leaf() {
            None
        } else {
            Some((node.child1, node.child2))
        }
    }

    /// Inserts a leaf for the given box and data handle and returns its
    /// proxy. The proxy stays valid until `destroy_proxy`, across
    /// rotations and rebuilds.
    ///
    /// * `aabb` - Tight bounding box of the referenced object.
    /// * `data` - User data handle stored on the leaf.
    pub fn create_proxy(&mut self, aabb: Bounds3f, data: T) -> NodeProxy {
        let leaf = self.allocate_node();
        let margin = Vector3f::new(AABB_MARGIN, AABB_MARGIN, AABB_MARGIN);
        self.nodes[leaf as usize].aabb = aabb.expanded(margin);
        self.nodes[leaf as usize].data = data;

        self.insert_leaf(leaf);
        self.leaf_count += 1;
        leaf
    }

    /// Removes a leaf from the tree and releases its proxy.
    ///
    /// * `proxy` - The leaf to remove.
    pub fn destroy_proxy(&mut self, proxy: NodeProxy) {
        assert!(0 <= proxy && (proxy as usize) < self.nodes.len());
        assert!(self.nodes[proxy as usize].is_leaf());

        self.remove_leaf(proxy);
        self.free_node(proxy);
        self.leaf_count -= 1;
    }

    /// Visits every leaf whose box contains the point, depth-first. The
    /// callback returns false to stop the query.
    ///
    /// * `point`    - The query point.
    /// * `callback` - Visitor receiving the leaf proxy and its data.
    pub fn query_point(&self, point: &Point3f, mut callback: impl FnMut(NodeProxy, T) -> bool) {
        if self.root == NULL_NODE {
            return;
        }

        let mut stack = Vec::with_capacity(STACK_CAPACITY);
        stack.push(self.root);

        while let Some(current) = stack.pop() {
            let node = &self.nodes[current as usize];
            if !node.aabb.contains_point(point) {
                continue;
            }

            if node.is_leaf() {
                if !callback(current, node.data) {
                    return;
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }

    /// Visits every leaf whose box overlaps the query box, depth-first.
    /// The callback returns false to stop the query.
    ///
    /// * `aabb`     - The query box.
    /// * `callback` - Visitor receiving the leaf proxy and its data.
    pub fn query_aabb(&self, aabb: &Bounds3f, mut callback: impl FnMut(NodeProxy, T) -> bool) {
        if self.root == NULL_NODE {
            return;
        }

        let mut stack = Vec::with_capacity(STACK_CAPACITY);
        stack.push(self.root);

        while let Some(current) = stack.pop() {
            let node = &self.nodes[current as usize];
            if !node.aabb.overlaps(aabb) {
                continue;
            }

            if node.is_leaf() {
                if !callback(current, node.data) {
                    return;
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }

    /// Casts a ray through the tree. Traversal is pruned by a ray-aligned
    /// box that is re-tightened every time the callback reports a closer
    /// hit: the callback receives `(ray, t_min, t_current)` plus the leaf
    /// data and returns the new closest hit distance, or `t_min` to stop
    /// immediately. Returning `t_current` unchanged leaves the search
    /// interval as it was.
    ///
    /// * `ray`      - The ray.
    /// * `t_min`    - Minimum parametric distance.
    /// * `t_max`    - Maximum parametric distance.
    /// * `callback` - Leaf visitor; returns the new search upper bound.
    pub fn ray_cast(
        &self,
        ray: &Ray,
        t_min: Float,
        t_max: Float,
        mut callback: impl FnMut(&Ray, Float, Float, T) -> Float,
    ) {
        if self.root == NULL_NODE {
            return;
        }

        // Keep the traversal box finite so zero direction components do
        // not turn `origin + 0 * inf` into NaN corners.
        let t_far = if t_max.is_finite() { t_max } else { 1e30 };
        let p1 = ray.at(t_min);
        let mut t = t_max;
        let mut ray_aabb = Bounds3f::new(p1, ray.at(t_far));

        let mut stack = Vec::with_capacity(STACK_CAPACITY);
        stack.push(self.root);

        while let Some(current) = stack.pop() {
            let node = &self.nodes[current as usize];
            if !node.aabb.overlaps(&ray_aabb) {
                continue;
            }
            if !node.aabb.intersect_p(ray, t_min, t) {
                continue;
            }

            if node.is_leaf() {
                let value = callback(ray, t_min, t, node.data);
                if value <= t_min {
                    // Caller signalled the hit is final.
                    return;
                }
                if value < t {
                    // Tighten the traversal box to the closer hit.
                    t = value;
                    ray_aabb = Bounds3f::new(p1, ray.at(t));
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }

    /// Returns the total surface-area cost of the tree.
    pub fn tree_cost(&self) -> Float {
        let mut cost = 0.0;
        if self.root == NULL_NODE {
            return cost;
        }

        let mut stack = Vec::with_capacity(STACK_CAPACITY);
        stack.push(self.root);
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current as usize];
            cost += Self::sah(&node.aabb);
            if !node.is_leaf() {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
        cost
    }

    /// Discards the incremental topology and re-runs SAH insertion over
    /// all current leaves. Leaf proxies stay valid. Used to recondition a
    /// tree degraded by a long insertion history.
    pub fn rebuild(&mut self) {
        if self.root == NULL_NODE {
            return;
        }
        let cost_before = self.tree_cost();

        // Detach every leaf and release every internal node.
        let mut leaves = Vec::with_capacity(self.leaf_count);
        let mut internals = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current as usize];
            if node.is_leaf() {
                leaves.push(current);
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
                internals.push(current);
            }
        }
        for proxy in internals {
            self.free_node(proxy);
        }

        self.root = NULL_NODE;
        for leaf in leaves {
            let node = &mut self.nodes[leaf as usize];
            node.parent = NULL_NODE;
            node.child1 = NULL_NODE;
            node.child2 = NULL_NODE;
            self.insert_leaf(leaf);
        }

        info!(
            "BVH rebuilt: {} leaves, cost {:.1} -> {:.1}",
            self.leaf_count,
            cost_before,
            self.tree_cost()
        );
    }

    fn sah(aabb: &Bounds3f) -> Float {
        aabb.surface_area()
    }

    fn allocate_node(&mut self) -> NodeProxy {
        if self.free_list != NULL_NODE {
            let proxy = self.free_list;
            self.free_list = self.nodes[proxy as usize].next;
            let node = &mut self.nodes[proxy as usize];
            node.parent = NULL_NODE;
            node.child1 = NULL_NODE;
            node.child2 = NULL_NODE;
            node.next = NULL_NODE;
            proxy
        } else {
            self.nodes.push(Node {
                aabb: Bounds3f::EMPTY,
                parent: NULL_NODE,
                child1: NULL_NODE,
                child2: NULL_NODE,
                next: NULL_NODE,
                data: T::default(),
            });
            (self.nodes.len() - 1) as NodeProxy
        }
    }

    fn free_node(&mut self, proxy: NodeProxy) {
        self.nodes[proxy as usize].next = self.free_list;
        self.nodes[proxy as usize].child1 = NULL_NODE;
        self.free_list = proxy;
    }

    /// Grafts a leaf into the tree next to the sibling that minimizes the
    /// marginal SAH cost, then repairs and rotates the ancestor chain.
    fn insert_leaf(&mut self, leaf: NodeProxy) {
        if self.root == NULL_NODE {
            self.root = leaf;
            self.nodes[leaf as usize].parent = NULL_NODE;
            return;
        }

        // Branch-and-bound search for the cheapest sibling. The inherited
        // cost of a subtree is the total enlargement its ancestors would
        // suffer from pushing the leaf down there.
        let leaf_aabb = self.nodes[leaf as usize].aabb;
        let mut best_sibling = self.root;
        let mut best_cost = Self::sah(&leaf_aabb.union(&self.nodes[self.root as usize].aabb));

        let mut stack: Vec<(NodeProxy, Float)> = Vec::with_capacity(STACK_CAPACITY);
        stack.push((self.root, 0.0));

        while let Some((current, inherited)) = stack.pop() {
            let current_aabb = &self.nodes[current as usize].aabb;
            let direct = Self::sah(&leaf_aabb.union(current_aabb));

            let cost = direct + inherited;
            if cost < best_cost {
                best_cost = cost;
                best_sibling = current;
            }

            if !self.nodes[current as usize].is_leaf() {
                // A descendant can only do better than this lower bound.
                let enlarged = inherited + direct - Self::sah(current_aabb);
                let lower_bound = Self::sah(&leaf_aabb) + enlarged;
                if lower_bound < best_cost {
                    stack.push((self.nodes[current as usize].child1, enlarged));
                    stack.push((self.nodes[current as usize].child2, enlarged));
                }
            }
        }

        // Splice a new parent above the chosen sibling.
        let old_parent = self.nodes[best_sibling as usize].parent;
        let new_parent = self.allocate_node();
        let sibling_aabb = self.nodes[best_sibling as usize].aabb;
        {
            let node = &mut self.nodes[new_parent as usize];
            node.parent = old_parent;
            node.aabb = leaf_aabb.union(&sibling_aabb);
            node.child1 = best_sibling;
            node.child2 = leaf;
        }
        self.nodes[best_sibling as usize].parent = new_parent;
        self.nodes[leaf as usize].parent = new_parent;

        if old_parent == NULL_NODE {
            self.root = new_parent;
        } else if self.nodes[old_parent as usize].child1 == best_sibling {
            self.nodes[old_parent as usize].child1 = new_parent;
        } else {
            self.nodes[old_parent as usize].child2 = new_parent;
        }

        // Walk back to the root recomputing unions and rotating where
        // that strictly lowers the cost.
        let mut ancestor = new_parent;
        while ancestor != NULL_NODE {
            let child1 = self.nodes[ancestor as usize].child1;
            let child2 = self.nodes[ancestor as usize].child2;
            self.nodes[ancestor as usize].aabb =
                self.nodes[child1 as usize].aabb.union(&self.nodes[child2 as usize].aabb);

            self.rotate(ancestor);
            ancestor = self.nodes[ancestor as usize].parent;
        }
    }

    /// Detaches a leaf, replacing its parent with its sibling, and repairs
    /// ancestor unions.
    fn remove_leaf(&mut self, leaf: NodeProxy) {
        if leaf == self.root {
            self.root = NULL_NODE;
            return;
        }

        let parent = self.nodes[leaf as usize].parent;
        let grandparent = self.nodes[parent as usize].parent;
        let sibling = if self.nodes[parent as usize].child1 == leaf {
            self.nodes[parent as usize].child2
        } else {
            self.nodes[parent as usize].child1
        };

        self.free_node(parent);

        if grandparent == NULL_NODE {
            self.root = sibling;
            self.nodes[sibling as usize].parent = NULL_NODE;
            return;
        }

        if self.nodes[grandparent as usize].child1 == parent {
            self.nodes[grandparent as usize].child1 = sibling;
        } else {
            self.nodes[grandparent as usize].child2 = sibling;
        }
        self.nodes[sibling as usize].parent = grandparent;

        let mut ancestor = grandparent;
        while ancestor != NULL_NODE {
            let child1 = self.nodes[ancestor as usize].child1;
            let child2 = self.nodes[ancestor as usize].child2;
            self.nodes[ancestor as usize].aabb =
                self.nodes[child1 as usize].aabb.union(&self.nodes[child2 as usize].aabb);
            ancestor = self.nodes[ancestor as usize].parent;
        }
    }

    /// Considers swapping each grandchild with its uncle and applies the
    /// swap that lowers total SAH cost the most, if any does. Only the
    /// middle node's box changes; the subtree's contents do not.
    ///
    /// * `node` - Root of the two-level neighborhood to examine.
    fn rotate(&mut self, node: NodeProxy) {
        if self.nodes[node as usize].is_leaf() {
            return;
        }

        let child1 = self.nodes[node as usize].child1;
        let child2 = self.nodes[node as usize].child2;

        // (grandchild to promote, uncle, internal child whose box shrinks,
        // cost delta)
        let mut best: Option<(NodeProxy, NodeProxy, NodeProxy, Float)> = None;
        let mut consider = |g: NodeProxy, stay: NodeProxy, uncle: NodeProxy, c: NodeProxy,
                            nodes: &Vec<Node<T>>| {
            let new_area = Self::sah(&nodes[stay as usize].aabb.union(&nodes[uncle as usize].aabb));
            let delta = new_area - Self::sah(&nodes[c as usize].aabb);
            if delta < best.map_or(0.0, |(_, _, _, d)| d) {
                best = Some((g, uncle, c, delta));
            }
        };

        if !self.nodes[child1 as usize].is_leaf() {
            let (g1, g2) = (self.nodes[child1 as usize].child1, self.nodes[child1 as usize].child2);
            consider(g1, g2, child2, child1, &self.nodes);
            consider(g2, g1, child2, child1, &self.nodes);
        }
        if !self.nodes[child2 as usize].is_leaf() {
            let (g1, g2) = (self.nodes[child2 as usize].child1, self.nodes[child2 as usize].child2);
            consider(g1, g2, child1, child2, &self.nodes);
            consider(g2, g1, child1, child2, &self.nodes);
        }

        let Some((grandchild, uncle, middle, _)) = best else {
            return;
        };

        // Swap the grandchild with the uncle.
        if self.nodes[node as usize].child1 == uncle {
            self.nodes[node as usize].child1 = grandchild;
        } else {
            self.nodes[node as usize].child2 = grandchild;
        }
        if self.nodes[middle as usize].child1 == grandchild {
            self.nodes[middle as usize].child1 = uncle;
        } else {
            self.nodes[middle as usize].child2 = uncle;
        }
        self.nodes[grandchild as usize].parent = node;
        self.nodes[uncle as usize].parent = middle;

        let c1 = self.nodes[middle as usize].child1;
        let c2 = self.nodes[middle as usize].child2;
        self.nodes[middle as usize].aabb =
            self.nodes[c1 as usize].aabb.union(&self.nodes[c2 as usize].aabb);
    }
}
