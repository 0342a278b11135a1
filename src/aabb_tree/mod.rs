//! A dynamic bounding-volume hierarchy over caller-tagged rectangles.
//!
//! Supports `add`/`remove`/`modify` with velocity-biased fattening (so small
//! moves don't trigger a structural update) and surface-area-heuristic
//! insertion with height-balancing rotations, in the style of Box2D's
//! `b2DynamicTree`. Queries (`collide_point`, `collide_aabb`,
//! `collide_custom`) descend from the root, pruning on AABB rejection.

mod aabb;
mod node;
mod query;

pub use aabb::Aabb;
pub use node::NodeIndex;

use glam::Vec2;
use node::Node;

/// Tuning knobs for one [`AabbTree`].
#[derive(Clone, Copy, Debug)]
pub struct AabbTreeConfig {
  /// Uniform inflation applied to every inserted AABB so small moves don't
  /// force a reinsertion.
  pub extra_margin: f32,
  /// Additional slack tolerated before a `modify` re-tightens the node,
  /// beyond `extra_margin`. By convention `4 * extra_margin`.
  pub shrink_margin: f32,
  /// Multiplier applied to a reported velocity when predictively inflating
  /// a `modify`'d rectangle toward its direction of travel.
  pub velocity_margin_factor: f32,
  /// Minimum child-height difference that triggers a rebalancing rotation.
  /// Must be `>= 1`; `2` damps oscillation without rebalancing on every
  /// single-level imbalance.
  pub balance_threshold: i32,
}

impl Default for AabbTreeConfig {
  fn default() -> Self {
    let extra_margin = 0.1;
    Self {
      extra_margin,
      shrink_margin: 4.0 * extra_margin,
      velocity_margin_factor: 1.0,
      balance_threshold: 2,
    }
  }
}

impl AabbTreeConfig {
  pub fn with_extra_margin(mut self, v: f32) -> Self {
    self.extra_margin = v;
    self
  }

  pub fn with_shrink_margin(mut self, v: f32) -> Self {
    self.shrink_margin = v;
    self
  }

  pub fn with_velocity_margin_factor(mut self, v: f32) -> Self {
    self.velocity_margin_factor = v;
    self
  }

  pub fn with_balance_threshold(mut self, v: i32) -> Self {
    debug_assert!(v >= 1, "balance_threshold must be >= 1");
    self.balance_threshold = v;
    self
  }
}

/// A dynamic AABB tree over `UserData`-tagged rectangles.
pub struct AabbTree<UserData> {
  nodes: Vec<Node<UserData>>,
  root: NodeIndex,
  free_list: NodeIndex,
  node_count: usize,
  config: AabbTreeConfig,
}

impl<UserData> AabbTree<UserData> {
  pub fn new(config: AabbTreeConfig) -> Self {
    Self {
      nodes: Vec::new(),
      root: NodeIndex::NULL,
      free_list: NodeIndex::NULL,
      node_count: 0,
      config,
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.node_count
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.node_count == 0
  }

  #[inline]
  pub fn userdata(&self, id: NodeIndex) -> &UserData {
    self.nodes[id.index()]
      .userdata
      .as_ref()
      .expect("userdata requested for an internal node")
  }

  #[inline]
  pub fn userdata_mut(&mut self, id: NodeIndex) -> &mut UserData {
    self.nodes[id.index()]
      .userdata
      .as_mut()
      .expect("userdata requested for an internal node")
  }

  /// The node's current (fattened) AABB.
  #[inline]
  pub fn fat_aabb(&self, id: NodeIndex) -> Aabb {
    self.nodes[id.index()].aabb
  }

  /// Iterates every currently-live leaf's handle, in no particular order.
  /// Useful for a debug overlay or a full-tree dump; not a substitute for
  /// `collide_*` queries on any path that cares about performance.
  pub fn leaf_ids(&self) -> impl Iterator<Item = NodeIndex> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, node)| node.height >= 0 && node.userdata.is_some())
      .map(|(i, _)| NodeIndex(i as u32))
  }

  fn allocate_node(&mut self, aabb: Aabb, userdata: Option<UserData>) -> NodeIndex {
    if self.free_list.is_null() {
      let idx = NodeIndex(self.nodes.len() as u32);
      self.nodes.push(Node {
        aabb,
        height: 0,
        parent: NodeIndex::NULL,
        children: [NodeIndex::NULL, NodeIndex::NULL],
        userdata,
      });
      return idx;
    }
    let idx = self.free_list;
    self.free_list = self.nodes[idx.index()].parent;
    let node = &mut self.nodes[idx.index()];
    node.aabb = aabb;
    node.height = 0;
    node.parent = NodeIndex::NULL;
    node.children = [NodeIndex::NULL, NodeIndex::NULL];
    node.userdata = userdata;
    idx
  }

  /// Recycles `id`'s slot onto the free list. Does not touch `node_count`:
  /// callers track that themselves, since this is also used to discard
  /// internal nodes collapsed during removal, which were never counted.
  fn free_node(&mut self, id: NodeIndex) {
    let node = &mut self.nodes[id.index()];
    node.height = -1;
    node.parent = self.free_list;
    self.free_list = id;
  }

  /// Inserts `rect` (inflated by `extra_margin`) tagged with `userdata`.
  /// Returns a stable handle valid until [`Self::remove`].
  pub fn add(&mut self, rect: Aabb, userdata: UserData) -> NodeIndex {
    let fattened = rect.expand(self.config.extra_margin);
    let leaf = self.allocate_node(fattened, Some(userdata));
    self.node_count += 1;
    self.insert_leaf(leaf);
    log::trace!("aabb_tree: inserted {:?} with aabb {:?}", leaf, fattened);
    leaf
  }

  /// Removes `id` from the tree, rebalancing ancestors on the way up.
  pub fn remove(&mut self, id: NodeIndex) {
    debug_assert!(self.nodes[id.index()].is_leaf(), "remove called on internal node");
    self.remove_leaf(id);
    self.free_node(id);
    self.node_count -= 1;
  }

  /// Updates `id`'s tracked rectangle to `rect`, predicting ahead by
  /// `velocity * velocity_margin_factor`. Uses the cheap-move shortcut when
  /// the existing fattened AABB still contains the re-inflated request;
  /// otherwise removes and reinserts at the same id. Returns whether a
  /// structural reinsertion happened.
  pub fn modify(&mut self, id: NodeIndex, rect: Aabb, velocity: Vec2) -> bool {
    debug_assert!(self.nodes[id.index()].is_leaf(), "modify called on internal node");
    if self.nodes[id.index()].aabb.contains(rect) {
      let reinflated = rect
        .expand(self.config.extra_margin + self.config.shrink_margin)
        .expand_in_dir(velocity * self.config.velocity_margin_factor);
      if reinflated.contains(self.nodes[id.index()].aabb) {
        return false;
      }
    }

    let velocity_extended = rect
      .expand(self.config.extra_margin)
      .expand_in_dir(velocity * self.config.velocity_margin_factor);
    self.remove_leaf(id);
    self.nodes[id.index()].aabb = velocity_extended;
    self.insert_leaf(id);
    log::trace!("aabb_tree: reinserted {:?} with aabb {:?}", id, velocity_extended);
    true
  }

  fn insert_leaf(&mut self, leaf: NodeIndex) {
    if self.root.is_null() {
      self.root = leaf;
      self.nodes[leaf.index()].parent = NodeIndex::NULL;
      return;
    }

    let leaf_aabb = self.nodes[leaf.index()].aabb;
    let mut current = self.root;
    while !self.nodes[current.index()].is_leaf() {
      let node = &self.nodes[current.index()];
      let combined = node.aabb.combine(leaf_aabb);
      let sibling_cost = 2.0 * combined.perimeter();
      let inheritance_cost = 2.0 * (combined.perimeter() - node.aabb.perimeter());
      let children = node.children;

      let child_cost = |tree: &Self, child: NodeIndex| -> f32 {
        let child_node = &tree.nodes[child.index()];
        let combined_child = child_node.aabb.combine(leaf_aabb);
        let mut cost = inheritance_cost + combined_child.perimeter();
        if !child_node.is_leaf() {
          cost -= child_node.aabb.perimeter();
        }
        cost
      };
      let cost0 = child_cost(self, children[0]);
      let cost1 = child_cost(self, children[1]);

      if sibling_cost < cost0 && sibling_cost < cost1 {
        break;
      }
      current = if cost1 < cost0 { children[1] } else { children[0] };
    }

    let sibling = current;
    let old_parent = self.nodes[sibling.index()].parent;
    let new_parent = self.allocate_node(self.nodes[sibling.index()].aabb.combine(leaf_aabb), None);
    self.nodes[new_parent.index()].height = self.nodes[sibling.index()].height + 1;
    self.nodes[new_parent.index()].parent = old_parent;
    self.nodes[new_parent.index()].children = [sibling, leaf];
    self.nodes[sibling.index()].parent = new_parent;
    self.nodes[leaf.index()].parent = new_parent;

    if old_parent.is_null() {
      self.root = new_parent;
    } else if self.nodes[old_parent.index()].children[0] == sibling {
      self.nodes[old_parent.index()].children[0] = new_parent;
    } else {
      self.nodes[old_parent.index()].children[1] = new_parent;
    }

    let mut walker = new_parent;
    while !walker.is_null() {
      walker = self.balance(walker);
      let children = self.nodes[walker.index()].children;
      let (hc0, hc1) = (self.nodes[children[0].index()].height, self.nodes[children[1].index()].height);
      self.nodes[walker.index()].height = 1 + hc0.max(hc1);
      self.nodes[walker.index()].aabb = self.nodes[children[0].index()].aabb.combine(self.nodes[children[1].index()].aabb);
      walker = self.nodes[walker.index()].parent;
    }
  }

  fn remove_leaf(&mut self, leaf: NodeIndex) {
    if self.root == leaf {
      self.root = NodeIndex::NULL;
      return;
    }
    let parent = self.nodes[leaf.index()].parent;
    let grandparent = self.nodes[parent.index()].parent;
    let sibling = if self.nodes[parent.index()].children[0] == leaf {
      self.nodes[parent.index()].children[1]
    } else {
      self.nodes[parent.index()].children[0]
    };

    if grandparent.is_null() {
      self.root = sibling;
      self.nodes[sibling.index()].parent = NodeIndex::NULL;
      self.free_node(parent);
      return;
    }

    if self.nodes[grandparent.index()].children[0] == parent {
      self.nodes[grandparent.index()].children[0] = sibling;
    } else {
      self.nodes[grandparent.index()].children[1] = sibling;
    }
    self.nodes[sibling.index()].parent = grandparent;
    self.free_node(parent);

    let mut walker = grandparent;
    while !walker.is_null() {
      walker = self.balance(walker);
      let children = self.nodes[walker.index()].children;
      let (hc0, hc1) = (self.nodes[children[0].index()].height, self.nodes[children[1].index()].height);
      self.nodes[walker.index()].height = 1 + hc0.max(hc1);
      self.nodes[walker.index()].aabb = self.nodes[children[0].index()].aabb.combine(self.nodes[children[1].index()].aabb);
      walker = self.nodes[walker.index()].parent;
    }
  }

  /// Rebalances the subtree rooted at `a` if its children's heights differ
  /// by more than `balance_threshold`. Returns the index now occupying `a`'s
  /// former position (unchanged unless a rotation happened).
  fn balance(&mut self, i_a: NodeIndex) -> NodeIndex {
    let a = &self.nodes[i_a.index()];
    if a.is_leaf() || a.height < 2 {
      return i_a;
    }
    let i_b = a.children[0];
    let i_c = a.children[1];
    let height_b = self.nodes[i_b.index()].height;
    let height_c = self.nodes[i_c.index()].height;
    let balance = height_c - height_b;
    let threshold = self.config.balance_threshold;

    if balance > threshold {
      self.rotate_up(i_a, i_b, i_c)
    } else if balance < -threshold {
      self.rotate_up(i_a, i_c, i_b)
    } else {
      i_a
    }
  }

  /// Rotates `i_winner` (currently a child of `i_a`) up into `i_a`'s
  /// position; `i_loser` is `i_a`'s other child, which stays put. Handles
  /// both rotation directions symmetrically depending on which child is
  /// passed as `i_winner` — both of `i_a`'s child slots are reassigned
  /// explicitly below rather than assumed, since `i_loser` may have
  /// originally sat in either slot of `i_a.children`.
  fn rotate_up(&mut self, i_a: NodeIndex, i_loser: NodeIndex, i_winner: NodeIndex) -> NodeIndex {
    let i_d = self.nodes[i_winner.index()].children[0];
    let i_e = self.nodes[i_winner.index()].children[1];

    let old_parent = self.nodes[i_a.index()].parent;
    self.nodes[i_winner.index()].children[0] = i_a;
    self.nodes[i_winner.index()].parent = old_parent;
    self.nodes[i_a.index()].parent = i_winner;

    if old_parent.is_null() {
      self.root = i_winner;
    } else if self.nodes[old_parent.index()].children[0] == i_a {
      self.nodes[old_parent.index()].children[0] = i_winner;
    } else {
      self.nodes[old_parent.index()].children[1] = i_winner;
    }

    let height_d = self.nodes[i_d.index()].height;
    let height_e = self.nodes[i_e.index()].height;
    let (keep_with_winner, give_to_a) = if height_d > height_e { (i_d, i_e) } else { (i_e, i_d) };

    self.nodes[i_winner.index()].children[1] = keep_with_winner;
    self.nodes[i_a.index()].children[0] = i_loser;
    self.nodes[i_a.index()].children[1] = give_to_a;
    self.nodes[give_to_a.index()].parent = i_a;

    let loser_aabb = self.nodes[i_loser.index()].aabb;
    let give_to_a_aabb = self.nodes[give_to_a.index()].aabb;
    let keep_with_winner_aabb = self.nodes[keep_with_winner.index()].aabb;
    self.nodes[i_a.index()].aabb = loser_aabb.combine(give_to_a_aabb);
    self.nodes[i_winner.index()].aabb = self.nodes[i_a.index()].aabb.combine(keep_with_winner_aabb);

    let loser_height = self.nodes[i_loser.index()].height;
    let give_to_a_height = self.nodes[give_to_a.index()].height;
    self.nodes[i_a.index()].height = 1 + loser_height.max(give_to_a_height);
    let a_height = self.nodes[i_a.index()].height;
    let keep_with_winner_height = self.nodes[keep_with_winner.index()].height;
    self.nodes[i_winner.index()].height = 1 + a_height.max(keep_with_winner_height);

    i_winner
  }

  /// Debug-only invariant check: recomputed heights/AABBs match stored
  /// values, child-parent pointers agree, and exactly one node (the root)
  /// has a null parent.
  #[cfg(debug_assertions)]
  pub fn validate(&self) {
    if self.root.is_null() {
      return;
    }
    self.validate_rec(self.root);
    debug_assert!(self.nodes[self.root.index()].parent.is_null());
  }

  #[cfg(debug_assertions)]
  fn validate_rec(&self, id: NodeIndex) {
    let node = &self.nodes[id.index()];
    if node.is_leaf() {
      debug_assert_eq!(node.height, 0);
      return;
    }
    let (c0, c1) = (node.children[0], node.children[1]);
    debug_assert_eq!(self.nodes[c0.index()].parent, id);
    debug_assert_eq!(self.nodes[c1.index()].parent, id);
    let expected_aabb = self.nodes[c0.index()].aabb.combine(self.nodes[c1.index()].aabb);
    debug_assert_eq!(node.aabb, expected_aabb);
    let expected_height = 1 + self.nodes[c0.index()].height.max(self.nodes[c1.index()].height);
    debug_assert_eq!(node.height, expected_height);
    self.validate_rec(c0);
    self.validate_rec(c1);
  }

  #[cfg(not(debug_assertions))]
  #[inline]
  pub fn validate(&self) {}
}
