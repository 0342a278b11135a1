//! Flat-array node storage for [`super::AabbTree`], indexed by [`NodeIndex`].

use super::aabb::Aabb;

/// Index into an [`super::AabbTree`]'s node array. `NULL` marks an absent
/// link (no parent, no child, no free-list successor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
  pub const NULL: Self = Self(u32::MAX);

  #[inline]
  pub fn is_null(self) -> bool {
    self == Self::NULL
  }

  #[inline]
  pub(super) fn index(self) -> usize {
    self.0 as usize
  }
}

/// One node of the tree: an internal node iff `children[0]` is non-null.
///
/// `userdata` is `None` for internal nodes — only leaves carry caller data.
#[derive(Clone, Debug)]
pub struct Node<UserData> {
  pub aabb: Aabb,
  pub height: i32,
  pub parent: NodeIndex,
  pub children: [NodeIndex; 2],
  pub userdata: Option<UserData>,
}

impl<UserData> Node<UserData> {
  #[inline]
  pub(super) fn is_leaf(&self) -> bool {
    self.children[0].is_null()
  }
}
