//! Keys and indices accepted by `get`.

use crate::{AccessError, NodeId, NodeRef};

mod sealed {
    pub trait Sealed {}

    impl Sealed for str {}
    impl Sealed for String {}
    impl Sealed for usize {}
    impl<T: Sealed + ?Sized> Sealed for &T {}
}

/// A mapping key (`&str`, `String`) or sequence index (`usize`).
///
/// Keys compare exactly; see [`NodeRef::get_prefix`] for prefix matching.
pub trait Index: sealed::Sealed {
    #[doc(hidden)]
    fn find(&self, node: NodeRef<'_>) -> Result<Option<NodeId>, AccessError>;
}

impl Index for str {
    fn find(&self, node: NodeRef<'_>) -> Result<Option<NodeId>, AccessError> {
        node.find_key(self, None)
    }
}

impl Index for String {
    fn find(&self, node: NodeRef<'_>) -> Result<Option<NodeId>, AccessError> {
        node.find_key(self, None)
    }
}

impl Index for usize {
    fn find(&self, node: NodeRef<'_>) -> Result<Option<NodeId>, AccessError> {
        node.find_item(*self)
    }
}

impl<T: Index + ?Sized> Index for &T {
    fn find(&self, node: NodeRef<'_>) -> Result<Option<NodeId>, AccessError> {
        (**self).find(node)
    }
}
