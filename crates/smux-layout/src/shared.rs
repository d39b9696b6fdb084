// ABOUTME: Thread-safe handle to a pane tree behind a single tree-wide lock.
// ABOUTME: Lets terminal I/O threads report exits and bells while the UI thread mutates.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use smux_core::ConnectionState;

use crate::content::PaneContent;
use crate::lifecycle::PendingClose;
use crate::node::PaneHandle;
use crate::tree::PaneTree;

/// A pane tree shared between threads.
///
/// All mutation goes through one write lock per tree, so two siblings
/// closing at the same moment are applied one after the other.
pub struct SharedPaneTree<C: PaneContent> {
    inner: Arc<RwLock<PaneTree<C>>>,
}

impl<C: PaneContent> Clone for SharedPaneTree<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: PaneContent> SharedPaneTree<C> {
    pub fn new(tree: PaneTree<C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, PaneTree<C>> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, PaneTree<C>> {
        self.inner.write()
    }

    pub fn with<R>(&self, f: impl FnOnce(&PaneTree<C>) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut PaneTree<C>) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn request_close(&self, pane: PaneHandle) -> Option<PendingClose> {
        self.inner.read().request_close(pane)
    }

    pub fn complete_close(&self, pending: PendingClose) -> bool {
        self.inner.write().complete_close(pending)
    }

    /// Close `pane` right away if it still has a parent
    pub fn close_pane(&self, pane: PaneHandle) -> bool {
        self.inner.write().close_pane(pane)
    }

    pub fn connection_state_changed(&self, pane: PaneHandle, state: ConnectionState) -> bool {
        self.inner.write().handle_connection_state(pane, state)
    }

    pub fn bell(&self, pane: PaneHandle) -> bool {
        self.inner.write().handle_bell(pane)
    }

    /// Take the tree back once this is the last handle
    pub fn into_inner(self) -> Result<PaneTree<C>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
