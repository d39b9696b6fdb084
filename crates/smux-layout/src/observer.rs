// ABOUTME: Notifications emitted synchronously by tree mutations.
// ABOUTME: Callers plug in one observer per tree instead of per-node callbacks.

use crate::node::PaneHandle;

/// Receives focus, close, detach and bell notifications for leaves.
///
/// Every method defaults to doing nothing.
pub trait PaneObserver: Send + Sync {
    fn focus_changed(&mut self, _pane: PaneHandle, _focused: bool) {}

    fn pane_closed(&mut self, _pane: PaneHandle, _id: Option<u32>) {}

    fn pane_detached(&mut self, _pane: PaneHandle, _id: Option<u32>) {}

    fn bell(&mut self, _pane: PaneHandle) {}
}

/// One recorded notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneEvent {
    FocusGained(PaneHandle),
    FocusLost(PaneHandle),
    Closed(PaneHandle, Option<u32>),
    Detached(PaneHandle, Option<u32>),
    Bell(PaneHandle),
}

/// Observer that forwards every notification into a channel
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<PaneEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, std::sync::mpsc::Receiver<PaneEvent>) {
        let (sender, receiver) = std::sync::mpsc::channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: PaneEvent) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.sender.send(event);
    }
}

impl PaneObserver for ChannelObserver {
    fn focus_changed(&mut self, pane: PaneHandle, focused: bool) {
        self.send(if focused {
            PaneEvent::FocusGained(pane)
        } else {
            PaneEvent::FocusLost(pane)
        });
    }

    fn pane_closed(&mut self, pane: PaneHandle, id: Option<u32>) {
        self.send(PaneEvent::Closed(pane, id));
    }

    fn pane_detached(&mut self, pane: PaneHandle, id: Option<u32>) {
        self.send(PaneEvent::Detached(pane, id));
    }

    fn bell(&mut self, pane: PaneHandle) {
        self.send(PaneEvent::Bell(pane));
    }
}
