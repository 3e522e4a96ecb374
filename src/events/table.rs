//! Listener table: ordered handlers per channel

use crate::core::camera::Camera;
use crate::core::types::Result;
use crate::scene::{SceneGraph, SceneNode, SceneNodeId};

use super::channel::{Channel, ChannelEvent};

/// What a handler can touch while it runs
pub struct HandlerScope<'a> {
    /// Object the handler was registered for, if any
    pub this: Option<SceneNodeId>,
    pub scene: &'a mut SceneGraph,
    pub camera: &'a mut Camera,
    /// Nodes considered by hover picking
    pub interactables: &'a mut Vec<SceneNodeId>,
}

impl HandlerScope<'_> {
    /// The handler's own object
    pub fn this_node(&self) -> Option<&SceneNode> {
        self.this.and_then(|id| self.scene.get(id))
    }

    /// The handler's own object, mutably
    pub fn this_node_mut(&mut self) -> Option<&mut SceneNode> {
        self.this.and_then(|id| self.scene.get_mut(id))
    }
}

/// Channel callback. Returning an error stops the rest of the dispatch.
pub type Handler = Box<dyn FnMut(&mut HandlerScope<'_>, Option<&ChannelEvent>) -> Result<()>>;

/// Box a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: FnMut(&mut HandlerScope<'_>, Option<&ChannelEvent>) -> Result<()> + 'static,
{
    Box::new(f)
}

/// Handle returned by [`EventTable::register`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    target: Option<SceneNodeId>,
    handler: Handler,
}

/// Ordered handler lists keyed by channel. Insertion order is call order and
/// the same handler may be registered more than once.
pub struct EventTable {
    listeners: [Vec<Listener>; Channel::COUNT],
    next_id: u64,
}

impl EventTable {
    pub fn new() -> Self {
        Self {
            listeners: std::array::from_fn(|_| Vec::new()),
            next_id: 0,
        }
    }

    /// Append a handler to `channel`, bound to `target` as its receiver
    pub fn register(&mut self, channel: Channel, target: Option<SceneNodeId>, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners[channel.index()].push(Listener { id, target, handler });
        log::trace!("Events: registered {:?} on '{}'", id, channel);
        id
    }

    /// Remove a handler; returns false when it was not registered
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        for list in &mut self.listeners {
            if let Some(pos) = list.iter().position(|l| l.id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of handlers on `channel`
    pub fn len(&self, channel: Channel) -> usize {
        self.listeners[channel.index()].len()
    }

    pub fn is_empty(&self, channel: Channel) -> bool {
        self.listeners[channel.index()].is_empty()
    }

    /// Receivers of the handlers on `channel`, in call order
    pub fn targets(&self, channel: Channel) -> Vec<Option<SceneNodeId>> {
        self.listeners[channel.index()].iter().map(|l| l.target).collect()
    }

    /// Invoke every handler on `channel` in registration order with the same
    /// payload. The first error aborts the remaining handlers.
    pub fn dispatch(
        &mut self,
        channel: Channel,
        payload: Option<&ChannelEvent>,
        scope: &mut HandlerScope<'_>,
    ) -> Result<()> {
        let caller = scope.this;
        let mut result = Ok(());
        for listener in &mut self.listeners[channel.index()] {
            scope.this = listener.target;
            result = (listener.handler)(scope, payload);
            if result.is_err() {
                break;
            }
        }
        scope.this = caller;
        result
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::new()
    }
}
