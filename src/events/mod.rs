//! Named event channels and their listener table

pub mod channel;
pub mod table;

pub use channel::{Channel, ChannelEvent, StartInfo, UnknownChannel};
pub use table::{EventTable, Handler, HandlerScope, ListenerId, handler};
