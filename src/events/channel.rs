//! Event channel names and payloads

use std::fmt;
use std::str::FromStr;

use crate::core::input::InputEvent;

/// A named category of recurring event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Start,
    Update,
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    MouseMove,
    TouchStart,
    TouchEnd,
    TouchMove,
}

impl Channel {
    pub const COUNT: usize = 10;

    /// Every channel, in table order
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Start,
        Channel::Update,
        Channel::KeyDown,
        Channel::KeyUp,
        Channel::MouseDown,
        Channel::MouseUp,
        Channel::MouseMove,
        Channel::TouchStart,
        Channel::TouchEnd,
        Channel::TouchMove,
    ];

    /// Export name used by behavior scripts
    pub fn name(self) -> &'static str {
        match self {
            Channel::Start => "start",
            Channel::Update => "update",
            Channel::KeyDown => "keydown",
            Channel::KeyUp => "keyup",
            Channel::MouseDown => "mousedown",
            Channel::MouseUp => "mouseup",
            Channel::MouseMove => "mousemove",
            Channel::TouchStart => "touchstart",
            Channel::TouchEnd => "touchend",
            Channel::TouchMove => "touchmove",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that matches no channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownChannel(pub String);

impl fmt::Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event type not supported ({})", self.0)
    }
}

impl std::error::Error for UnknownChannel {}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// Payload handed to the `start` channel once scripts are loaded
#[derive(Clone, Debug, PartialEq)]
pub struct StartInfo {
    /// Base path the scripts were loaded with
    pub project_path: String,
    /// Uuids of the objects that received scripts, in load order
    pub objects: Vec<String>,
}

/// Payload of a dispatched channel event
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelEvent {
    Start(StartInfo),
    Input(InputEvent),
}

impl ChannelEvent {
    /// The input event, for input channels
    pub fn as_input(&self) -> Option<&InputEvent> {
        match self {
            ChannelEvent::Input(input) => Some(input),
            ChannelEvent::Start(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for channel in Channel::ALL {
            assert_eq!(channel.name().parse::<Channel>(), Ok(channel));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "bogus".parse::<Channel>().unwrap_err();
        assert_eq!(err, UnknownChannel("bogus".to_string()));
        assert_eq!(err.to_string(), "event type not supported (bogus)");
        assert!("parameters".parse::<Channel>().is_err());
        assert!("Update".parse::<Channel>().is_err());
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, channel) in Channel::ALL.into_iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }
}
