//! Behavior script contract and the exports it produces

use serde_json::Value;

use crate::core::types::Result;
use crate::events::{ChannelEvent, Handler, HandlerScope, handler};
use crate::scene::SceneNodeId;
use crate::viewport::Viewport;

use super::utils::ScriptUtils;

/// Everything a script sees while it runs at load time
pub struct ScriptContext<'a> {
    /// Object the script is attached to
    pub this: SceneNodeId,
    pub project_path: &'a str,
    pub utils: &'a ScriptUtils,
    pub viewport: &'a mut Viewport,
}

impl ScriptContext<'_> {
    /// Uuid of the object the script is attached to
    pub fn uuid(&self) -> Option<&str> {
        self.viewport.scene().get(self.this).map(|n| n.uuid.as_str())
    }
}

/// A single named export
pub enum Export {
    /// Free-form record stored on the object
    Parameters(Value),
    /// Callback for the channel named by the export
    Handler(Handler),
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Export::Parameters(value) => f.debug_tuple("Parameters").field(value).finish(),
            Export::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Ordered `(name, export)` pairs returned by a script.
///
/// Names are resolved when the exports are merged: `parameters` sets the
/// object's record, a channel name registers a handler, anything else is
/// dropped with a warning.
#[derive(Debug, Default)]
pub struct Exports {
    entries: Vec<(String, Export)>,
}

impl Exports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a parameters record
    pub fn parameters(self, value: Value) -> Self {
        self.export("parameters", Export::Parameters(value))
    }

    /// Export a handler under `name`
    pub fn on<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: FnMut(&mut HandlerScope<'_>, Option<&ChannelEvent>) -> Result<()> + 'static,
    {
        self.export(name, Export::Handler(handler(f)))
    }

    pub fn export(mut self, name: impl Into<String>, export: Export) -> Self {
        self.entries.push((name.into(), export));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for Exports {
    type Item = (String, Export);
    type IntoIter = std::vec::IntoIter<(String, Export)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Behavior attached to a scene object, run once when scripts are loaded
pub trait BehaviorScript {
    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<Exports>;
}

impl<F> BehaviorScript for F
where
    F: Fn(&mut ScriptContext<'_>) -> Result<Exports>,
{
    fn run(&self, ctx: &mut ScriptContext<'_>) -> Result<Exports> {
        self(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exports_keep_declaration_order() {
        let exports = Exports::new()
            .on("update", |_, _| Ok(()))
            .parameters(json!({ "a": 1 }))
            .on("bogus", |_, _| Ok(()));

        assert_eq!(exports.len(), 3);
        assert_eq!(exports.names().collect::<Vec<_>>(), vec!["update", "parameters", "bogus"]);
    }

    #[test]
    fn test_parameters_export_carries_value() {
        let mut entries = Exports::new().parameters(json!({ "a": 1 })).into_iter();
        match entries.next() {
            Some((name, Export::Parameters(value))) => {
                assert_eq!(name, "parameters");
                assert_eq!(value, json!({ "a": 1 }));
            }
            other => panic!("unexpected export {other:?}"),
        }
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_empty_exports() {
        let exports = Exports::new();
        assert!(exports.is_empty());
        assert_eq!(exports.names().count(), 0);
    }
}
