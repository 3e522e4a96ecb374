//! Object uuid to behavior script association

use super::behavior::BehaviorScript;

/// Ordered mapping from scene-object uuid to the scripts attached to it.
/// Objects keep the order of their first registration; scripts keep
/// registration order within an object.
#[derive(Default)]
pub struct ScriptRegistry {
    entries: Vec<(String, Vec<Box<dyn BehaviorScript>>)>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a script to the object with `uuid`
    pub fn register(&mut self, uuid: impl Into<String>, script: impl BehaviorScript + 'static) -> &mut Self {
        let uuid = uuid.into();
        let script: Box<dyn BehaviorScript> = Box::new(script);
        match self.entries.iter_mut().find(|(id, _)| *id == uuid) {
            Some((_, scripts)) => scripts.push(script),
            None => self.entries.push((uuid, vec![script])),
        }
        self
    }

    /// Scripts attached to `uuid`
    pub fn scripts(&self, uuid: &str) -> &[Box<dyn BehaviorScript>] {
        self.entries
            .iter()
            .find(|(id, _)| id == uuid)
            .map_or(&[], |(_, scripts)| scripts.as_slice())
    }

    /// Object uuids in registration order
    pub fn uuids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ScriptRegistry {
    type Item = (String, Vec<Box<dyn BehaviorScript>>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Result;
    use crate::script::{Exports, ScriptContext};

    fn noop(_: &mut ScriptContext<'_>) -> Result<Exports> {
        Ok(Exports::new())
    }

    #[test]
    fn test_objects_and_scripts_keep_registration_order() {
        let mut registry = ScriptRegistry::new();
        registry
            .register("b", noop)
            .register("a", noop)
            .register("b", |_: &mut ScriptContext<'_>| -> Result<Exports> { Ok(Exports::new()) });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.uuids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(registry.scripts("b").len(), 2);
        assert_eq!(registry.scripts("a").len(), 1);
        assert!(registry.scripts("missing").is_empty());
    }
}
