//! Per-object behaviors supplied at load time

pub mod behavior;
pub mod registry;
pub mod utils;

pub use behavior::{BehaviorScript, Export, Exports, ScriptContext};
pub use registry::ScriptRegistry;
pub use utils::ScriptUtils;
