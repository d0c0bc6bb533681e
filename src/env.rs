use std::collections::HashMap;

/// Shell variables assigned with `name=value`.
///
/// Variables live as long as the interpreter that owns the store. They are never
/// removed, only overwritten, and are not exported to external commands.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: HashMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a variable, or an empty string if it was never assigned.
    pub fn get(&self, name: &str) -> String {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    /// Set or override a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}
