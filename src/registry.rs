use crate::error::{DefinitionError, EvalError};
use crate::functions::{register_builtins, EntryKind, Function};
use log::debug;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("name pattern is valid"));

/// Names known to the evaluator.
///
/// Built-ins are fixed at construction. User entries can be redefined freely but may
/// never take a built-in's name.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    builtins: HashMap<String, Function>,
    user: HashMap<String, Function>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            builtins: HashMap::new(),
            user: HashMap::new(),
        };
        register_builtins(&mut registry);
        registry
    }

    pub(crate) fn register_builtin(&mut self, name: &str, function: Function) {
        self.builtins.insert(name.to_string(), function);
    }

    pub fn get(&self, name: &str) -> Result<Function, EvalError> {
        self.user
            .get(name)
            .or_else(|| self.builtins.get(name))
            .cloned()
            .ok_or_else(|| EvalError::FunctionNotDefined(name.to_string()))
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Adds or replaces a user entry.
    pub fn define(&mut self, name: &str, function: Function) -> Result<(), DefinitionError> {
        if !NAME_PATTERN.is_match(name) {
            return Err(DefinitionError::WrongFunctionName(name.to_string()));
        }
        if self.is_builtin(name) {
            return Err(DefinitionError::FunctionAlreadyExists(name.to_string()));
        }
        if self.user.insert(name.to_string(), function).is_some() {
            debug!("Redefined '{}'", name);
        } else {
            debug!("Defined '{}'", name);
        }
        Ok(())
    }

    /// Sets a user entry under a name the crate controls, skipping validation.
    pub(crate) fn bind(&mut self, name: &str, function: Function) {
        self.user.insert(name.to_string(), function);
    }

    /// Removes a user entry. Unknown names and built-ins are left alone.
    pub fn delete(&mut self, name: &str) {
        if self.user.remove(name).is_some() {
            debug!("Deleted '{}'", name);
        }
    }

    pub fn clear(&mut self) {
        self.user.clear();
    }

    pub fn list(&self) -> BTreeMap<String, EntryKind> {
        Self::listing(&self.user)
    }

    pub fn list_builtins(&self) -> BTreeMap<String, EntryKind> {
        Self::listing(&self.builtins)
    }

    fn listing(functions: &HashMap<String, Function>) -> BTreeMap<String, EntryKind> {
        functions
            .iter()
            .map(|(name, function)| (name.clone(), function.kind()))
            .collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
