use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::position::Position;
use crate::value::{Number, Value};

/// Symbol table shared between a context and its children.
pub type SharedSymbolTable = Rc<RefCell<SymbolTable>>;

/// Display name of the top-level frame.
pub const MODULE_NAME: &str = "<module>";

/// Result of a name lookup. Kept distinct from the value itself so that
/// a binding holding zero is never mistaken for a missing one.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    NotFound,
}

impl Lookup {
    #[must_use]
    pub fn found(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

/// Name to value bindings with an optional enclosing table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Value>,
    parent: Option<SharedSymbolTable>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parent(parent: SharedSymbolTable) -> Self {
        Self {
            entries: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// The top-level table, with its predefined bindings.
    #[must_use]
    pub fn global() -> SharedSymbolTable {
        let mut table = Self::new();
        table.set("null", Value::number(Number::Int(0)));
        Rc::new(RefCell::new(table))
    }

    /// Look `name` up here, then in each enclosing table in turn.
    #[must_use]
    pub fn get(&self, name: &str) -> Lookup {
        if let Some(value) = self.entries.get(name) {
            return Lookup::Found(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => Lookup::NotFound,
        }
    }

    /// Bind `name` in this table, replacing any local binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Drop the local binding for `name`. Returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An evaluation frame.
///
/// The symbol table is fixed when the context is created. A child frame
/// records where it was entered from so runtime errors can print a
/// traceback through every frame.
#[derive(Debug)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_entry_pos: Option<Position>,
    symbol_table: SharedSymbolTable,
}

impl Context {
    /// Top-level frame evaluating against `symbol_table`.
    #[must_use]
    pub fn new(display_name: impl Into<String>, symbol_table: SharedSymbolTable) -> Self {
        Self {
            display_name: display_name.into(),
            parent: None,
            parent_entry_pos: None,
            symbol_table,
        }
    }

    /// Nested frame entered from `entry_pos` inside `parent`, with a fresh
    /// table whose lookups fall back to the parent's.
    #[must_use]
    pub fn child(parent: &Rc<Self>, display_name: impl Into<String>, entry_pos: Position) -> Self {
        let table = SymbolTable::with_parent(Rc::clone(&parent.symbol_table));
        Self {
            display_name: display_name.into(),
            parent: Some(Rc::clone(parent)),
            parent_entry_pos: Some(entry_pos),
            symbol_table: Rc::new(RefCell::new(table)),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    #[must_use]
    pub const fn symbol_table(&self) -> &SharedSymbolTable {
        &self.symbol_table
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Lookup {
        self.symbol_table.borrow().get(name)
    }

    /// Bind `name` in this frame's own table.
    pub fn assign(&self, name: &str, value: Value) {
        log::trace!("{}: {name} = {value}", self.display_name);
        self.symbol_table.borrow_mut().set(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::number(Number::Int(n))
    }

    #[test]
    fn global_defines_null() {
        let globals = SymbolTable::global();
        assert_eq!(globals.borrow().get("null"), Lookup::Found(int(0)));
    }

    #[test]
    fn zero_is_found_not_missing() {
        let mut table = SymbolTable::new();
        table.set("x", int(0));
        assert_eq!(table.get("x").found(), Some(int(0)));
        assert_eq!(table.get("y"), Lookup::NotFound);
    }

    #[test]
    fn lookup_falls_back_to_parent() {
        let parent = Rc::new(RefCell::new(SymbolTable::new()));
        parent.borrow_mut().set("x", int(1));
        let child = SymbolTable::with_parent(Rc::clone(&parent));
        assert_eq!(child.get("x"), Lookup::Found(int(1)));
    }

    #[test]
    fn set_and_remove_stay_local() {
        let parent = Rc::new(RefCell::new(SymbolTable::new()));
        parent.borrow_mut().set("x", int(1));
        let mut child = SymbolTable::with_parent(Rc::clone(&parent));

        child.set("x", int(2));
        assert_eq!(child.get("x"), Lookup::Found(int(2)));
        assert_eq!(parent.borrow().get("x"), Lookup::Found(int(1)));

        assert!(child.remove("x"));
        assert_eq!(child.get("x"), Lookup::Found(int(1)));
        assert!(!child.remove("x"));
        assert_eq!(parent.borrow().len(), 1);
    }

    #[test]
    fn child_context_chains_to_parent() {
        let root = Rc::new(Context::new(MODULE_NAME, SymbolTable::global()));
        let entry = crate::position::Position::start(crate::position::Source::new("<test>", "f"));
        let child = Context::child(&root, "f", entry);

        assert_eq!(child.lookup("null"), Lookup::Found(int(0)));
        child.assign("local", int(3));
        assert_eq!(root.lookup("local"), Lookup::NotFound);
        assert_eq!(child.parent().map(|c| c.display_name.as_str()), Some(MODULE_NAME));
        assert!(child.symbol_table().borrow().len() == 1);
    }
}
