// ABOUTME: Macro table keyed by symbol name, disjoint from the value environment

use crate::value::Procedure;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Rc<Procedure>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        MacroRegistry {
            macros: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: String, transformer: Rc<Procedure>) {
        self.macros.insert(name, transformer);
    }

    pub fn get(&self, name: &str) -> Option<Rc<Procedure>> {
        self.macros.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }
}
