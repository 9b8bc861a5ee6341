use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::evaluator::Value;

/// A name-to-value frame with an optional parent link. Handles are cheap
/// `Rc` clones, so a closure and the scope it was created in observe the
/// same frame.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<Frame>>,
}

#[derive(Debug)]
struct Frame {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Frame {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn new_enclosed(parent: Environment) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Frame {
                bindings: HashMap::new(),
                parent: Some(parent),
            })),
        }
    }

    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Lookup walks the parent chain; innermost binding wins.
    pub fn get(&self, name: &str) -> Option<Value> {
        let parent = {
            let frame = self.inner.borrow();
            if let Some(value) = frame.bindings.get(name) {
                return Some(value.clone());
            }
            frame.parent.clone()
        };

        parent.and_then(|scope| scope.get(name))
    }

    /// True when the innermost frame itself binds `name`.
    pub fn has_local(&self, name: &str) -> bool {
        self.inner.borrow().bindings.contains_key(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
