/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * Github:   https://github.com/samwilcox/pawx
 *
 * License:
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::member::{Active, Method, Visibility};
use crate::table::OrderedTable;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Public,
    Private,
    Global,
}

/// What a name is bound to inside a namespace.
///
/// Methods and active members remember the chain level of the clowder that
/// declared them; `super` lookups start one level above that.
#[derive(Clone)]
pub enum Binding {
    Data(Value),
    Method {
        method: Method,
        level: usize,
        visibility: Visibility,
    },
    Active {
        active: Active,
        level: usize,
    },
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Data(value) => write!(f, "Data({:?})", value),
            Binding::Method { level, visibility, .. } => {
                write!(f, "Method(level={}, {})", level, visibility)
            }
            Binding::Active { active, level } => {
                write!(f, "Active(level={}, {:?})", level, active.access())
            }
        }
    }
}

#[derive(Debug)]
pub struct Environment {
    kind: ScopeKind,
    values: OrderedTable<Binding>,
    parent: Option<Namespace>,
}

/// Shared handle to one mutable namespace.
///
/// Every clone aliases the same storage, which is what gives instances their
/// reference semantics. The parent link is the enclosing scope used for
/// unqualified lookups.
#[derive(Clone)]
pub struct Namespace(Rc<RefCell<Environment>>);

impl Namespace {
    pub fn new(kind: ScopeKind, parent: Option<Namespace>) -> Self {
        Namespace(Rc::new(RefCell::new(Environment {
            kind,
            values: OrderedTable::new(),
            parent,
        })))
    }

    /// Outermost scope: process-level globals.
    pub fn global() -> Self {
        Namespace::new(ScopeKind::Global, None)
    }

    pub fn kind(&self) -> ScopeKind {
        self.0.borrow().kind
    }

    pub fn parent(&self) -> Option<Namespace> {
        self.0.borrow().parent.clone()
    }

    /// Binds `name` in this namespace, replacing any existing binding.
    pub fn define(&self, name: impl Into<String>, binding: Binding) {
        self.0.borrow_mut().values.insert(name, binding);
    }

    pub fn define_value(&self, name: impl Into<String>, value: Value) {
        self.define(name, Binding::Data(value));
    }

    /// Local lookup only. The binding is cloned so no borrow outlives the call;
    /// user code invoked afterwards is free to touch this namespace again.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.0.borrow().values.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().values.contains(name)
    }

    /// This namespace followed by every enclosing one.
    pub fn chain(&self) -> Vec<Namespace> {
        let mut chain = Vec::new();
        let mut scope = Some(self.clone());
        while let Some(current) = scope {
            scope = current.parent();
            chain.push(current);
        }
        chain
    }

    /// Replaces an existing data slot in place. Returns `false` when `name` is
    /// unbound here or bound to something other than data.
    pub fn write(&self, name: &str, value: Value) -> bool {
        let mut env = self.0.borrow_mut();
        match env.values.get_mut(name) {
            Some(Binding::Data(slot)) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.0.borrow().values.names().map(str::to_string).collect()
    }

    pub fn entries(&self) -> Vec<(String, Binding)> {
        self.0
            .borrow()
            .values
            .iter()
            .map(|(name, binding)| (name.to_string(), binding.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().values.is_empty()
    }

    /// Drops every binding. Values held by slots are released with them.
    pub fn clear(&self) {
        // Take the table out first so destructors run without a live borrow.
        let dropped = std::mem::take(&mut self.0.borrow_mut().values);
        drop(dropped);
    }

    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = self.0.borrow();
        f.debug_struct("Namespace")
            .field("kind", &env.kind)
            .field("names", &env.values.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(scope: &Namespace, name: &str) -> Option<Namespace> {
        scope.chain().into_iter().find(|ns| ns.contains(name))
    }

    #[test]
    fn chain_reaches_enclosing_bindings() {
        let globals = Namespace::global();
        let private = Namespace::new(ScopeKind::Private, Some(globals.clone()));
        let public = Namespace::new(ScopeKind::Public, Some(private.clone()));

        globals.define_value("pi", Value::from(3.0));
        private.define_value("secret", Value::from("s"));

        assert!(owner(&public, "secret").unwrap().ptr_eq(&private));
        assert!(owner(&public, "pi").unwrap().ptr_eq(&globals));
        assert!(owner(&public, "missing").is_none());
    }

    #[test]
    fn private_scope_cannot_see_public_names() {
        let private = Namespace::new(ScopeKind::Private, None);
        let public = Namespace::new(ScopeKind::Public, Some(private.clone()));
        public.define_value("x", Value::from(1));
        assert!(owner(&private, "x").is_none());
    }

    #[test]
    fn write_only_touches_existing_data() {
        let ns = Namespace::global();
        assert!(!ns.write("x", Value::from(1)));
        assert!(!ns.contains("x"));

        ns.define_value("x", Value::from(1));
        assert!(ns.write("x", Value::from(2)));
        assert!(matches!(ns.lookup("x"), Some(Binding::Data(Value::Number(n))) if n == 2.0));
    }

    #[test]
    fn handles_alias_the_same_storage() {
        let a = Namespace::global();
        let b = a.clone();
        a.define_value("x", Value::from(1));
        assert!(b.contains("x"));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn chain_lists_scopes_inner_to_outer() {
        let globals = Namespace::global();
        let private = Namespace::new(ScopeKind::Private, Some(globals.clone()));
        let kinds: Vec<_> = private.chain().iter().map(Namespace::kind).collect();
        assert_eq!(kinds, vec![ScopeKind::Private, ScopeKind::Global]);
    }
}
