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

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::class::ClassDescriptor;
use crate::environment::Namespace;
use crate::error::{ClowderError, ClowderResult};
use crate::runtime::{classes, dispatch, display};
use crate::runtime::display::MemberSummary;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeCycle {
    Constructing,
    Live,
    Disposed,
}

pub(crate) struct InstanceData {
    pub(crate) class: Rc<ClassDescriptor>,
    /// Root-to-leaf ancestors; index = chain level.
    pub(crate) chain: Rc<[Rc<ClassDescriptor>]>,
    pub(crate) public: Namespace,
    pub(crate) private: Namespace,
    pub(crate) state: Cell<LifeCycle>,
}

/// Handle to a clowder instance.
///
/// Cloning the handle never copies the instance: every clone reads and writes
/// the same namespaces. Use `clone_instance` for an actual copy.
///
/// Handles are strong references. An instance that stores its own handle, or
/// one of its bound methods, in one of its slots keeps itself alive until
/// `dispose` clears the slots.
#[derive(Clone)]
pub struct Object(pub(crate) Rc<InstanceData>);

impl Object {
    pub(crate) fn from_parts(
        class: Rc<ClassDescriptor>,
        chain: Rc<[Rc<ClassDescriptor>]>,
        public: Namespace,
        private: Namespace,
        state: LifeCycle,
    ) -> Self {
        Object(Rc::new(InstanceData {
            class,
            chain,
            public,
            private,
            state: Cell::new(state),
        }))
    }

    pub fn class(&self) -> &Rc<ClassDescriptor> {
        &self.0.class
    }

    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    /// Class names from the instance's own clowder up to the root.
    pub fn class_names(&self) -> Vec<String> {
        self.0
            .chain
            .iter()
            .rev()
            .map(|class| class.name().to_string())
            .collect()
    }

    pub fn is_instance_of(&self, class: &ClassDescriptor) -> bool {
        self.0.class.inherits_from(class)
    }

    pub fn state(&self) -> LifeCycle {
        self.0.state.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == LifeCycle::Disposed
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Reads a public member (`obj$name`).
    pub fn get(&self, name: &str) -> ClowderResult<Value> {
        dispatch::get_member(self, name)
    }

    /// Writes a public member (`obj$name <- value`).
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ClowderResult<()> {
        dispatch::set_member(self, name, value.into())
    }

    /// Invokes a public method (`obj$name(args...)`).
    pub fn call(&self, name: &str, args: Vec<Value>) -> ClowderResult<Value> {
        dispatch::call_member(self, name, args)
    }

    /// True if `name` is reachable through the public path.
    pub fn has(&self, name: &str) -> bool {
        !self.is_disposed() && (name == "self" || self.0.public.contains(name))
    }

    /// One summary per member, public first, for diagnostic printing.
    pub fn describe(&self) -> ClowderResult<Vec<MemberSummary>> {
        display::describe_instance(self)
    }

    /// Copies the instance. With `deep`, instances held in data slots are
    /// copied as well.
    pub fn clone_instance(&self, deep: bool) -> ClowderResult<Object> {
        classes::clone_instance(self, deep)
    }

    /// Runs `finalize` (if any) and releases every slot. Idempotent.
    ///
    /// This is also how a self-referencing instance is freed: clearing the
    /// slots drops the handles and bound functions that pointed back at it.
    pub fn dispose(&self) -> ClowderResult<()> {
        classes::dispose_instance(self)
    }

    pub(crate) fn public_ns(&self) -> &Namespace {
        &self.0.public
    }

    pub(crate) fn private_ns(&self) -> &Namespace {
        &self.0.private
    }

    pub(crate) fn chain(&self) -> &[Rc<ClassDescriptor>] {
        &self.0.chain
    }

    pub(crate) fn ensure_usable(&self) -> ClowderResult<()> {
        if self.is_disposed() {
            return Err(ClowderError::InstanceDisposed {
                class: self.class_name().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class_name())
            .field("state", &self.state())
            .finish()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.class_name())
    }
}
