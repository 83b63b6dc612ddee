/*
 * =============================================================================
 *  PAWX - Code with Claws!
 * =============================================================================
 *
 *  File:     class.rs
 *  Purpose:  Clowder (class) declarations for the PAWX runtime.
 *            Validates member tables, links single inheritance and produces
 *            the immutable descriptor every instance is built from.
 *
 *  Author:   Sam Wilcox
 *  Email:    sam@pawx-lang.com
 *  Website:  https://www.pawx-lang.com
 *  GitHub:   https://github.com/samwilcox/pawx
 *
 * -----------------------------------------------------------------------------
 *  License:
 * -----------------------------------------------------------------------------
 *  This file is part of the PAWX programming language project.
 *
 *  PAWX is dual-licensed under the terms of:
 *    - The MIT License
 *    - The Apache License, Version 2.0
 *
 *  You may choose either license to govern your use of this software.
 *
 *  Full license text available at:
 *      https://license.pawx-lang.com
 *
 * -----------------------------------------------------------------------------
 *  Warranty Disclaimer:
 * -----------------------------------------------------------------------------
 *  Unless required by applicable law or agreed to in writing, this software is
 *  distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 *  either express or implied.
 *
 * =============================================================================
 */

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::ClassOptions;
use crate::environment::Namespace;
use crate::error::{ClowderError, ClowderResult};
use crate::member::{MemberDef, MemberTable, Section};
use crate::runtime::classes::construct_instance;
use crate::runtime::display::MemberSummary;
use crate::runtime::instance::Object;
use crate::value::Value;

/// Names with fixed meaning inside a method frame.
pub const RESERVED_NAMES: [&str; 3] = ["self", "private", "super"];

/// Constructor hook, run by the factory with the constructor arguments.
pub const INITIALIZE: &str = "initialize";

/// Disposal hook, run once by `Object::dispose`.
pub const FINALIZE: &str = "finalize";

/// Built-in copy method available on cloneable clowders.
pub const CLONE: &str = "clone";

static MEMBER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_.][A-Za-z0-9_.]*$").expect("member name pattern is valid")
});

/// ==========================================================================
/// CLASS DESCRIPTOR
/// ==========================================================================

/// Immutable declaration of one clowder.
///
/// Holds only this level's own members. Parent members are never copied in
/// here; the factory flattens the chain per instance.
pub struct ClassDescriptor {
    name: String,
    public: MemberTable,
    private: MemberTable,
    active: MemberTable,
    parent: Option<Rc<ClassDescriptor>>,
    options: ClassOptions,
    depth: usize,
}

impl ClassDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<ClassDescriptor>> {
        self.parent.as_ref()
    }

    pub fn public(&self) -> &MemberTable {
        &self.public
    }

    pub fn private(&self) -> &MemberTable {
        &self.private
    }

    pub fn active(&self) -> &MemberTable {
        &self.active
    }

    pub fn options(&self) -> &ClassOptions {
        &self.options
    }

    pub fn is_locked(&self) -> bool {
        self.options.lock_class
    }

    /// Chain level: 0 for a root clowder, parent's depth + 1 otherwise.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn table(&self, section: Section) -> &MemberTable {
        match section {
            Section::Public => &self.public,
            Section::Private => &self.private,
            Section::Active => &self.active,
        }
    }

    /// Ancestor chain from the root down to (and including) this clowder.
    pub fn chain(self: &Rc<Self>) -> Vec<Rc<ClassDescriptor>> {
        let mut chain = Vec::with_capacity(self.depth + 1);
        let mut current = Some(self.clone());
        while let Some(class) = current {
            current = class.parent.clone();
            chain.push(class);
        }
        chain.reverse();
        chain
    }

    /// Looks `name` up in this level's own tables.
    pub fn own_member(&self, name: &str) -> Option<(Section, &MemberDef)> {
        [Section::Public, Section::Private, Section::Active]
            .into_iter()
            .find_map(|section| self.table(section).get(name).map(|def| (section, def)))
    }

    /// True when `other` is this clowder or one of its ancestors.
    pub fn inherits_from(&self, other: &ClassDescriptor) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    /// Builds a new instance with an empty globals scope.
    ///
    /// Use `Registry::new_instance` to run methods against registry globals.
    pub fn new_instance(self: &Rc<Self>, args: Vec<Value>) -> ClowderResult<Object> {
        construct_instance(self, args, &Namespace::global())
    }

    /// Summaries of this level's own members, in declaration order.
    pub fn describe(&self) -> Vec<MemberSummary> {
        [Section::Public, Section::Private, Section::Active]
            .into_iter()
            .flat_map(|section| {
                self.table(section).iter().map(move |(name, def)| {
                    MemberSummary::new(name, section.visibility(), def.kind(), def.describe())
                })
            })
            .collect()
    }

    /// Copy of this descriptor with one member added or replaced.
    ///
    /// Backs `Registry::set`; the original descriptor is untouched, so
    /// instances already built from it never observe the change.
    pub(crate) fn with_member(
        &self,
        section: Section,
        name: &str,
        def: MemberDef,
        overwrite: bool,
    ) -> ClowderResult<ClassDescriptor> {
        if self.is_locked() {
            return Err(ClowderError::ClassLocked {
                class: self.name.clone(),
            });
        }

        validate_member(&self.name, &self.options, section, name, &def)?;

        let collides = [Section::Public, Section::Private, Section::Active]
            .into_iter()
            .any(|other| other != section && self.table(other).contains(name));
        if collides || (!overwrite && self.table(section).contains(name)) {
            return Err(ClowderError::DuplicateMember {
                class: self.name.clone(),
                name: name.to_string(),
            });
        }

        let mut updated = ClassDescriptor {
            name: self.name.clone(),
            public: self.public.clone(),
            private: self.private.clone(),
            active: self.active.clone(),
            parent: self.parent.clone(),
            options: self.options,
            depth: self.depth,
        };
        match section {
            Section::Public => updated.public.insert(name, def),
            Section::Private => updated.private.insert(name, def),
            Section::Active => updated.active.insert(name, def),
        };

        Ok(updated)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("public", &self.public.names().collect::<Vec<_>>())
            .field("private", &self.private.names().collect::<Vec<_>>())
            .field("active", &self.active.names().collect::<Vec<_>>())
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "<{}> inherits <{}>", self.name, parent.name),
            None => write!(f, "<{}>", self.name),
        }
    }
}

/// ==========================================================================
/// DECLARATION
/// ==========================================================================

/// Fluent declaration of a clowder.
///
/// ```ignore
/// let queue = ClassBuilder::new("Queue")
///     .private("queue", MemberDef::data(Value::List(vec![])))
///     .public("add", MemberDef::method(|frame, args| { ... }))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ClassBuilder {
    name: String,
    public: Vec<(String, MemberDef)>,
    private: Vec<(String, MemberDef)>,
    active: Vec<(String, MemberDef)>,
    parent: Option<Rc<ClassDescriptor>>,
    options: ClassOptions,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: Vec::new(),
            private: Vec::new(),
            active: Vec::new(),
            parent: None,
            options: ClassOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public(mut self, name: impl Into<String>, def: impl Into<MemberDef>) -> Self {
        self.public.push((name.into(), def.into()));
        self
    }

    pub fn private(mut self, name: impl Into<String>, def: impl Into<MemberDef>) -> Self {
        self.private.push((name.into(), def.into()));
        self
    }

    pub fn active(mut self, name: impl Into<String>, def: impl Into<MemberDef>) -> Self {
        self.active.push((name.into(), def.into()));
        self
    }

    pub fn inherit(mut self, parent: &Rc<ClassDescriptor>) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn options(mut self, options: ClassOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates every table and produces the locked-in descriptor.
    ///
    /// Fails without producing anything if a name is malformed, reserved,
    /// placed in the wrong table, or declared twice at this level.
    pub fn build(self) -> ClowderResult<Rc<ClassDescriptor>> {
        let mut seen = HashSet::new();

        let sections = [
            (Section::Public, &self.public),
            (Section::Private, &self.private),
            (Section::Active, &self.active),
        ];
        for (section, members) in sections {
            for (name, def) in members.iter() {
                validate_member(&self.name, &self.options, section, name, def)?;
                if !seen.insert(name.as_str()) {
                    return Err(ClowderError::DuplicateMember {
                        class: self.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }

        let depth = self.parent.as_ref().map(|p| p.depth + 1).unwrap_or(0);

        debug!(
            class = %self.name,
            parent = self.parent.as_ref().map(|p| p.name()).unwrap_or("-"),
            public = self.public.len(),
            private = self.private.len(),
            active = self.active.len(),
            "clowder declared"
        );

        Ok(Rc::new(ClassDescriptor {
            name: self.name,
            public: self.public.into_iter().collect(),
            private: self.private.into_iter().collect(),
            active: self.active.into_iter().collect(),
            parent: self.parent,
            options: self.options,
            depth,
        }))
    }
}

/// Declares a clowder from ready-made member tables.
pub fn declare(
    name: &str,
    public: &MemberTable,
    private: &MemberTable,
    active: &MemberTable,
    parent: Option<&Rc<ClassDescriptor>>,
) -> ClowderResult<Rc<ClassDescriptor>> {
    let mut builder = ClassBuilder::new(name);
    for (member, def) in public.iter() {
        builder = builder.public(member, def.clone());
    }
    for (member, def) in private.iter() {
        builder = builder.private(member, def.clone());
    }
    for (member, def) in active.iter() {
        builder = builder.active(member, def.clone());
    }
    if let Some(parent) = parent {
        builder = builder.inherit(parent);
    }
    builder.build()
}

fn validate_member(
    class: &str,
    options: &ClassOptions,
    section: Section,
    name: &str,
    def: &MemberDef,
) -> ClowderResult<()> {
    if !MEMBER_NAME.is_match(name) {
        return Err(ClowderError::InvalidMemberName {
            class: class.to_string(),
            name: name.to_string(),
        });
    }

    let clone_taken = options.cloneable && name == CLONE && section != Section::Private;
    if RESERVED_NAMES.contains(&name) || clone_taken {
        return Err(ClowderError::ReservedName {
            class: class.to_string(),
            name: name.to_string(),
        });
    }

    let reason = match (section, def) {
        (Section::Active, MemberDef::Active(_)) => None,
        (Section::Active, _) => Some("the active table only holds active members"),
        (_, MemberDef::Active(_)) => Some("active members belong in the active table"),
        _ => None,
    };
    match reason {
        Some(reason) => Err(ClowderError::InvalidMember {
            class: class.to_string(),
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
