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

use tracing::trace;

use crate::class::RESERVED_NAMES;
use crate::environment::Namespace;
use crate::error::{ClowderError, ClowderResult};
use crate::member::{Active, Method, MemberDef, Visibility};
use crate::runtime::dispatch::{bound_function, call_binding, read_binding, write_binding};
use crate::runtime::instance::Object;
use crate::value::Value;

/// Executes a method body for `object` as part of chain level `level`.
///
/// This function:
/// 1. Refuses disposed instances
/// 2. Checks the declared arity, if any
/// 3. Builds the call frame that carries `self`, `private` and `super`
/// 4. Runs the body; errors come back exactly as the body produced them
pub(crate) fn invoke_method(
    object: &Object,
    name: &str,
    method: &Method,
    level: usize,
    visibility: Visibility,
    args: Vec<Value>,
) -> ClowderResult<Value> {
    object.ensure_usable()?;

    if let Some(expected) = method.arity() {
        if expected != args.len() {
            return Err(ClowderError::ArityMismatch {
                class: object.chain()[level].name().to_string(),
                name: name.to_string(),
                expected,
                got: args.len(),
            });
        }
    }

    trace!(class = %object.class_name(), member = name, level, "method call");

    let frame = Frame::new(object.clone(), level, visibility, name);
    method.invoke(&frame, args)
}

/// Runs an active member's body: `None` reads, `Some(value)` writes.
pub(crate) fn invoke_active(
    object: &Object,
    name: &str,
    active: &Active,
    level: usize,
    value: Option<Value>,
) -> ClowderResult<Value> {
    object.ensure_usable()?;

    trace!(
        class = %object.class_name(),
        member = name,
        level,
        write = value.is_some(),
        "active member"
    );

    let frame = Frame::new(object.clone(), level, Visibility::Public, name);
    active.invoke(&frame, value)
}

/// Call-stack context handed to every method and active member body.
///
/// The frame knows which chain level the running body was declared at, so
/// `super_*` lookups start above that level no matter how far down the
/// instance's own clowder sits.
pub struct Frame {
    object: Object,
    level: usize,
    visibility: Visibility,
    member: String,
}

impl Frame {
    pub(crate) fn new(object: Object, level: usize, visibility: Visibility, member: &str) -> Self {
        Self {
            object,
            level,
            visibility,
            member: member.to_string(),
        }
    }

    /// The `self` handle.
    pub fn this(&self) -> Object {
        self.object.clone()
    }

    /// Explicit access to the private namespace (`private$name`).
    pub fn private(&self) -> PrivateScope<'_> {
        PrivateScope { frame: self }
    }

    /// Name of the clowder whose declaration this body belongs to.
    pub fn class_name(&self) -> &str {
        self.object.chain()[self.level].name()
    }

    pub fn member_name(&self) -> &str {
        &self.member
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Unqualified read of a free name.
    ///
    /// Public bodies search public, then private, then globals. Private bodies
    /// start in private and fall back to the public chain.
    pub fn get(&self, name: &str) -> ClowderResult<Value> {
        self.object.ensure_usable()?;

        if name == "self" {
            return Ok(Value::Object(self.this()));
        }

        for scope in self.scopes() {
            if let Some(binding) = scope.lookup(name) {
                return read_binding(&self.object, name, binding);
            }
        }

        Err(self.no_such_member(name))
    }

    /// Mutates the nearest existing binding of `name` (the `<<-` form).
    ///
    /// Never creates a binding: a name unbound in every enclosing scope is
    /// `NoSuchMember`.
    pub fn assign(&self, name: &str, value: impl Into<Value>) -> ClowderResult<()> {
        self.object.ensure_usable()?;

        if RESERVED_NAMES.contains(&name) {
            return Err(ClowderError::NotWritable {
                class: self.object.class_name().to_string(),
                name: name.to_string(),
            });
        }

        let value = value.into();
        for scope in self.scopes() {
            if let Some(binding) = scope.lookup(name) {
                return write_binding(&self.object, &scope, name, binding, value);
            }
        }

        Err(self.no_such_member(name))
    }

    /// Unqualified call of a free name.
    pub fn call(&self, name: &str, args: Vec<Value>) -> ClowderResult<Value> {
        self.object.ensure_usable()?;

        for scope in self.scopes() {
            if let Some(binding) = scope.lookup(name) {
                return call_binding(&self.object, name, binding, args);
            }
        }

        Err(self.no_such_member(name))
    }

    /// Calls the nearest definition of `name` above this body's level.
    pub fn super_call(&self, name: &str, args: Vec<Value>) -> ClowderResult<Value> {
        match self.super_lookup(name)? {
            (MemberDef::Method(method), level, visibility) => {
                invoke_method(&self.object, name, &method, level, visibility, args)
            }
            (_, level, _) => Err(ClowderError::NotCallable {
                class: self.object.chain()[level].name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Reads an ancestor's active member, or an ancestor's method as a function.
    pub fn super_get(&self, name: &str) -> ClowderResult<Value> {
        match self.super_lookup(name)? {
            (MemberDef::Method(method), level, visibility) => Ok(bound_function(
                &self.object,
                name,
                method,
                level,
                visibility,
            )),
            (MemberDef::Active(active), level, _) if active.access().readable() => {
                invoke_active(&self.object, name, &active, level, None)
            }
            (_, level, _) => Err(ClowderError::NotReadable {
                class: self.object.chain()[level].name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Writes through an ancestor's active member.
    pub fn super_set(&self, name: &str, value: impl Into<Value>) -> ClowderResult<()> {
        match self.super_lookup(name)? {
            (MemberDef::Active(active), level, _) if active.access().writable() => {
                invoke_active(&self.object, name, &active, level, Some(value.into()))?;
                Ok(())
            }
            (_, level, _) => Err(ClowderError::NotWritable {
                class: self.object.chain()[level].name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Walks the chain upward from the level above this body's declaring
    /// clowder. Only methods and active members are visible through `super`.
    fn super_lookup(&self, name: &str) -> ClowderResult<(MemberDef, usize, Visibility)> {
        self.object.ensure_usable()?;

        let chain = self.object.chain();

        for level in (0..self.level).rev() {
            if let Some((section, def)) = chain[level].own_member(name) {
                if matches!(def, MemberDef::Data(_)) {
                    continue;
                }
                trace!(
                    class = %self.object.class_name(),
                    member = name,
                    from = self.level,
                    to = level,
                    "super resolved"
                );
                return Ok((def.clone(), level, section.visibility()));
            }
        }

        Err(ClowderError::NoSuchMember {
            class: match self.level {
                0 => self.class_name().to_string(),
                level => chain[level - 1].name().to_string(),
            },
            name: name.to_string(),
        })
    }

    fn scopes(&self) -> Vec<Namespace> {
        let public = self.object.public_ns();
        let private = self.object.private_ns();

        match self.visibility {
            Visibility::Public => public.chain(),
            Visibility::Private => {
                let mut scopes = vec![private.clone()];
                scopes.extend(public.chain().into_iter().filter(|ns| !ns.ptr_eq(private)));
                scopes
            }
        }
    }

    fn no_such_member(&self, name: &str) -> ClowderError {
        ClowderError::NoSuchMember {
            class: self.object.class_name().to_string(),
            name: name.to_string(),
        }
    }
}

/// `private$...` view of the running instance. Only reachable from a frame.
pub struct PrivateScope<'a> {
    frame: &'a Frame,
}

impl PrivateScope<'_> {
    pub fn get(&self, name: &str) -> ClowderResult<Value> {
        self.frame.object.ensure_usable()?;

        match self.frame.object.private_ns().lookup(name) {
            Some(binding) => read_binding(&self.frame.object, name, binding),
            None => Err(self.frame.no_such_member(name)),
        }
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> ClowderResult<()> {
        self.frame.object.ensure_usable()?;

        let private = self.frame.object.private_ns();
        match private.lookup(name) {
            Some(binding) => write_binding(&self.frame.object, private, name, binding, value.into()),
            None => Err(self.frame.no_such_member(name)),
        }
    }

    pub fn call(&self, name: &str, args: Vec<Value>) -> ClowderResult<Value> {
        self.frame.object.ensure_usable()?;

        match self.frame.object.private_ns().lookup(name) {
            Some(binding) => call_binding(&self.frame.object, name, binding, args),
            None => Err(self.frame.no_such_member(name)),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        !self.frame.object.is_disposed() && self.frame.object.private_ns().contains(name)
    }
}
