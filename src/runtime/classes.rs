/*
 * =============================================================================
 *  PAWX - Code with Claws!
 * =============================================================================
 *
 *  File:     classes.rs
 *  Purpose:  Instance lifecycle for clowders.
 *            Builds instances from descriptors, runs `initialize`, copies
 *            instances for `clone` and tears them down on disposal.
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

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::class::{ClassDescriptor, FINALIZE, INITIALIZE};
use crate::environment::{Binding, Namespace, ScopeKind};
use crate::error::{ClowderError, ClowderResult};
use crate::member::{MemberDef, MemberTable, Method, Visibility};
use crate::runtime::calls::invoke_method;
use crate::runtime::instance::{InstanceData, LifeCycle, Object};
use crate::value::Value;

/// ==========================================================================
/// INSTANCE CONSTRUCTION
/// ==========================================================================

/// Constructs a new instance of `class` (`Class$new(...)`).
///
/// This function:
/// - Collects the ancestor chain, root first
/// - Allocates a fresh private/public namespace pair
/// - Binds every level's members in chain order, so descendants win
/// - Runs `initialize` (if any) with `args`
///
/// # Parameters
/// - `class` - Clowder to instantiate
/// - `args` - Constructor arguments, passed straight to `initialize`
/// - `globals` - Outermost scope for free-name lookups inside methods
///
/// # Returns
/// A live instance, or whatever error `initialize` raised. A failed
/// construction never hands out the half-built instance.
pub fn construct_instance(
    class: &Rc<ClassDescriptor>,
    args: Vec<Value>,
    globals: &Namespace,
) -> ClowderResult<Object> {
    let chain: Rc<[Rc<ClassDescriptor>]> = class.chain().into();

    let private = Namespace::new(ScopeKind::Private, Some(globals.clone()));
    let public = Namespace::new(ScopeKind::Public, Some(private.clone()));

    for (level, ancestor) in chain.iter().enumerate() {
        bind_table(&private, ancestor.private(), level, Visibility::Private);
        bind_table(&public, ancestor.public(), level, Visibility::Public);
        bind_table(&public, ancestor.active(), level, Visibility::Public);
    }

    let object = Object::from_parts(
        class.clone(),
        chain,
        public,
        private,
        LifeCycle::Constructing,
    );

    if let Err(err) = run_initialize(&object, args) {
        discard(&object);
        return Err(err);
    }

    object.0.state.set(LifeCycle::Live);

    debug!(
        class = %class.name(),
        depth = class.depth(),
        public = object.public_ns().len(),
        private = object.private_ns().len(),
        "instance constructed"
    );

    Ok(object)
}

fn bind_table(target: &Namespace, table: &MemberTable, level: usize, visibility: Visibility) {
    for (name, def) in table.iter() {
        let binding = match def {
            MemberDef::Data(value) => Binding::Data(value.clone()),
            MemberDef::Method(method) => Binding::Method {
                method: method.clone(),
                level,
                visibility,
            },
            MemberDef::Active(active) => Binding::Active {
                active: active.clone(),
                level,
            },
        };
        target.define(name, binding);
    }
}

fn run_initialize(object: &Object, args: Vec<Value>) -> ClowderResult<()> {
    match find_hook(object, INITIALIZE) {
        Some((method, level, visibility)) => {
            invoke_method(object, INITIALIZE, &method, level, visibility, args)?;
            Ok(())
        }
        None if !args.is_empty() && object.class().options().strict_arguments => {
            Err(ClowderError::UnexpectedArguments {
                class: object.class_name().to_string(),
                count: args.len(),
            })
        }
        None => Ok(()),
    }
}

/// Public binding first, then private.
fn find_hook(object: &Object, name: &str) -> Option<(Method, usize, Visibility)> {
    let binding = object
        .public_ns()
        .lookup(name)
        .or_else(|| object.private_ns().lookup(name));

    match binding {
        Some(Binding::Method {
            method,
            level,
            visibility,
        }) => Some((method, level, visibility)),
        _ => None,
    }
}

fn discard(object: &Object) {
    object.0.state.set(LifeCycle::Disposed);
    object.public_ns().clear();
    object.private_ns().clear();
}

/// ==========================================================================
/// CLONING
/// ==========================================================================

/// Copies `object` into a new live instance of the same clowder.
///
/// Methods and active members are rebound to the copy: frames are built at
/// call time from whichever instance is called, so copying the bindings is
/// enough. `initialize` does not run again.
///
/// A deep copy visits each reachable instance once. Instances that refer to
/// each other are copied into a graph with the same shape.
pub(crate) fn clone_instance(object: &Object, deep: bool) -> ClowderResult<Object> {
    let mut copies = HashMap::new();

    match copy_instance(object, deep, &mut copies) {
        Ok(copy) => {
            debug!(
                class = %object.class_name(),
                deep,
                instances = copies.len(),
                "instance cloned"
            );
            Ok(copy)
        }
        Err(err) => {
            for partial in copies.values() {
                discard(partial);
            }
            Err(err)
        }
    }
}

/// Already-made copies, keyed by the address of the original instance.
type CopyMap = HashMap<*const InstanceData, Object>;

fn copy_instance(object: &Object, deep: bool, copies: &mut CopyMap) -> ClowderResult<Object> {
    object.ensure_usable()?;

    if !object.class().options().cloneable {
        return Err(ClowderError::NotCloneable {
            class: object.class_name().to_string(),
        });
    }

    let globals = object.private_ns().parent().unwrap_or_else(Namespace::global);
    let private = Namespace::new(ScopeKind::Private, Some(globals));
    let public = Namespace::new(ScopeKind::Public, Some(private.clone()));

    let copy = Object::from_parts(
        object.class().clone(),
        object.0.chain.clone(),
        public,
        private,
        LifeCycle::Constructing,
    );
    copies.insert(Rc::as_ptr(&object.0), copy.clone());

    copy_bindings(object.private_ns(), copy.private_ns(), deep, copies)?;
    copy_bindings(object.public_ns(), copy.public_ns(), deep, copies)?;

    copy.0.state.set(LifeCycle::Live);
    Ok(copy)
}

fn copy_bindings(
    from: &Namespace,
    to: &Namespace,
    deep: bool,
    copies: &mut CopyMap,
) -> ClowderResult<()> {
    for (name, binding) in from.entries() {
        let binding = match binding {
            Binding::Data(Value::Object(inner)) if deep => {
                let copied = match copies.get(&Rc::as_ptr(&inner.0)) {
                    Some(existing) => existing.clone(),
                    None => copy_instance(&inner, true, copies)?,
                };
                Binding::Data(Value::Object(copied))
            }
            other => other,
        };
        to.define(name, binding);
    }
    Ok(())
}

/// ==========================================================================
/// DISPOSAL
/// ==========================================================================

/// Runs `finalize` once, then releases every slot.
///
/// The instance is disposed even when `finalize` fails; the failure is
/// still returned to the caller.
pub(crate) fn dispose_instance(object: &Object) -> ClowderResult<()> {
    if object.is_disposed() {
        return Ok(());
    }

    let outcome = match find_hook(object, FINALIZE) {
        Some((method, level, visibility)) => {
            invoke_method(object, FINALIZE, &method, level, visibility, Vec::new()).map(|_| ())
        }
        None => Ok(()),
    };

    discard(object);

    debug!(class = %object.class_name(), "instance disposed");

    outcome
}
