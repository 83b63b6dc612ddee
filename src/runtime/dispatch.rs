/*
 * =============================================================================
 *  PAWX - Code with Claws!
 * =============================================================================
 *
 *  File:     dispatch.rs
 *  Purpose:  Member resolution for clowder instances.
 *            Every external get/set/call and every in-frame access ends up
 *            here, so data slots, methods and active members are routed
 *            through one place.
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

use tracing::trace;

use crate::class::{CLONE, RESERVED_NAMES};
use crate::environment::{Binding, Namespace};
use crate::error::{ClowderError, ClowderResult};
use crate::member::{Method, Visibility};
use crate::runtime::calls::{invoke_active, invoke_method};
use crate::runtime::classes::clone_instance;
use crate::runtime::instance::Object;
use crate::value::{NativeFunction, Value};

/// ==========================================================================
/// INSTANCE PROPERTY ACCESS
/// ==========================================================================

/// Resolves property access on an instance (`obj$name`).
///
/// Only the public namespace is searched; private members are unreachable
/// from here.
///
/// Supports:
/// - Active members (read form)
/// - Direct data slots
/// - Methods (returned as bound functions)
/// - The built-in `clone`, when the clowder is cloneable
pub(crate) fn get_member(object: &Object, name: &str) -> ClowderResult<Value> {
    object.ensure_usable()?;

    if name == "self" {
        return Ok(Value::Object(object.clone()));
    }

    trace!(class = %object.class_name(), member = name, "get");

    match object.public_ns().lookup(name) {
        Some(binding) => read_binding(object, name, binding),
        None if name == CLONE && object.class().options().cloneable => Ok(builtin_clone(object)),
        None => Err(ClowderError::NoSuchMember {
            class: object.class_name().to_string(),
            name: name.to_string(),
        }),
    }
}

/// ==========================================================================
/// INSTANCE PROPERTY ASSIGNMENT
/// ==========================================================================

/// Assigns a public member (`obj$name <- value`).
///
/// Active members run their write form; data slots are replaced in place.
/// Unknown names fail unless the clowder was declared with
/// `lock_objects = false`, in which case a new public data slot is added.
pub(crate) fn set_member(object: &Object, name: &str, value: Value) -> ClowderResult<()> {
    object.ensure_usable()?;

    trace!(class = %object.class_name(), member = name, "set");

    let public = object.public_ns();
    match public.lookup(name) {
        Some(binding) => write_binding(object, public, name, binding, value),
        None if RESERVED_NAMES.contains(&name) => Err(ClowderError::NotWritable {
            class: object.class_name().to_string(),
            name: name.to_string(),
        }),
        None if !object.class().options().lock_objects => {
            public.define_value(name, value);
            Ok(())
        }
        None => Err(ClowderError::NoSuchMember {
            class: object.class_name().to_string(),
            name: name.to_string(),
        }),
    }
}

/// ==========================================================================
/// METHOD INVOCATION
/// ==========================================================================

/// Invokes a public member (`obj$name(args...)`).
///
/// Falls back to the built-in `clone(deep)` when the clowder is cloneable and
/// declares nothing under that name.
pub(crate) fn call_member(object: &Object, name: &str, args: Vec<Value>) -> ClowderResult<Value> {
    object.ensure_usable()?;

    match object.public_ns().lookup(name) {
        Some(binding) => call_binding(object, name, binding, args),
        None if name == CLONE && object.class().options().cloneable => {
            clone_instance(object, deep_flag(&args)).map(Value::Object)
        }
        None => Err(ClowderError::NoSuchMember {
            class: object.class_name().to_string(),
            name: name.to_string(),
        }),
    }
}

/// ==========================================================================
/// BINDING RESOLUTION
/// ==========================================================================

pub(crate) fn read_binding(object: &Object, name: &str, binding: Binding) -> ClowderResult<Value> {
    match binding {
        Binding::Data(value) => Ok(value),

        Binding::Active { active, level } => {
            if !active.access().readable() {
                return Err(ClowderError::NotReadable {
                    class: object.class_name().to_string(),
                    name: name.to_string(),
                });
            }
            invoke_active(object, name, &active, level, None)
        }

        Binding::Method {
            method,
            level,
            visibility,
        } => Ok(bound_function(object, name, method, level, visibility)),
    }
}

/// Writes `value` through `binding`, which was found in `scope`.
pub(crate) fn write_binding(
    object: &Object,
    scope: &Namespace,
    name: &str,
    binding: Binding,
    value: Value,
) -> ClowderResult<()> {
    match binding {
        Binding::Data(_) => {
            scope.write(name, value);
            Ok(())
        }

        Binding::Active { active, level } if active.access().writable() => {
            invoke_active(object, name, &active, level, Some(value))?;
            Ok(())
        }

        Binding::Active { .. } | Binding::Method { .. } => Err(ClowderError::NotWritable {
            class: object.class_name().to_string(),
            name: name.to_string(),
        }),
    }
}

pub(crate) fn call_binding(
    object: &Object,
    name: &str,
    binding: Binding,
    args: Vec<Value>,
) -> ClowderResult<Value> {
    match binding {
        Binding::Method {
            method,
            level,
            visibility,
        } => invoke_method(object, name, &method, level, visibility, args),

        Binding::Data(Value::Function(func)) => func.call(args),

        _ => Err(ClowderError::NotCallable {
            class: object.class_name().to_string(),
            name: name.to_string(),
        }),
    }
}

/// Packages a method as a plain function value that keeps its instance and
/// chain level.
pub(crate) fn bound_function(
    object: &Object,
    name: &str,
    method: Method,
    level: usize,
    visibility: Visibility,
) -> Value {
    let target = object.clone();
    let member = name.to_string();
    let label = format!("{}${}", object.chain()[level].name(), name);

    Value::Function(NativeFunction::new(label, move |args| {
        invoke_method(&target, &member, &method, level, visibility, args)
    }))
}

/// The built-in `clone(deep)` as a function value bound to `object`.
fn builtin_clone(object: &Object) -> Value {
    let target = object.clone();
    let label = format!("{}${}", object.class_name(), CLONE);

    Value::Function(NativeFunction::new(label, move |args| {
        clone_instance(&target, deep_flag(&args)).map(Value::Object)
    }))
}

fn deep_flag(args: &[Value]) -> bool {
    args.first().map(Value::is_truthy).unwrap_or(false)
}
