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

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::error::ClowderResult;
use crate::runtime::calls::Frame;
use crate::table::OrderedTable;
use crate::value::Value;

pub type MethodFn = dyn Fn(&Frame, Vec<Value>) -> ClowderResult<Value>;

/// `None` means "read", `Some(value)` means "write this value".
pub type ActiveFn = dyn Fn(&Frame, Option<Value>) -> ClowderResult<Value>;

/// Which namespace a member is bound into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,  // pride
    Private, // den
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// The three member tables of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Public,
    Private,
    Active,
}

impl Section {
    pub fn visibility(self) -> Visibility {
        match self {
            Section::Private => Visibility::Private,
            Section::Public | Section::Active => Visibility::Public,
        }
    }
}

/// Kind reported by introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Data,
    Method,
    Active,
    Environment,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberKind::Data => "data",
            MemberKind::Method => "method",
            MemberKind::Active => "active",
            MemberKind::Environment => "environment",
        };
        f.write_str(label)
    }
}

/// Method body plus an optional declared argument count.
#[derive(Clone)]
pub struct Method {
    body: Rc<MethodFn>,
    arity: Option<usize>,
}

impl Method {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Frame, Vec<Value>) -> ClowderResult<Value> + 'static,
    {
        Self {
            body: Rc::new(body),
            arity: None,
        }
    }

    /// A method that rejects calls with any other number of arguments.
    pub fn with_arity<F>(arity: usize, body: F) -> Self
    where
        F: Fn(&Frame, Vec<Value>) -> ClowderResult<Value> + 'static,
    {
        Self {
            body: Rc::new(body),
            arity: Some(arity),
        }
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub(crate) fn invoke(&self, frame: &Frame, args: Vec<Value>) -> ClowderResult<Value> {
        (self.body)(frame, args)
    }

    pub fn ptr_eq(&self, other: &Method) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

/// Which call forms an active member accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// A computed property: looks like a field, runs code on every read/write.
#[derive(Clone)]
pub struct Active {
    body: Rc<ActiveFn>,
    access: Access,
}

impl Active {
    /// Read/write active member. The body sees `None` for reads.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Frame, Option<Value>) -> ClowderResult<Value> + 'static,
    {
        Self {
            body: Rc::new(body),
            access: Access::ReadWrite,
        }
    }

    /// Zero-argument form only; writes fail with `NotWritable`.
    pub fn getter<F>(body: F) -> Self
    where
        F: Fn(&Frame) -> ClowderResult<Value> + 'static,
    {
        Self {
            body: Rc::new(move |frame, _| body(frame)),
            access: Access::ReadOnly,
        }
    }

    /// One-argument form only; reads fail with `NotReadable`.
    pub fn setter<F>(body: F) -> Self
    where
        F: Fn(&Frame, Value) -> ClowderResult<()> + 'static,
    {
        Self {
            body: Rc::new(move |frame, value| {
                if let Some(value) = value {
                    body(frame, value)?;
                }
                Ok(Value::Null)
            }),
            access: Access::WriteOnly,
        }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub(crate) fn invoke(&self, frame: &Frame, value: Option<Value>) -> ClowderResult<Value> {
        (self.body)(frame, value)
    }
}

/// One entry of a member table.
#[derive(Clone)]
pub enum MemberDef {
    Data(Value),
    Method(Method),
    Active(Active),
}

impl MemberDef {
    pub fn data(value: impl Into<Value>) -> Self {
        MemberDef::Data(value.into())
    }

    pub fn method<F>(body: F) -> Self
    where
        F: Fn(&Frame, Vec<Value>) -> ClowderResult<Value> + 'static,
    {
        MemberDef::Method(Method::new(body))
    }

    pub fn active<F>(body: F) -> Self
    where
        F: Fn(&Frame, Option<Value>) -> ClowderResult<Value> + 'static,
    {
        MemberDef::Active(Active::new(body))
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            MemberDef::Data(_) => MemberKind::Data,
            MemberDef::Method(_) => MemberKind::Method,
            MemberDef::Active(_) => MemberKind::Active,
        }
    }

    /// One-line description used by introspection.
    pub fn describe(&self) -> String {
        match self {
            MemberDef::Data(value) => describe_data(value),
            MemberDef::Method(method) => describe_method(method),
            MemberDef::Active(active) => describe_active(active),
        }
    }
}

impl fmt::Debug for MemberDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.describe())
    }
}

impl From<Method> for MemberDef {
    fn from(method: Method) -> Self {
        MemberDef::Method(method)
    }
}

impl From<Active> for MemberDef {
    fn from(active: Active) -> Self {
        MemberDef::Active(active)
    }
}

impl From<Value> for MemberDef {
    fn from(value: Value) -> Self {
        MemberDef::Data(value)
    }
}

/// Ordered member table: one per section of a declaration.
pub type MemberTable = OrderedTable<MemberDef>;

const PREVIEW_LIMIT: usize = 40;

pub(crate) fn describe_data(value: &Value) -> String {
    let mut preview = value.stringify();
    if preview.chars().count() > PREVIEW_LIMIT {
        preview = preview.chars().take(PREVIEW_LIMIT).collect::<String>() + "...";
    }
    format!("{} {}", value.type_name(), preview)
}

pub(crate) fn describe_method(method: &Method) -> String {
    match method.arity() {
        Some(n) => format!("function/{}", n),
        None => "function".to_string(),
    }
}

pub(crate) fn describe_active(active: &Active) -> String {
    match active.access() {
        Access::ReadOnly => "active binding (read-only)".to_string(),
        Access::WriteOnly => "active binding (write-only)".to_string(),
        Access::ReadWrite => "active binding".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_is_read_only() {
        let active = Active::getter(|_| Ok(Value::from(1)));
        assert!(active.access().readable());
        assert!(!active.access().writable());
    }

    #[test]
    fn setter_is_write_only() {
        let active = Active::setter(|_, _| Ok(()));
        assert!(!active.access().readable());
        assert!(active.access().writable());
    }

    #[test]
    fn data_preview_is_truncated() {
        let def = MemberDef::data("x".repeat(100));
        let text = def.describe();
        assert!(text.starts_with("String "));
        assert!(text.ends_with("..."));
    }

    #[test]
    fn method_description_reports_arity() {
        let def: MemberDef = Method::with_arity(2, |_, _| Ok(Value::Null)).into();
        assert_eq!(def.kind(), MemberKind::Method);
        assert_eq!(def.describe(), "function/2");
    }
}
