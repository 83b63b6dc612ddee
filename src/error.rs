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

use thiserror::Error;

use crate::value::Value;

/// Every failure the clowder runtime can report.
///
/// Declaration errors (`DuplicateMember`, `ReservedName`, ...) are raised before a
/// class descriptor exists, so a failed declaration never leaves a half-built
/// class behind. Access errors are raised at the call site that triggered them.
/// `Thrown` carries whatever a user method body raised, untouched.
#[derive(Debug, Clone, Error)]
pub enum ClowderError {
    #[error("duplicate member '{name}' in clowder '{class}'")]
    DuplicateMember { class: String, name: String },

    #[error("clowder '{class}' is locked")]
    ClassLocked { class: String },

    #[error("no member named '{name}' on '{class}'")]
    NoSuchMember { class: String, name: String },

    #[error("member '{name}' on '{class}' cannot be read")]
    NotReadable { class: String, name: String },

    #[error("member '{name}' on '{class}' cannot be written")]
    NotWritable { class: String, name: String },

    #[error("member '{name}' on '{class}' is not callable")]
    NotCallable { class: String, name: String },

    #[error("clowder '{class}' has no initialize method but received {count} argument(s)")]
    UnexpectedArguments { class: String, count: usize },

    #[error("instance of '{class}' has been disposed")]
    InstanceDisposed { class: String },

    #[error("'{name}' is not a valid member name in clowder '{class}'")]
    InvalidMemberName { class: String, name: String },

    #[error("'{name}' is a reserved name and cannot be declared in clowder '{class}'")]
    ReservedName { class: String, name: String },

    #[error("member '{name}' in clowder '{class}': {reason}")]
    InvalidMember {
        class: String,
        name: String,
        reason: String,
    },

    #[error("instances of '{class}' cannot be cloned")]
    NotCloneable { class: String },

    #[error("method '{name}' on '{class}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        class: String,
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("undefined clowder '{name}'")]
    UnknownClass { name: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}", .0.stringify())]
    Thrown(Value),
}

impl ClowderError {
    /// Raises a user-level error from inside a method or active member body.
    pub fn throw(value: impl Into<Value>) -> Self {
        ClowderError::Thrown(value.into())
    }

    /// Stable error code, following the PAWX `E_*` convention.
    pub fn code(&self) -> &'static str {
        match self {
            ClowderError::DuplicateMember { .. } => "E_DUPLICATE_MEMBER",
            ClowderError::ClassLocked { .. } => "E_CLASS_LOCKED",
            ClowderError::NoSuchMember { .. } => "E_NO_SUCH_MEMBER",
            ClowderError::NotReadable { .. } => "E_NOT_READABLE",
            ClowderError::NotWritable { .. } => "E_NOT_WRITABLE",
            ClowderError::NotCallable { .. } => "E_NOT_CALLABLE",
            ClowderError::UnexpectedArguments { .. } => "E_UNEXPECTED_ARGUMENTS",
            ClowderError::InstanceDisposed { .. } => "E_INSTANCE_DISPOSED",
            ClowderError::InvalidMemberName { .. } => "E_INVALID_MEMBER_NAME",
            ClowderError::ReservedName { .. } => "E_RESERVED_NAME",
            ClowderError::InvalidMember { .. } => "E_INVALID_MEMBER",
            ClowderError::NotCloneable { .. } => "E_NOT_CLONEABLE",
            ClowderError::ArityMismatch { .. } => "E_ARITY",
            ClowderError::UnknownClass { .. } => "E_UNKNOWN_CLASS",
            ClowderError::InvalidConfig(_) => "E_CONFIG",
            ClowderError::Thrown(_) => "E_THROWN",
        }
    }

    /// The payload of a user-raised error, if this is one.
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            ClowderError::Thrown(value) => Some(value),
            _ => None,
        }
    }
}

/// Result alias used across the runtime.
pub type ClowderResult<T> = Result<T, ClowderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_class_and_member() {
        let err = ClowderError::NoSuchMember {
            class: "Queue".into(),
            name: "queue".into(),
        };
        assert_eq!(err.to_string(), "no member named 'queue' on 'Queue'");
        assert_eq!(err.code(), "E_NO_SUCH_MEMBER");
    }

    #[test]
    fn thrown_errors_keep_their_payload() {
        let err = ClowderError::throw("queue is empty");
        assert_eq!(err.to_string(), "queue is empty");
        assert_eq!(err.code(), "E_THROWN");
        assert_eq!(err.thrown_value().and_then(Value::as_str), Some("queue is empty"));
    }

    #[test]
    fn arity_message_reports_counts() {
        let err = ClowderError::ArityMismatch {
            class: "Queue".into(),
            name: "add".into(),
            expected: 1,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "method 'add' on 'Queue' expects 1 argument(s), got 3"
        );
    }
}
