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

use serde::{Deserialize, Serialize};

use crate::error::{ClowderError, ClowderResult};

/// Per-clowder declaration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassOptions {
    /// Reject `Registry::set` and re-declaration once declared.
    pub lock_class: bool,

    /// Reject external writes to names the instance does not already have.
    /// When `false`, such a write adds a new public data slot.
    pub lock_objects: bool,

    /// Allow `clone_instance` (and the built-in `clone` method).
    pub cloneable: bool,

    /// Reject constructor arguments when no `initialize` method exists.
    pub strict_arguments: bool,
}

impl Default for ClassOptions {
    fn default() -> Self {
        Self {
            lock_class: true,
            lock_objects: true,
            cloneable: true,
            strict_arguments: true,
        }
    }
}

impl ClassOptions {
    /// Parses options from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> ClowderResult<Self> {
        serde_json::from_str(json).map_err(|e| ClowderError::InvalidConfig(e.to_string()))
    }
}

/// Registry-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Options handed to every builder created through `Registry::builder`.
    pub default_options: ClassOptions,
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> ClowderResult<Self> {
        serde_json::from_str(json).map_err(|e| ClowderError::InvalidConfig(e.to_string()))
    }
}
