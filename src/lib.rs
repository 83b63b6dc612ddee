/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Clowder Runtime
 * ---------------
 * Reference classes for PAWX hosts: instances with a private namespace,
 * a public namespace, active (computed) members, single inheritance and
 * explicit `super` calls that resolve against the declaring clowder.
 *
 *  - class.rs       → Declarations and immutable class descriptors
 *  - member.rs      → Member definitions (data, method, active)
 *  - environment.rs → Namespaces with enclosing-scope lookup
 *  - registry.rs    → Named clowders and process-level globals
 *  - runtime/       → Construction, dispatch, call frames, introspection
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * Github:   https://github.com/samwilcox/pawx
 *
 * License:
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT License
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

//! Clowder: reference classes with private state, active members and
//! declaration-site `super` dispatch.
//!
//! Instances are single-threaded handles (`Rc`-based). Share them across
//! threads only behind your own synchronization, one owner at a time.

pub mod class;
pub mod config;
pub mod environment;
pub mod error;
pub mod member;
pub mod registry;
pub mod runtime;
pub mod table;
pub mod value;

pub use class::{declare, ClassBuilder, ClassDescriptor};
pub use config::{ClassOptions, RegistryConfig};
pub use environment::{Binding, Namespace, ScopeKind};
pub use error::{ClowderError, ClowderResult};
pub use member::{Access, Active, MemberDef, MemberKind, MemberTable, Method, Section, Visibility};
pub use registry::Registry;
pub use runtime::calls::{Frame, PrivateScope};
pub use runtime::classes::construct_instance;
pub use runtime::display::MemberSummary;
pub use runtime::instance::{LifeCycle, Object};
pub use value::{NativeFunction, Value};
