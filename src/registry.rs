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

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::class::{ClassBuilder, ClassDescriptor};
use crate::config::RegistryConfig;
use crate::environment::Namespace;
use crate::error::{ClowderError, ClowderResult};
use crate::member::{MemberDef, Section};
use crate::runtime::classes::construct_instance;
use crate::runtime::instance::Object;
use crate::value::Value;

/// Named clowders plus the globals scope their methods resolve against.
pub struct Registry {
    /// Descriptors indexed by ID
    classes: Vec<Rc<ClassDescriptor>>,
    /// Clowder name to ID mapping
    name_to_id: HashMap<String, usize>,
    globals: Namespace,
    config: RegistryConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            classes: Vec::new(),
            name_to_id: HashMap::new(),
            globals: Namespace::global(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Starts a declaration carrying the registry's default options.
    pub fn builder(&self, name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name).options(self.config.default_options)
    }

    /// Builds and registers a clowder.
    ///
    /// Re-declaring a name is only allowed while the existing clowder is
    /// unlocked; the new descriptor then replaces it.
    pub fn declare(&mut self, builder: ClassBuilder) -> ClowderResult<Rc<ClassDescriptor>> {
        let existing = self.name_to_id.get(builder.name()).copied();

        if let Some(id) = existing {
            if self.classes[id].is_locked() {
                return Err(ClowderError::ClassLocked {
                    class: builder.name().to_string(),
                });
            }
        }

        let class = builder.build()?;

        match existing {
            Some(id) => {
                debug!(class = %class.name(), id, "clowder re-declared");
                self.classes[id] = class.clone();
            }
            None => {
                self.name_to_id
                    .insert(class.name().to_string(), self.classes.len());
                self.classes.push(class.clone());
            }
        }

        Ok(class)
    }

    pub fn get(&self, name: &str) -> Option<Rc<ClassDescriptor>> {
        self.name_to_id
            .get(name)
            .map(|&id| self.classes[id].clone())
    }

    pub fn require(&self, name: &str) -> ClowderResult<Rc<ClassDescriptor>> {
        self.get(name).ok_or_else(|| ClowderError::UnknownClass {
            name: name.to_string(),
        })
    }

    /// Adds or replaces one member of an unlocked clowder.
    ///
    /// The registry swaps in a new descriptor revision. Instances, and
    /// subclasses declared against the old revision, keep what they had.
    pub fn set(
        &mut self,
        class: &str,
        section: Section,
        name: &str,
        def: impl Into<MemberDef>,
        overwrite: bool,
    ) -> ClowderResult<Rc<ClassDescriptor>> {
        let id = *self
            .name_to_id
            .get(class)
            .ok_or_else(|| ClowderError::UnknownClass {
                name: class.to_string(),
            })?;

        let updated = Rc::new(self.classes[id].with_member(section, name, def.into(), overwrite)?);

        debug!(class, member = name, section = ?section, "clowder member set");

        self.classes[id] = updated.clone();
        Ok(updated)
    }

    /// Instantiates a registered clowder against the registry's globals.
    pub fn new_instance(&self, name: &str, args: Vec<Value>) -> ClowderResult<Object> {
        let class = self.require(name)?;
        construct_instance(&class, args, &self.globals)
    }

    pub fn define_global(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.globals.define_value(name, value.into());
    }

    pub fn globals(&self) -> &Namespace {
        &self.globals
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|class| class.name())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassOptions;

    fn unlocked() -> ClassOptions {
        ClassOptions {
            lock_class: false,
            ..ClassOptions::default()
        }
    }

    #[test]
    fn redeclaring_a_locked_class_fails() {
        let mut registry = Registry::new();
        registry.declare(registry.builder("Point")).unwrap();

        let err = registry.declare(registry.builder("Point")).unwrap_err();
        assert_eq!(err.code(), "E_CLASS_LOCKED");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unlocked_classes_can_be_redeclared() {
        let mut registry = Registry::new();
        registry
            .declare(registry.builder("Point").options(unlocked()))
            .unwrap();
        let second = registry
            .declare(
                registry
                    .builder("Point")
                    .public("x", MemberDef::data(0))
                    .options(unlocked()),
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(Rc::ptr_eq(&registry.get("Point").unwrap(), &second));
    }

    #[test]
    fn set_on_locked_class_fails() {
        let mut registry = Registry::new();
        registry.declare(registry.builder("Point")).unwrap();

        let err = registry
            .set("Point", Section::Public, "x", MemberDef::data(0), false)
            .unwrap_err();
        assert_eq!(err.code(), "E_CLASS_LOCKED");
    }

    #[test]
    fn set_does_not_touch_existing_instances() {
        let mut registry = Registry::new();
        registry
            .declare(
                registry
                    .builder("Point")
                    .public("x", MemberDef::data(0))
                    .options(unlocked()),
            )
            .unwrap();

        let before = registry.new_instance("Point", vec![]).unwrap();
        registry
            .set("Point", Section::Public, "y", MemberDef::data(1), false)
            .unwrap();
        let after = registry.new_instance("Point", vec![]).unwrap();

        assert!(!before.has("y"));
        assert_eq!(after.get("y").unwrap(), Value::from(1));
    }

    #[test]
    fn unknown_classes_are_reported() {
        let registry = Registry::new();
        let err = registry.new_instance("Ghost", vec![]).unwrap_err();
        assert!(matches!(err, ClowderError::UnknownClass { ref name } if name == "Ghost"));
    }

    #[test]
    fn methods_see_registry_globals() {
        let mut registry = Registry::new();
        registry.define_global("greeting", "meow");
        registry
            .declare(registry.builder("Cat").public(
                "speak",
                MemberDef::method(|frame, _| frame.get("greeting")),
            ))
            .unwrap();

        let cat = registry.new_instance("Cat", vec![]).unwrap();
        assert_eq!(cat.call("speak", vec![]).unwrap(), Value::from("meow"));
    }

    #[test]
    fn builder_uses_default_options() {
        let config = RegistryConfig {
            default_options: ClassOptions {
                cloneable: false,
                ..ClassOptions::default()
            },
        };
        let registry = Registry::with_config(config);
        let class = registry.builder("Solo").build().unwrap();
        assert!(!class.options().cloneable);
    }
}
