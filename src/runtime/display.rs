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

use serde::Serialize;

use crate::class::CLONE;
use crate::environment::{Binding, Namespace};
use crate::error::ClowderResult;
use crate::member::{describe_active, describe_data, describe_method, MemberKind, Visibility};
use crate::runtime::instance::Object;

/// One line of introspection output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub name: String,
    pub visibility: Visibility,
    pub kind: MemberKind,
    pub detail: String,
}

impl MemberSummary {
    pub fn new(
        name: impl Into<String>,
        visibility: Visibility,
        kind: MemberKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            visibility,
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for MemberSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} {}: {} ({})",
            self.visibility.to_string(),
            self.name,
            self.kind,
            self.detail
        )
    }
}

/// Lists an instance's members: public bindings, the built-in `clone`, the
/// `self`/`private` environments, then private bindings.
pub(crate) fn describe_instance(object: &Object) -> ClowderResult<Vec<MemberSummary>> {
    object.ensure_usable()?;

    let mut lines = summarize(object, object.public_ns(), Visibility::Public);

    if object.class().options().cloneable && !object.public_ns().contains(CLONE) {
        lines.push(MemberSummary::new(
            CLONE,
            Visibility::Public,
            MemberKind::Method,
            "function (built-in)",
        ));
    }

    lines.push(MemberSummary::new(
        "self",
        Visibility::Public,
        MemberKind::Environment,
        format!("{} instance", object),
    ));
    lines.push(MemberSummary::new(
        "private",
        Visibility::Private,
        MemberKind::Environment,
        format!("{} bindings", object.private_ns().len()),
    ));

    lines.extend(summarize(object, object.private_ns(), Visibility::Private));
    Ok(lines)
}

fn summarize(object: &Object, scope: &Namespace, visibility: Visibility) -> Vec<MemberSummary> {
    scope
        .entries()
        .into_iter()
        .map(|(name, binding)| {
            let (kind, detail) = match &binding {
                Binding::Data(value) => (MemberKind::Data, describe_data(value)),
                Binding::Method { method, level, .. } => (
                    MemberKind::Method,
                    format!(
                        "{} from {}",
                        describe_method(method),
                        object.chain()[*level].name()
                    ),
                ),
                Binding::Active { active, level } => (
                    MemberKind::Active,
                    format!(
                        "{} from {}",
                        describe_active(active),
                        object.chain()[*level].name()
                    ),
                ),
            };
            MemberSummary::new(name, visibility, kind, detail)
        })
        .collect()
}
