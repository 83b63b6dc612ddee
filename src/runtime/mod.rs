/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Clowder Runtime
 * ---------------
 * Everything that happens to a clowder after it has been declared:
 *
 *  - classes.rs  → Instance construction, cloning and disposal
 *  - calls.rs    → Method/active invocation and the call frame
 *  - dispatch.rs → Member resolution for get / set / call
 *  - display.rs  → Introspection summaries
 *  - instance.rs → The instance handle itself
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

pub mod calls;
pub mod classes;
pub mod dispatch;
pub mod display;
pub mod instance;
