// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Best-effort extraction of a human-readable name from a callable.
//!
//! [`function_name`] works on values: it reads the compiler-provided type name
//! of the callable and returns its last path segment. Closures and function
//! pointers have no declared name and resolve to [`ANONYMOUS`].
//!
//! [`function_name_from_source`] works on text (a declaration such as
//! `pub fn parse(input: &str)`, a closure, or a type name) and is the only
//! place where a non-callable input is detected at runtime.
//!
//! ```
//! use flowmap_core::function_name::{function_name, function_name_from_source};
//!
//! fn named_fn() {}
//!
//! assert_eq!(function_name(&named_fn), "named_fn");
//! assert_eq!(function_name(&|| ()), "anonymous");
//! assert_eq!(function_name_from_source("fn parse(s: &str)").unwrap(), "parse");
//! assert!(function_name_from_source("42").is_err());
//! ```

use crate::Callable;
use flowmap_error::{FlowMapError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Name returned for callables without a declared name.
pub const ANONYMOUS: &str = "anonymous";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

// `fn <name>` with any leading qualifiers; the name is absent for fn pointers.
static FN_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:pub(?:\([^)]*\))?\s+)?(?:for<[^>]*>\s*)?(?:(?:const|async|unsafe)\s+)*(?:extern\s+(?:"[^"]*"\s+)?)?fn\b\s*([A-Za-z_][A-Za-z0-9_]*)?"#,
    )
    .expect("valid fn declaration pattern")
});

static CLOSURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^(?:async\s+)?(?:move\s+)?\|)|(?:\{\{closure\}\}$)")
        .expect("valid closure pattern")
});

/// Returns the declared name of `f`, or `"anonymous"`.
///
/// The native name is the last segment of [`std::any::type_name`] with generic
/// arguments removed. References and boxes are looked through, and trait
/// objects (`Box<dyn Fn()>`) have no name. When the segment is not a plain
/// identifier (closures, function pointers) the type name is handed to
/// [`function_name_from_source`]; a type name it cannot interpret also yields
/// `"anonymous"`.
///
/// `f` may take up to twelve arguments.
pub fn function_name<F, Args>(_f: &F) -> String
where
    F: Callable<Args>,
{
    let type_name = unwrap_callable_wrappers(std::any::type_name::<F>());
    if type_name.starts_with("dyn ") {
        return ANONYMOUS.to_string();
    }
    match native_name(type_name) {
        Some(name) => resolve(name),
        None => function_name_from_source(type_name).unwrap_or_else(|_| ANONYMOUS.to_string()),
    }
}

/// Extracts a function name from its textual representation.
///
/// Accepts `fn` declarations (with visibility, `const`, `async`, `unsafe` or
/// `extern` qualifiers), function pointer types and closures.
///
/// # Errors
///
/// Returns [`FlowMapError::InvalidArgument`] if `source` does not describe a
/// callable.
pub fn function_name_from_source(source: &str) -> Result<String> {
    let source = source.trim();
    if let Some(captures) = FN_DECLARATION.captures(source) {
        let name = captures.get(1).map_or("", |m| m.as_str());
        return Ok(resolve(name));
    }
    if CLOSURE.is_match(source) {
        return Ok(ANONYMOUS.to_string());
    }
    Err(FlowMapError::invalid_argument(format!(
        "must provide a function. Value: `{source}`"
    )))
}

fn resolve(name: &str) -> String {
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name.to_string()
    }
}

fn native_name(type_name: &str) -> Option<&str> {
    let path = strip_generic_args(type_name);
    let segment = path.rsplit_once("::").map_or(path, |(_, last)| last);
    IDENTIFIER.is_match(segment).then_some(segment)
}

// `&alloc::boxed::Box<a::f>` -> `a::f`
fn unwrap_callable_wrappers(mut type_name: &str) -> &str {
    loop {
        if let Some(rest) = type_name
            .strip_prefix("&mut ")
            .or_else(|| type_name.strip_prefix('&'))
        {
            type_name = rest;
        } else if let Some(inner) = type_name
            .strip_prefix("alloc::boxed::Box<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            type_name = inner;
        } else {
            return type_name;
        }
    }
}

// `a::b<c::D<E>>` -> `a::b`
fn strip_generic_args(type_name: &str) -> &str {
    if !type_name.ends_with('>') {
        return type_name;
    }
    let mut depth = 0usize;
    for (pos, ch) in type_name.char_indices().rev() {
        match ch {
            // `->` of a fn pointer type
            '>' if type_name[..pos].ends_with('-') => {}
            '>' => depth += 1,
            '<' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &type_name[..pos];
                }
            }
            _ => {}
        }
    }
    type_name
}
