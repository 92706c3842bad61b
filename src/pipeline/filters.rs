use std::fmt::Debug;

use crate::types::{FunctionInfo, ParseResult};

/// Predicate over whole-file units.
pub trait FileFilter {
    fn validate(&self, unit: &ParseResult<'_>) -> bool;
}

/// Predicate over single functions.
pub trait FunctionFilter {
    fn validate(&self, function: &FunctionInfo<'_>) -> bool;
}

/// A configured filter, convertible into the unit-specific predicate it supports.
///
/// Conversion happens once, when the pipeline branch is built; a filter that
/// does not support the branch's granularity returns `None`.
pub trait Filter: Debug {
    fn name(&self) -> &str;

    fn into_file_filter(self: Box<Self>) -> Option<Box<dyn FileFilter>> {
        None
    }

    fn into_function_filter(self: Box<Self>) -> Option<Box<dyn FunctionFilter>> {
        None
    }
}

/// Keeps units whose tree has between `min_size` and `max_size` nodes (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSizeFilter {
    pub min_size: usize,
    pub max_size: Option<usize>,
}

impl TreeSizeFilter {
    fn accepts(&self, size: usize) -> bool {
        size >= self.min_size && self.max_size.is_none_or(|max| size <= max)
    }
}

impl FileFilter for TreeSizeFilter {
    fn validate(&self, unit: &ParseResult<'_>) -> bool {
        self.accepts(unit.root.size())
    }
}

impl FunctionFilter for TreeSizeFilter {
    fn validate(&self, function: &FunctionInfo<'_>) -> bool {
        self.accepts(function.root.size())
    }
}

impl Filter for TreeSizeFilter {
    fn name(&self) -> &str {
        "by tree size"
    }

    fn into_file_filter(self: Box<Self>) -> Option<Box<dyn FileFilter>> {
        Some(self)
    }

    fn into_function_filter(self: Box<Self>) -> Option<Box<dyn FunctionFilter>> {
        Some(self)
    }
}

/// Drops functions carrying any of the excluded modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierFilter {
    pub excluded: Vec<String>,
}

impl FunctionFilter for ModifierFilter {
    fn validate(&self, function: &FunctionInfo<'_>) -> bool {
        function
            .modifiers
            .as_ref()
            .is_none_or(|mods| !mods.iter().any(|m| self.excluded.contains(m)))
    }
}

impl Filter for ModifierFilter {
    fn name(&self) -> &str {
        "by modifiers"
    }

    fn into_function_filter(self: Box<Self>) -> Option<Box<dyn FunctionFilter>> {
        Some(self)
    }
}

/// Drops functions carrying any of the excluded annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFilter {
    pub excluded: Vec<String>,
}

impl FunctionFilter for AnnotationFilter {
    fn validate(&self, function: &FunctionInfo<'_>) -> bool {
        function
            .annotations
            .as_ref()
            .is_none_or(|anns| !anns.iter().any(|a| self.excluded.contains(a)))
    }
}

impl Filter for AnnotationFilter {
    fn name(&self) -> &str {
        "by annotations"
    }

    fn into_function_filter(self: Box<Self>) -> Option<Box<dyn FunctionFilter>> {
        Some(self)
    }
}

/// Drops constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstructorFilter;

impl FunctionFilter for ConstructorFilter {
    fn validate(&self, function: &FunctionInfo<'_>) -> bool {
        !function.is_constructor
    }
}

impl Filter for ConstructorFilter {
    fn name(&self) -> &str {
        "no constructors"
    }

    fn into_function_filter(self: Box<Self>) -> Option<Box<dyn FunctionFilter>> {
        Some(self)
    }
}

/// Keeps named functions whose name splits into at most `max_words` words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionNameWordsFilter {
    pub max_words: usize,
}

impl FunctionFilter for FunctionNameWordsFilter {
    fn validate(&self, function: &FunctionInfo<'_>) -> bool {
        function
            .name()
            .is_some_and(|name| split_name_words(name).len() <= self.max_words)
    }
}

impl Filter for FunctionNameWordsFilter {
    fn name(&self) -> &str {
        "by function name length"
    }

    fn into_function_filter(self: Box<Self>) -> Option<Box<dyn FunctionFilter>> {
        Some(self)
    }
}

/// Splits an identifier on `_`, `$`, digits-to-letters and camelCase boundaries,
/// lowercasing every word.
pub fn split_name_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => {
                (p.is_lowercase() && c.is_uppercase())
                    || (p.is_alphabetic() && c.is_numeric())
                    || (p.is_numeric() && c.is_alphabetic())
            }
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
