//! Parser configuration.

use serde::Serialize;

/// Settings that change how the tree builder treats top-level elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParserOptions {
    /// Treat the input as a single-file component: every top-level element
    /// other than `<template>` is a custom block (`<script>`, `<style>`,
    /// `<docs>`, ...) whose content is raw text unless it declares
    /// `lang="html"`.
    pub single_file_component: bool,
}

impl ParserOptions {
    /// The defaults: a plain template, not a single-file component.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            single_file_component: false,
        }
    }

    /// Enable or disable single-file component mode.
    #[must_use]
    pub const fn single_file_component(mut self, enabled: bool) -> Self {
        self.single_file_component = enabled;
        self
    }
}
