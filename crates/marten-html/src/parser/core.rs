use std::fmt::Write as _;

use serde::Serialize;

use marten_dom::{
    Attribute, AttributeKey, Comment, DomTree, ElementData, EndTag, LexicalToken, Namespace,
    NodeId, NodeType, Span, StartTag,
};

use super::attributes::check_namespace_declaration;
use super::namespace::resolve_namespace;
use super::options::ParserOptions;
use super::stack::{ElementStack, implies_close};
use crate::error::{ErrorCode, ParseError};
use crate::foreign_content::{adjust_attribute_name, adjust_element_name};
use crate::tag_names::{is_rawtext_element, is_rcdata_element, is_void_element};
use crate::tokenizer::{LexMode, LexerState, LexicalOutput, Token, TokenAttribute, TokenSource};

/// An observer that sees every token right before the tree builder handles
/// it.
pub type TraceHook = Box<dyn FnMut(&Token)>;

/// A parsed template.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFragment {
    /// The node tree. [`NodeId::ROOT`] is the fragment itself.
    pub tree: DomTree,
    /// The lexer's fine-grained records, in source order.
    pub tokens: Vec<LexicalToken>,
    /// Comments, in source order. They are not part of the tree.
    pub comments: Vec<Comment>,
    /// Lexing errors first, then tree construction errors, each in the order
    /// they were found.
    pub errors: Vec<ParseError>,
}

impl DocumentFragment {
    /// The range the fragment covers: from the start of the input to the end
    /// of its last top-level node.
    #[must_use]
    pub fn span(&self) -> Span {
        self.tree.span(NodeId::ROOT).unwrap_or_default()
    }

    /// The top-level nodes.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        self.tree.children(NodeId::ROOT)
    }
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DocumentFragment`] from tokens pulled one at a time from a
/// [`TokenSource`].
///
/// Unlike a browser's tree builder there are no insertion modes: every
/// start tag opens an element where it is, and the only repairs are the
/// implied end tags of [`implies_close`]. Problems never stop the parse;
/// they are recorded as [`ParseError`]s.
pub struct TemplateParser<S: TokenSource> {
    source: S,

    /// The settings handed to `source` with every pull.
    lexer: LexerState,

    /// `NodeId::ROOT` (index 0) is the fragment node.
    tree: DomTree,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena.
    stack_of_open_elements: ElementStack,

    /// Tree construction errors, in detection order.
    errors: Vec<ParseError>,

    /// The element whose `v-pre` attribute turned template bindings off.
    v_pre_element: Option<NodeId>,

    options: ParserOptions,

    trace: Option<TraceHook>,
}

impl<S: TokenSource> TemplateParser<S> {
    /// Create a parser that pulls tokens from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    /// Create a parser with non-default settings.
    #[must_use]
    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            lexer: LexerState::default(),
            tree: DomTree::new(),
            stack_of_open_elements: ElementStack::new(),
            errors: Vec::new(),
            v_pre_element: None,
            options,
            trace: None,
        }
    }

    /// Call `hook` with every token before it is handled.
    #[must_use]
    pub fn with_trace(mut self, hook: impl FnMut(&Token) + 'static) -> Self {
        self.trace = Some(Box::new(hook));
        self
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The currently open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        self.stack_of_open_elements.as_slice()
    }

    /// The lexer settings the next pull will see.
    #[must_use]
    pub const fn lexer_state(&self) -> &LexerState {
        &self.lexer
    }

    /// Tree construction errors found so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Run the parser to the end of the input.
    #[must_use]
    pub fn parse(mut self) -> DocumentFragment {
        while self.step() {}
        self.finalize()
    }

    /// Pull one token and handle it. Returns `false` once the source is
    /// exhausted.
    pub fn step(&mut self) -> bool {
        let Some(token) = self.source.next_token(&mut self.lexer) else {
            return false;
        };
        if let Some(trace) = self.trace.as_mut() {
            trace(&token);
        }
        match token {
            Token::StartTag {
                name,
                span,
                self_closing,
                attributes,
            } => self.open_element(&name, span, self_closing, attributes),
            Token::EndTag { name, span } => self.close_element(&name, span),
            Token::Text { value, span } => self.append_text(value, span),
        }
        true
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "An end-of-file token ... Stop parsing."
    ///
    /// Every element still open is closed without an end tag, the fragment's
    /// range is extended over its content, and the lexer's records are
    /// merged in.
    #[must_use]
    pub fn finalize(mut self) -> DocumentFragment {
        self.pop_until(0);
        self.tree.propagate_end_location(NodeId::ROOT);

        let LexicalOutput {
            tokens,
            comments,
            mut errors,
        } = self.source.finish();
        errors.extend(self.errors);

        DocumentFragment {
            tree: self.tree,
            tokens,
            comments,
            errors,
        }
    }

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    /// With nothing open, content goes into the fragment.
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .current()
            .unwrap_or(NodeId::ROOT)
    }

    fn report(&mut self, code: ErrorCode, span: &Span) {
        self.errors.push(ParseError::at(code, span));
    }

    /// Create the element for a start tag and insert it.
    fn open_element(
        &mut self,
        name: &str,
        span: Span,
        self_closing: bool,
        attributes: Vec<TokenAttribute>,
    ) {
        // STEP 1: Close the current element if this start tag implies its
        //         end tag.
        self.close_current_element_if_implied(name);

        // STEP 2: Resolve the namespace at the insertion point and adjust the
        //         tag name for it.
        let parent = self.current_node();
        let namespace = resolve_namespace(self.tree.as_element(parent), self.lexer.namespace, name);
        let element_name = adjust_element_name(name, namespace);

        // STEP 3: Build the attributes. They refer to the element by the id
        //         it is about to be allocated under.
        let element_id = self.tree.next_id();
        let mut element_attributes = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let attribute = Attribute {
                element: element_id,
                key: AttributeKey {
                    name: adjust_attribute_name(&attribute.key.name, namespace),
                    ..attribute.key
                },
                value: attribute.value,
                directive: attribute.directive,
                span: attribute.span,
            };
            if let Some(code) = check_namespace_declaration(&attribute, namespace) {
                self.report(code, &attribute.span);
            }
            element_attributes.push(attribute);
        }

        let expression_enabled = self.lexer.expression_enabled;
        let opens_v_pre = self.v_pre_element.is_none()
            && element_attributes
                .iter()
                .any(|attribute| attribute.key.name == "v-pre");
        if opens_v_pre {
            self.lexer.expression_enabled = false;
        }

        // STEP 4: Insert the element at the insertion point.
        let element = ElementData {
            name: element_name,
            namespace,
            start_tag: StartTag {
                span,
                self_closing,
                attributes: element_attributes,
            },
            end_tag: None,
            variables: Vec::new(),
        };
        let id = self.tree.alloc(NodeType::Element(element), span);
        debug_assert_eq!(id, element_id);
        self.tree.append_child(parent, id);

        // STEP 5: Void and self-closed elements are complete already.
        //
        // Self-closing is honored on any element; on a non-void HTML element
        // it is only reported.
        let is_html = namespace == Namespace::Html;
        let is_void = is_html && is_void_element(name);
        if self_closing && is_html && !is_void {
            self.report(ErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus, &span);
        }
        if self_closing || is_void {
            if opens_v_pre {
                self.lexer.expression_enabled = expression_enabled;
            }
            return;
        }

        // STEP 6: Otherwise the element becomes the current node.
        self.push_element(id, namespace);
        if opens_v_pre {
            self.v_pre_element = Some(id);
        }

        // STEP 7: Switch the lexer to the element's content model.
        if is_html {
            self.apply_content_model(id, parent);
        }
    }

    /// Adjust the lexer for the content of a newly opened HTML element.
    ///
    /// - A top-level `<template>` turns template bindings on; with a `lang`
    ///   other than `html` its content is another language and is raw text.
    /// - In single-file component mode every other top-level element is a
    ///   custom block whose content is raw text unless `lang` is `html`.
    /// - Otherwise the RCDATA and RAWTEXT tables apply.
    fn apply_content_model(&mut self, id: NodeId, parent: NodeId) {
        let Some(element) = self.tree.as_element(id) else {
            return;
        };
        let top_level = parent == NodeId::ROOT;
        let lang = element
            .attribute_value("lang")
            .filter(|lang| !lang.is_empty());

        if top_level && element.name == "template" {
            if self.v_pre_element.is_none() {
                self.lexer.expression_enabled = true;
            }
            if lang.is_some_and(|lang| lang != "html") {
                self.lexer.mode = LexMode::Rawtext;
            }
        } else if top_level && self.options.single_file_component {
            if lang != Some("html") {
                self.lexer.mode = LexMode::Rawtext;
            }
        } else if is_rcdata_element(&element.name) {
            // [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
            // "If it's the generic RCDATA element parsing algorithm, switch the
            // tokenizer to the RCDATA state."
            self.lexer.mode = LexMode::Rcdata;
        } else if is_rawtext_element(&element.name) {
            // "If it's the generic raw text element parsing algorithm, switch
            // the tokenizer to the RAWTEXT state."
            self.lexer.mode = LexMode::Rawtext;
        }
    }

    /// Close the element an end tag names.
    ///
    /// The innermost open element with that name (compared ASCII
    /// case-insensitively) gets the end tag, and it and everything opened
    /// after it are closed. An end tag with no open element of that name is
    /// reported and otherwise ignored.
    fn close_element(&mut self, name: &str, span: Span) {
        let tree = &self.tree;
        let Some(depth) = self.stack_of_open_elements.rposition(|id| {
            tree.as_element(id)
                .is_some_and(|element| element.name.eq_ignore_ascii_case(name))
        }) else {
            self.report(ErrorCode::XInvalidEndTag, &span);
            return;
        };

        let element = self.stack_of_open_elements.as_slice()[depth];
        if let Some(data) = self.tree.as_element_mut(element) {
            data.end_tag = Some(EndTag { span });
        }
        self.pop_until(depth);
    }

    /// Insert a text node at the insertion point.
    fn append_text(&mut self, value: String, span: Span) {
        let parent = self.current_node();
        let id = self.tree.alloc(NodeType::Text(value), span);
        self.tree.append_child(parent, id);
    }

    /// Pop the current element if a `name` start tag implies its end tag.
    fn close_current_element_if_implied(&mut self, name: &str) {
        let Some(current) = self.stack_of_open_elements.current() else {
            return;
        };
        let implied = self
            .tree
            .as_element(current)
            .is_some_and(|element| implies_close(&element.name, name));
        if implied {
            self.pop_element();
        }
    }

    /// "Push the element onto the stack of open elements" and enter its
    /// namespace.
    fn push_element(&mut self, id: NodeId, namespace: Namespace) {
        self.stack_of_open_elements.push(id);
        self.lexer.namespace = namespace;
    }

    /// Pop the current element.
    ///
    /// Its range is extended over its content, the lexer returns to the
    /// namespace of the new current node, leaving the `v-pre` element turns
    /// template bindings back on, and an empty stack turns them off.
    ///
    /// # Panics
    ///
    /// Panics if no element is open.
    fn pop_element(&mut self) {
        let Some(element) = self.stack_of_open_elements.pop() else {
            panic!("pop_element called with an empty stack of open elements");
        };
        self.tree.propagate_end_location(element);

        self.lexer.namespace = self
            .stack_of_open_elements
            .current()
            .and_then(|id| self.tree.as_element(id))
            .map_or(Namespace::Html, |data| data.namespace);

        if self.v_pre_element == Some(element) {
            self.v_pre_element = None;
            self.lexer.expression_enabled = true;
        }
        if self.stack_of_open_elements.is_empty() {
            self.lexer.expression_enabled = false;
        }
    }

    /// Pop elements until only `depth` remain open.
    fn pop_until(&mut self, depth: usize) {
        while self.stack_of_open_elements.len() > depth {
            self.pop_element();
        }
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
///
/// Foreign elements are tagged with their namespace; whitespace in text is
/// made visible.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    dump_node(tree, id, 0, &mut out);
    out
}

fn dump_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Fragment => {
            let _ = writeln!(out, "{prefix}#fragment");
        }
        NodeType::Element(data) => {
            let _ = write!(out, "{prefix}<{}", data.name);
            for attr in &data.start_tag.attributes {
                let _ = write!(out, " {}", attr.key.name);
                if let Some(value) = &attr.value {
                    let _ = write!(out, "=\"{}\"", value.value);
                }
            }
            let _ = write!(out, ">");
            if data.namespace.is_foreign() {
                let _ = write!(out, " [{}]", data.namespace);
            }
            let _ = writeln!(out);
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
    for &child in tree.children(id) {
        dump_node(tree, child, indent + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenList;

    #[test]
    #[should_panic(expected = "empty stack of open elements")]
    fn test_pop_on_empty_stack_panics() {
        let mut parser = TemplateParser::new(TokenList::new(Vec::new()));
        parser.pop_element();
    }

    #[test]
    fn test_empty_input_yields_empty_fragment() {
        let fragment = TemplateParser::new(TokenList::new(Vec::new())).parse();
        assert!(fragment.children().is_empty());
        assert_eq!(fragment.span(), Span::default());
        assert!(fragment.errors.is_empty());
    }
}
