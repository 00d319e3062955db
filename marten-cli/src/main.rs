//! Marten CLI
//!
//! Parses a component template and prints the tree it builds, the comments
//! found along the way and any parse errors.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use marten_common::warning::{set_enabled, warn_once};
use marten_dom::{DomTree, NodeId, NodeType, Span};
use marten_html::{DocumentFragment, ParserOptions, TemplateParser, TemplateTokenizer, dump_tree};

/// Command line arguments for the template parser.
#[derive(Parser, Debug)]
#[command(name = "marten")]
#[command(author, version, about = "Build a tree from an HTML-like component template", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Parse a template file and print its tree
    marten template.html

    # Parse a single-file component
    marten --sfc App.vue

    # Parse a template string directly
    marten --html '<svg><foreignObject><p>hi</p></foreignObject></svg>'

    # Emit JSON instead of an outline
    marten --format json --html '<ul><li>one<li>two</ul>'

    # Show every token the tree builder consumes
    marten --trace --html '<p>a<div>b</div>'
"#)]
struct Cli {
    /// Path to a template file
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse a template string directly instead of a file
    #[arg(long, value_name = "TEMPLATE")]
    html: Option<String>,

    /// How to print the result
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Treat the input as a single-file component (only the root
    /// `<template>` is parsed as markup)
    #[arg(long)]
    sfc: bool,

    /// Print every token as the tree builder consumes it
    #[arg(long)]
    trace: bool,

    /// Don't report parse errors on stderr
    #[arg(long)]
    no_warnings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented outline
    Tree,
    /// Nested JSON document
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_enabled(!cli.no_warnings);

    let source = load_source(&cli)?;
    let options = ParserOptions::new().single_file_component(cli.sfc);
    let mut parser = TemplateParser::with_options(TemplateTokenizer::new(source), options);
    if cli.trace {
        parser = parser.with_trace(|token| eprintln!("{} {token}", "token".dimmed()));
    }
    let fragment = parser.parse();

    match cli.format {
        Format::Tree => print_fragment(&fragment),
        Format::Json => {
            let document = fragment_json(&fragment);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    for error in &fragment.errors {
        let _ = warn_once("parser", &error.to_string());
    }
    Ok(())
}

/// Read the template from `--html` or from the file argument.
fn load_source(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    let Some(path) = &cli.path else {
        anyhow::bail!("no input: pass a template file or --html '<template>'");
    };
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_fragment(fragment: &DocumentFragment) {
    println!("{}", "=== Template Tree ===".bold());
    print!("{}", dump_tree(&fragment.tree, NodeId::ROOT));

    if !fragment.comments.is_empty() {
        println!();
        println!("{}", "=== Comments ===".bold());
        for comment in &fragment.comments {
            println!(
                "  {} {} {:?}",
                format_span(comment.span).dimmed(),
                comment.kind,
                comment.value
            );
        }
    }

    println!();
    let summary = format!(
        "{} nodes, {} comments, {} errors",
        fragment.tree.len(),
        fragment.comments.len(),
        fragment.errors.len()
    );
    if fragment.errors.is_empty() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}

fn format_span(span: Span) -> String {
    format!(
        "{}:{}-{}:{}",
        span.start_pos.line, span.start_pos.column, span.end_pos.line, span.end_pos.column
    )
}

fn fragment_json(fragment: &DocumentFragment) -> Value {
    json!({
        "root": node_json(&fragment.tree, NodeId::ROOT),
        "comments": fragment.comments,
        "errors": fragment.errors,
    })
}

fn node_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let range = [node.span.start, node.span.end];
    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|&child| node_json(tree, child))
        .collect();

    match &node.node_type {
        NodeType::Fragment => json!({
            "type": "DocumentFragment",
            "range": range,
            "children": children,
        }),
        NodeType::Element(data) => {
            let attributes: Vec<Value> = data
                .start_tag
                .attributes
                .iter()
                .map(|attr| {
                    json!({
                        "name": attr.key.name,
                        "rawName": attr.key.raw_name,
                        "value": attr.value.as_ref().map(|value| value.value.as_str()),
                        "directive": attr.directive,
                        "range": [attr.span.start, attr.span.end],
                    })
                })
                .collect();
            json!({
                "type": "Element",
                "name": data.name,
                "namespace": data.namespace,
                "range": range,
                "selfClosing": data.start_tag.self_closing,
                "endTag": data.end_tag.map(|tag| [tag.span.start, tag.span.end]),
                "attributes": attributes,
                "children": children,
            })
        }
        NodeType::Text(value) => json!({
            "type": "Text",
            "value": value,
            "range": range,
        }),
    }
}
