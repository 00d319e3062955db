//! Integration tests for template tree construction.

use std::cell::RefCell;
use std::rc::Rc;

use marten_dom::{DomTree, ElementData, Namespace, NodeId, NodeType, Position, Span};
use marten_html::tag_names::is_void_element;
use marten_html::tokenizer::LexicalOutput;
use marten_html::{
    DocumentFragment, ErrorCode, ParseError, ParserOptions, TemplateParser, TemplateTokenizer,
    Token, TokenList, dump_tree, parse_template, parse_template_with_options,
};

/// Helper to parse a template with the default options
fn parse(source: &str) -> DocumentFragment {
    parse_template(source)
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, name: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.name == name
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, name) {
            return Some(found);
        }
    }
    None
}

/// Helper to find an element that must exist
fn element(fragment: &DocumentFragment, name: &str) -> NodeId {
    find_element(&fragment.tree, NodeId::ROOT, name)
        .unwrap_or_else(|| panic!("no <{name}> in the tree"))
}

/// Helper to get the element data of a node
fn data(fragment: &DocumentFragment, id: NodeId) -> &ElementData {
    fragment.tree.as_element(id).expect("not an element")
}

/// Helper to get the names of a node's element children
fn child_names(fragment: &DocumentFragment, id: NodeId) -> Vec<&str> {
    fragment
        .tree
        .children(id)
        .iter()
        .filter_map(|&child| fragment.tree.as_element(child))
        .map(|data| data.name.as_str())
        .collect()
}

/// Helper to get text content of a node (concatenated)
fn text_content(tree: &DomTree, id: NodeId) -> String {
    let mut result = String::new();
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Text(data) => result.push_str(data),
            _ => {
                for &child_id in tree.children(id) {
                    result.push_str(&text_content(tree, child_id));
                }
            }
        }
    }
    result
}

/// Helper to get the error codes in order
fn codes(fragment: &DocumentFragment) -> Vec<ErrorCode> {
    fragment.errors.iter().map(|error| error.code).collect()
}

/// Helper to get a span's offsets
fn offsets(span: Span) -> (usize, usize) {
    (span.start, span.end)
}

/// Helper to write a tree back out as markup, closing every element
/// explicitly
fn serialize(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Fragment => {}
        NodeType::Text(text) => {
            out.push_str(&text.replace('&', "&amp;").replace('<', "&lt;"));
            return;
        }
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.name);
            for attr in &data.start_tag.attributes {
                out.push(' ');
                out.push_str(&attr.key.raw_name);
                if let Some(value) = &attr.value {
                    out.push_str(&format!("=\"{}\"", value.value));
                }
            }
            if data.start_tag.self_closing {
                out.push_str("/>");
                return;
            }
            out.push('>');
        }
    }
    for &child in tree.children(id) {
        serialize(tree, child, out);
    }
    if let Some(data) = tree.as_element(id)
        && !(data.namespace == Namespace::Html && is_void_element(&data.name))
    {
        out.push_str(&format!("</{}>", data.name));
    }
}

/// Span on line 1 covering `start..end`.
fn span(start: usize, end: usize) -> Span {
    Span::new(start, end, Position::new(1, start), Position::new(1, end))
}

#[test]
fn test_fragment_range_ends_at_last_child() {
    let fragment = parse("<div>a</div>\n");
    assert_eq!(offsets(fragment.span()), (0, 13));
    assert_eq!(fragment.span().start_pos, Position::START);
    assert_eq!(fragment.span().end_pos, Position::new(2, 0));
}

#[test]
fn test_empty_input_has_zero_width_fragment() {
    let fragment = parse("");
    assert!(fragment.children().is_empty());
    assert_eq!(fragment.span(), Span::default());
}

#[test]
fn test_element_ranges_cover_start_to_end_tag() {
    let fragment = parse("<div><span>x</span></div>");
    let div = element(&fragment, "div");
    let span_el = element(&fragment, "span");
    assert_eq!(offsets(fragment.tree.span(div).unwrap()), (0, 25));
    assert_eq!(offsets(fragment.tree.span(span_el).unwrap()), (5, 19));
    assert_eq!(offsets(data(&fragment, div).start_tag.span), (0, 5));
    assert_eq!(offsets(data(&fragment, div).end_tag.unwrap().span), (19, 25));
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_implicitly_closed_element_ends_at_last_child() {
    let fragment = parse("<p>foo<p>bar");
    let paragraphs: Vec<NodeId> = fragment.children().to_vec();
    assert_eq!(child_names(&fragment, NodeId::ROOT), vec!["p", "p"]);
    assert_eq!(offsets(fragment.tree.span(paragraphs[0]).unwrap()), (0, 6));
    assert_eq!(offsets(fragment.tree.span(paragraphs[1]).unwrap()), (6, 12));
    assert!(data(&fragment, paragraphs[0]).end_tag.is_none());
    assert_eq!(text_content(&fragment.tree, paragraphs[0]), "foo");
    assert_eq!(text_content(&fragment.tree, paragraphs[1]), "bar");
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_void_elements_are_never_opened() {
    let fragment = parse("<img><p>x</p>");
    let img = element(&fragment, "img");
    assert!(fragment.tree.children(img).is_empty());
    assert!(data(&fragment, img).end_tag.is_none());
    assert_eq!(child_names(&fragment, NodeId::ROOT), vec!["img", "p"]);
}

#[test]
fn test_self_closing_void_and_non_void() {
    let fragment = parse("<img />");
    assert!(fragment.errors.is_empty());

    let fragment = parse("<div />text");
    assert_eq!(
        codes(&fragment),
        vec![ErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus]
    );
    assert_eq!(fragment.errors[0].index, 0);
    let div = element(&fragment, "div");
    assert!(fragment.tree.children(div).is_empty());
    assert!(data(&fragment, div).start_tag.self_closing);
    assert_eq!(fragment.children().len(), 2);
}

#[test]
fn test_self_closing_foreign_element_is_not_reported() {
    let fragment = parse("<svg><circle r=\"1\"/><path/></svg>");
    assert!(fragment.errors.is_empty());
    assert_eq!(child_names(&fragment, element(&fragment, "svg")), vec!["circle", "path"]);
}

#[test]
fn test_svg_namespace_and_foreign_object() {
    let fragment = parse(
        r#"<svg viewBox="0 0 1 1"><foreignObject><div></div></foreignObject><clipPath/></svg>"#,
    );
    let svg = element(&fragment, "svg");
    assert_eq!(data(&fragment, svg).namespace, Namespace::Svg);
    assert_eq!(data(&fragment, svg).start_tag.attributes[0].key.name, "viewBox");
    assert_eq!(data(&fragment, svg).start_tag.attributes[0].key.raw_name, "viewBox");

    let foreign_object = element(&fragment, "foreignObject");
    assert_eq!(data(&fragment, foreign_object).namespace, Namespace::Svg);
    assert!(data(&fragment, foreign_object).end_tag.is_some());
    assert_eq!(data(&fragment, element(&fragment, "div")).namespace, Namespace::Html);
    assert_eq!(data(&fragment, element(&fragment, "clipPath")).namespace, Namespace::Svg);
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_namespace_restored_after_foreign_island() {
    let fragment = parse("<div><svg><g></g></svg><span></span></div>");
    assert_eq!(data(&fragment, element(&fragment, "g")).namespace, Namespace::Svg);
    assert_eq!(data(&fragment, element(&fragment, "span")).namespace, Namespace::Html);
}

#[test]
fn test_mathml_text_integration_points() {
    let fragment = parse("<math><mi><span>x</span><mglyph></mglyph></mi></math>");
    assert_eq!(data(&fragment, element(&fragment, "math")).namespace, Namespace::MathMl);
    assert_eq!(data(&fragment, element(&fragment, "span")).namespace, Namespace::Html);
    assert_eq!(data(&fragment, element(&fragment, "mglyph")).namespace, Namespace::MathMl);
}

#[test]
fn test_annotation_xml_integration_point() {
    let fragment = parse(r#"<math><annotation-xml encoding="text/html"><div></div></annotation-xml></math>"#);
    assert_eq!(data(&fragment, element(&fragment, "div")).namespace, Namespace::Html);

    let fragment = parse(
        r#"<math><annotation-xml encoding="application/xhtml+xml"><div></div></annotation-xml></math>"#,
    );
    assert_eq!(data(&fragment, element(&fragment, "div")).namespace, Namespace::Html);

    let fragment = parse(r#"<math><annotation-xml encoding="application/foo"><div></div></annotation-xml></math>"#);
    assert_eq!(data(&fragment, element(&fragment, "div")).namespace, Namespace::MathMl);

    let fragment = parse(r#"<math><annotation-xml encoding="TEXT/HTML"><div></div></annotation-xml></math>"#);
    assert_eq!(data(&fragment, element(&fragment, "div")).namespace, Namespace::MathMl);

    let fragment = parse("<math><annotation-xml><svg></svg></annotation-xml></math>");
    assert_eq!(data(&fragment, element(&fragment, "svg")).namespace, Namespace::Svg);
}

#[test]
fn test_html_integration_points_switch_every_start_tag() {
    let fragment = parse("<svg><foreignObject><mglyph></mglyph></foreignObject></svg>");
    assert_eq!(data(&fragment, element(&fragment, "mglyph")).namespace, Namespace::Html);

    let fragment = parse("<svg><desc><malignmark></malignmark></desc></svg>");
    assert_eq!(data(&fragment, element(&fragment, "malignmark")).namespace, Namespace::Html);

    let fragment = parse(r#"<math><annotation-xml encoding="text/html"><mglyph></mglyph></annotation-xml></math>"#);
    assert_eq!(data(&fragment, element(&fragment, "mglyph")).namespace, Namespace::Html);

    let fragment = parse("<math><mtext><malignmark></malignmark></mtext></math>");
    assert_eq!(data(&fragment, element(&fragment, "malignmark")).namespace, Namespace::MathMl);
}

#[test]
fn test_mathml_attribute_adjusted() {
    let fragment = parse(r#"<math definitionURL="x"></math>"#);
    let math = element(&fragment, "math");
    assert_eq!(data(&fragment, math).start_tag.attributes[0].key.name, "definitionURL");
}

#[test]
fn test_unmatched_end_tag_is_reported_and_ignored() {
    let fragment = parse("<div>a</span>b</div>");
    assert_eq!(codes(&fragment), vec![ErrorCode::XInvalidEndTag]);
    assert_eq!(fragment.errors[0].index, 6);
    assert_eq!(fragment.errors[0].line, 1);
    assert_eq!(fragment.errors[0].column, 6);
    let div = element(&fragment, "div");
    assert_eq!(fragment.tree.children(div).len(), 2);
    assert!(data(&fragment, div).end_tag.is_some());
}

#[test]
fn test_unmatched_end_tag_changes_nothing() {
    let mut parser = TemplateParser::new(TokenList::new(vec![
        Token::StartTag {
            name: "p".to_string(),
            span: span(0, 3),
            self_closing: false,
            attributes: Vec::new(),
        },
        Token::EndTag {
            name: "div".to_string(),
            span: span(3, 9),
        },
    ]));
    assert!(parser.step());
    let open = parser.open_elements().to_vec();
    let nodes = parser.tree().len();
    assert!(parser.step());
    assert_eq!(parser.open_elements(), open.as_slice());
    assert_eq!(parser.tree().len(), nodes);
    assert_eq!(parser.errors()[0].code, ErrorCode::XInvalidEndTag);
    assert!(!parser.step());
}

#[test]
fn test_end_tag_closes_intervening_elements() {
    let fragment = parse("<div><span><b>x</div>after");
    let div = element(&fragment, "div");
    assert!(data(&fragment, div).end_tag.is_some());
    assert!(data(&fragment, element(&fragment, "span")).end_tag.is_none());
    assert!(data(&fragment, element(&fragment, "b")).end_tag.is_none());
    assert_eq!(offsets(fragment.tree.span(element(&fragment, "span")).unwrap()), (5, 15));
    assert_eq!(fragment.children().len(), 2);
}

#[test]
fn test_implied_end_tags() {
    let fragment = parse("<ul><li>a<li>b</ul>");
    assert_eq!(child_names(&fragment, element(&fragment, "ul")), vec!["li", "li"]);

    let fragment = parse("<dl><dt>a<dd>b<dt>c</dl>");
    assert_eq!(child_names(&fragment, element(&fragment, "dl")), vec!["dt", "dd", "dt"]);

    let fragment = parse("<p>a<div>b</div>");
    assert_eq!(child_names(&fragment, NodeId::ROOT), vec!["p", "div"]);

    let fragment = parse("<p>a<span>b</span></p>");
    assert_eq!(child_names(&fragment, element(&fragment, "p")), vec!["span"]);
}

#[test]
fn test_xmlns_validation() {
    let fragment = parse(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#);
    assert!(fragment.errors.is_empty());

    let fragment = parse(r#"<div xmlns="http://www.w3.org/1999/xhtml"></div>"#);
    assert!(fragment.errors.is_empty());

    let fragment = parse(r#"<div xmlns="http://www.w3.org/2000/svg"></div>"#);
    assert_eq!(codes(&fragment), vec![ErrorCode::XInvalidNamespace]);
    assert_eq!(fragment.errors[0].index, 5);

    let fragment = parse(r#"<svg xmlns:xlink="http://example.com"></svg>"#);
    assert_eq!(codes(&fragment), vec![ErrorCode::XInvalidNamespace]);

    let fragment = parse(r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink"></svg>"#);
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_attributes_point_at_their_element() {
    let fragment = parse(r#"<div><a href="x" title="y"></a></div>"#);
    let a = element(&fragment, "a");
    for attr in &data(&fragment, a).start_tag.attributes {
        assert_eq!(attr.element, a);
    }
}

#[test]
fn test_whitespace_text_is_kept() {
    let fragment = parse("<div> </div>");
    assert_eq!(text_content(&fragment.tree, element(&fragment, "div")), " ");
}

#[test]
fn test_root_template_enables_directives() {
    let fragment = parse(r#"<template><div :a="b" v-if="c" id="d"></div></template><i :a="b"></i>"#);
    let flags: Vec<bool> = data(&fragment, element(&fragment, "div"))
        .start_tag
        .attributes
        .iter()
        .map(|attr| attr.directive)
        .collect();
    assert_eq!(flags, vec![true, true, false]);
    assert!(!data(&fragment, element(&fragment, "i")).start_tag.attributes[0].directive);

    let div = data(&fragment, element(&fragment, "div"));
    assert!(div.has_attribute("v-if"));
    assert!(div.attribute("v-if").is_none());
    assert_eq!(div.attribute_value("id"), Some("d"));
}

#[test]
fn test_template_lang_switches_to_raw_text() {
    let fragment = parse(r#"<template lang="pug">div(a="b") <p></template>"#);
    let template = element(&fragment, "template");
    assert_eq!(fragment.tree.children(template).len(), 1);
    assert_eq!(text_content(&fragment.tree, template), r#"div(a="b") <p>"#);
    assert!(data(&fragment, template).end_tag.is_some());

    let fragment = parse(r#"<template lang="html"><p></p></template>"#);
    assert_eq!(child_names(&fragment, element(&fragment, "template")), vec!["p"]);
}

#[test]
fn test_raw_text_and_rcdata_elements() {
    let fragment = parse("<div><script>if (a<b) {}</script><textarea>&lt;b&gt;</textarea></div>");
    let script = element(&fragment, "script");
    assert_eq!(text_content(&fragment.tree, script), "if (a<b) {}");
    assert!(data(&fragment, script).end_tag.is_some());
    assert_eq!(text_content(&fragment.tree, element(&fragment, "textarea")), "<b>");
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_v_pre_disables_directives_inside() {
    let fragment = parse(
        r#"<template><div v-pre><span :a="b">{{ x }}</span></div><i :c="d"></i></template>"#,
    );
    let span_attr = &data(&fragment, element(&fragment, "span")).start_tag.attributes[0];
    assert!(!span_attr.directive);
    let i_attr = &data(&fragment, element(&fragment, "i")).start_tag.attributes[0];
    assert!(i_attr.directive);
}

#[test]
fn test_single_file_component_blocks() {
    let source = concat!(
        "<script>const a = '<div>'</script>\n",
        "<template><div></div></template>\n",
        "<docs lang=\"html\"><b>x</b></docs>\n",
        "<i18n>{ \"a\": \"<b>\" }</i18n>",
    );
    let fragment = parse_template_with_options(source, ParserOptions::new().single_file_component(true));

    let script = element(&fragment, "script");
    assert_eq!(text_content(&fragment.tree, script), "const a = '<div>'");
    assert_eq!(child_names(&fragment, element(&fragment, "template")), vec!["div"]);
    assert_eq!(child_names(&fragment, element(&fragment, "docs")), vec!["b"]);
    assert!(child_names(&fragment, element(&fragment, "i18n")).is_empty());
    assert!(fragment.errors.is_empty());
}

#[test]
fn test_lexing_errors_come_first() {
    let fragment = parse("</b><a x=1 x=2></a>");
    assert_eq!(
        codes(&fragment),
        vec![ErrorCode::DuplicateAttribute, ErrorCode::XInvalidEndTag]
    );
}

#[test]
fn test_cdata_follows_lexer_namespace() {
    let fragment = parse("<svg><![CDATA[x<y]]></svg><![CDATA[z]]>");
    assert_eq!(text_content(&fragment.tree, element(&fragment, "svg")), "x<y");
    assert_eq!(codes(&fragment), vec![ErrorCode::CdataInHtmlContent]);
    assert_eq!(fragment.comments.len(), 1);
}

#[test]
fn test_open_elements_mirror_parent_chain() {
    let source = "<div><ul><li>a<li><svg><foreignObject><p>b<p>c</svg></ul>d";
    let mut parser = TemplateParser::new(TemplateTokenizer::new(source.to_string()));
    while parser.step() {
        let open = parser.open_elements();
        let mut parent = NodeId::ROOT;
        for &id in open {
            assert_eq!(parser.tree().parent(id), Some(parent));
            parent = id;
        }
    }
    let fragment = parser.finalize();
    assert_eq!(child_names(&fragment, NodeId::ROOT), vec!["div"]);
}

#[test]
fn test_trace_hook_sees_every_token() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let fragment = TemplateParser::new(TemplateTokenizer::new("<p>a</p><br>".to_string()))
        .with_trace(move |token| sink.borrow_mut().push(token.to_string()))
        .parse();
    assert_eq!(fragment.children().len(), 2);
    assert_eq!(*seen.borrow(), vec!["<p>", "Text(\"a\")", "</p>", "<br>"]);
}

#[test]
fn test_scripted_tokens_without_tokenizer() {
    let tokens = vec![
        Token::StartTag {
            name: "svg".to_string(),
            span: span(0, 5),
            self_closing: false,
            attributes: Vec::new(),
        },
        Token::StartTag {
            name: "foreignobject".to_string(),
            span: span(5, 20),
            self_closing: false,
            attributes: Vec::new(),
        },
        Token::Text {
            value: "x".to_string(),
            span: span(20, 21),
        },
    ];
    let fragment = TemplateParser::new(TokenList::new(tokens)).parse();
    let foreign_object = element(&fragment, "foreignObject");
    assert_eq!(offsets(fragment.tree.span(foreign_object).unwrap()), (5, 21));
    assert_eq!(offsets(fragment.span()), (0, 21));
    assert!(fragment.tokens.is_empty());
}

#[test]
fn test_reparse_is_stable() {
    let sources = [
        "<p>a<p>b<ul><li>x &amp; y<li>z</ul>",
        "<div><span><b>x</div>after<img>",
        r#"<svg viewBox="0 0 1 1"><foreignObject><p>x</foreignObject><clipPath/></svg>"#,
        r#"<template><div :a="b" v-if="c"><my-comp/></div></template>"#,
        r#"<math><mi><i>x</i></mi><annotation-xml encoding="text/html"><b>y</b></annotation-xml></math>"#,
    ];
    for source in sources {
        let first = parse(source);
        let mut markup = String::new();
        serialize(&first.tree, NodeId::ROOT, &mut markup);
        let second = parse(&markup);
        assert_eq!(
            dump_tree(&first.tree, NodeId::ROOT),
            dump_tree(&second.tree, NodeId::ROOT),
            "re-parsing {markup:?} changed the tree"
        );
    }
}

#[test]
fn test_lexer_errors_precede_tree_errors() {
    let output = LexicalOutput {
        errors: vec![ParseError::at(ErrorCode::DuplicateAttribute, &span(9, 12))],
        ..LexicalOutput::default()
    };
    let source = TokenList::with_output(
        vec![
            Token::EndTag {
                name: "div".to_string(),
                span: span(0, 6),
            },
            Token::Text {
                value: "x".to_string(),
                span: span(6, 7),
            },
        ],
        output,
    );
    let fragment = TemplateParser::new(source).parse();
    assert_eq!(
        codes(&fragment),
        vec![ErrorCode::DuplicateAttribute, ErrorCode::XInvalidEndTag]
    );
    assert_eq!(fragment.errors[1].index, 0);
    assert_eq!(fragment.children().len(), 1);
}
