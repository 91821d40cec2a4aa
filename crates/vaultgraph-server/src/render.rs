//! Markdown rendering with references turned into links

use pulldown_cmark::{html, Options, Parser};
use vaultgraph_indexer::{canonical_file, extract_references};

/// Render a document to HTML. Each reference becomes a link to the node
/// id it resolves to, labelled with its alias.
pub fn render_document(text: &str, extension: &str) -> String {
    let linked = link_references(text, extension);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(&linked, options);
    let mut rendered = String::with_capacity(linked.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}

fn link_references(text: &str, extension: &str) -> String {
    let mut linked = String::with_capacity(text.len());
    let mut last = 0;

    for reference in extract_references(text) {
        linked.push_str(&text[last..reference.span.start]);
        let href = if reference.is_directory {
            reference.target.clone()
        } else {
            canonical_file(&reference.target, extension)
        };
        linked.push('[');
        linked.push_str(&escape_label(&reference.alias));
        linked.push_str("](<");
        linked.push_str(&escape_destination(&href));
        linked.push_str(">)");
        last = reference.span.end;
    }

    linked.push_str(&text[last..]);
    linked
}

fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '[' | ']' | '\\' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn escape_destination(href: &str) -> String {
    let mut escaped = String::with_capacity(href.len());
    for c in href.chars() {
        match c {
            ' ' => escaped.push_str("%20"),
            '<' => escaped.push_str("%3C"),
            '>' => escaped.push_str("%3E"),
            '\n' => escaped.push_str("%0A"),
            '\r' => escaped.push_str("%0D"),
            _ => escaped.push(c),
        }
    }
    escaped
}
