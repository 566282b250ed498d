//! Wallaby CLI
//!
//! A headless browser for scripted page inspection: parse a page from a
//! URL, file, or inline string, optionally run a selector query against
//! it, and print the tree (or matches) as text or JSON.

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use wallaby_browser::Browser;
use wallaby_dom::{Document, NodeId, NodeKind};
use wallaby_html::ParseOptions;

/// Parse a page and inspect it from the command line.
#[derive(Parser)]
#[command(name = "wallaby", version, about)]
struct Args {
    /// URL or file path to load. Ignored when --html is given.
    target: Option<String>,

    /// Parse this inline HTML string instead of loading a target.
    #[arg(long)]
    html: Option<String>,

    /// Selector query to run against the parsed document.
    #[arg(short, long)]
    query: Option<String>,

    /// Emit the tree (or query matches) as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Keep whitespace runs in text content instead of collapsing them.
    #[arg(long)]
    raw_whitespace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let options = ParseOptions {
        collapse_whitespace: !args.raw_whitespace,
    };
    let mut browser = Browser::new(options);

    match (&args.html, &args.target) {
        (Some(html), _) => browser.load_html(html, None),
        (None, Some(target)) => browser
            .navigate(target)
            .with_context(|| format!("failed to load '{target}'"))?,
        (None, None) => anyhow::bail!("provide a URL/file target or --html"),
    }

    let document = browser.document().context("no document loaded")?;

    if let Some(query) = &args.query {
        let matches = browser.find(query)?;
        if args.json {
            let values: Vec<Value> = matches
                .iter()
                .map(|&id| node_to_json(document, id))
                .collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        } else {
            println!(
                "{} {}",
                matches.len().green(),
                if matches.len() == 1 { "match" } else { "matches" }
            );
            for id in matches {
                println!("{}", document.outer_html(id));
            }
        }
    } else if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&node_to_json(document, document.root()))?
        );
    } else {
        print_tree(document, document.root(), 0);
    }

    Ok(())
}

/// Print an indented outline of the tree.
fn print_tree(tree: &Document, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Document => {
            println!("{indent}{}", "#document".dimmed());
        }
        NodeKind::Element(data) => {
            let attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|a| format!("{}=\"{}\"", a.name, a.value))
                .collect();
            if attrs.is_empty() {
                println!("{indent}{}", data.tag_name.cyan());
            } else {
                println!("{indent}{} {}", data.tag_name.cyan(), attrs.join(" ").dimmed());
            }
        }
        NodeKind::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                println!("{indent}{trimmed:?}");
            }
        }
        NodeKind::Comment(data) => {
            println!("{indent}{}", format!("<!-- {} -->", data.trim()).dimmed());
        }
        NodeKind::Cdata(data) => {
            println!("{indent}{}", format!("<![CDATA[{data}]]>").dimmed());
        }
    }
    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1);
    }
}

/// Convert a subtree to a JSON value.
fn node_to_json(tree: &Document, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect();
    match &node.kind {
        NodeKind::Document => json!({
            "node": "document",
            "doctype": tree.doctype,
            "children": children,
        }),
        NodeKind::Element(data) => {
            let attrs: Vec<Value> = data
                .attrs
                .iter()
                .map(|a| json!({ "name": a.name, "value": a.value }))
                .collect();
            json!({
                "node": "element",
                "tag": data.tag_name,
                "attributes": attrs,
                "children": children,
            })
        }
        NodeKind::Text(text) => json!({ "node": "text", "content": text }),
        NodeKind::Comment(data) => json!({ "node": "comment", "content": data }),
        NodeKind::Cdata(data) => json!({ "node": "cdata", "content": data }),
    }
}
