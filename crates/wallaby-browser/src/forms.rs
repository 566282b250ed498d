//! Form value extraction.
//!
//! Walks a form subtree and collects the `(name, value)` pairs a browser
//! would put on the wire, in document order. Submission transport itself
//! is the caller's business; this module only answers "what would be
//! submitted".

use wallaby_dom::{Document, NodeId};

use crate::element::{ElementKind, classify};

/// Collect the submittable `(name, value)` pairs of a form subtree.
///
/// - text-like inputs contribute their `value` attribute (empty if unset)
/// - checkboxes and radios contribute only when `checked`, with a default
///   value of `on`
/// - `textarea` contributes its text content
/// - `select` contributes the selected option's value, falling back to the
///   option's text, falling back to the first option when nothing is
///   marked `selected`
/// - disabled controls, file uploads, and buttons contribute nothing (a
///   clicked button is reported separately by the click path)
#[must_use]
pub fn values_to_submit(tree: &Document, form: NodeId) -> Vec<(String, String)> {
    let mut values = Vec::new();

    for id in tree.descendants(form) {
        let Some(element) = tree.as_element(id) else {
            continue;
        };
        if element.attrs.contains("disabled") {
            continue;
        }
        let Some(name) = element.attrs.get("name").map(ToString::to_string) else {
            continue;
        };

        match classify(tree, id) {
            ElementKind::TextInput => {
                let value = if element.tag_name == "textarea" {
                    tree.text_content(id)
                } else {
                    element.attrs.get("value").unwrap_or("").to_string()
                };
                values.push((name, value));
            }
            ElementKind::Checkbox | ElementKind::Radio => {
                if element.attrs.contains("checked") {
                    let value = element.attrs.get("value").unwrap_or("on").to_string();
                    values.push((name, value));
                }
            }
            ElementKind::Select => {
                if let Some(value) = selected_value(tree, id) {
                    values.push((name, value));
                }
            }
            ElementKind::Anchor
            | ElementKind::ButtonLike
            | ElementKind::OptionItem
            | ElementKind::FileUpload
            | ElementKind::Generic => {}
        }
    }

    values
}

/// The value a `select` control submits.
///
/// The selected option's `value` attribute, else its text content; when no
/// option carries `selected`, the first option is the browser default.
fn selected_value(tree: &Document, select: NodeId) -> Option<String> {
    let options: Vec<NodeId> = tree
        .descendants(select)
        .filter(|&o| tree.as_element(o).is_some_and(|e| e.tag_name == "option"))
        .collect();

    let chosen = options
        .iter()
        .find(|&&o| tree.get_attribute(o, "selected").is_some())
        .or_else(|| options.first())?;

    Some(
        tree.get_attribute(*chosen, "value")
            .map_or_else(|| tree.text_content(*chosen).trim().to_string(), ToString::to_string),
    )
}
