//! Element classification and click simulation.
//!
//! Interactive behavior is dispatched through a single tagged-variant
//! [`ElementKind`] classified from tag name plus `type` attribute, and a
//! single [`click`] operation implemented as a match over the variant.
//! There is no event subscription: clicking mutates the tree (`checked`,
//! `selected`) and reports what a real browser would do next as a
//! [`ClickOutcome`] for the session layer to act on.

use wallaby_dom::{Document, NodeId};

/// Behavioral classification of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<a>` - clicking follows the `href`.
    Anchor,
    /// `<button>` or `<input type=submit|button|image|reset>` - clicking
    /// requests a form submission.
    ButtonLike,
    /// `<input type=checkbox>` - clicking toggles `checked`.
    Checkbox,
    /// `<input type=radio>` - clicking checks it and unchecks its group.
    Radio,
    /// `<select>` - a value-bearing container of options.
    Select,
    /// `<option>` - clicking selects it within its `<select>`.
    OptionItem,
    /// Text-bearing controls: `<textarea>` and `<input>` of text-like
    /// types (text, password, hidden, email, ...).
    TextInput,
    /// `<input type=file>` - carried in forms but never submitted with a
    /// value by this simulation.
    FileUpload,
    /// Everything else - clicking is inert.
    Generic,
}

/// What a click on an element asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Follow a link; carries the raw (unresolved) `href` value.
    Navigate(String),
    /// Submit the enclosing form, if the element sits inside one.
    SubmitForm(Option<NodeId>),
    /// A checkbox was toggled; carries the new checked state.
    Toggled(bool),
    /// A radio button or option became the selected member of its group.
    Selected,
    /// Nothing happened.
    Ignored,
}

/// Classify an element by tag name and `type` attribute.
#[must_use]
pub fn classify(tree: &Document, id: NodeId) -> ElementKind {
    let Some(element) = tree.as_element(id) else {
        return ElementKind::Generic;
    };
    match element.tag_name.as_str() {
        "a" => ElementKind::Anchor,
        "button" => ElementKind::ButtonLike,
        "select" => ElementKind::Select,
        "option" => ElementKind::OptionItem,
        "textarea" => ElementKind::TextInput,
        "input" => {
            let input_type = element
                .attrs
                .get("type")
                .map_or_else(|| "text".to_string(), str::to_ascii_lowercase);
            match input_type.as_str() {
                "checkbox" => ElementKind::Checkbox,
                "radio" => ElementKind::Radio,
                "submit" | "button" | "image" | "reset" => ElementKind::ButtonLike,
                "file" => ElementKind::FileUpload,
                _ => ElementKind::TextInput,
            }
        }
        _ => ElementKind::Generic,
    }
}

/// The nearest `form` ancestor of an element, if any.
#[must_use]
pub fn enclosing_form(tree: &Document, id: NodeId) -> Option<NodeId> {
    tree.ancestors(id)
        .find(|&a| tree.as_element(a).is_some_and(|e| e.tag_name == "form"))
}

/// Simulate a click on an element.
///
/// Mutates the tree where the element kind calls for it (checkbox toggle,
/// radio/option selection) and reports the requested follow-up action.
pub fn click(tree: &mut Document, id: NodeId) -> ClickOutcome {
    match classify(tree, id) {
        ElementKind::Anchor => tree
            .get_attribute(id, "href")
            .map(ToString::to_string)
            .map_or(ClickOutcome::Ignored, ClickOutcome::Navigate),
        ElementKind::ButtonLike => ClickOutcome::SubmitForm(enclosing_form(tree, id)),
        ElementKind::Checkbox => {
            if tree.remove_attribute(id, "checked").is_some() {
                ClickOutcome::Toggled(false)
            } else {
                tree.set_attribute(id, "checked", "checked");
                ClickOutcome::Toggled(true)
            }
        }
        ElementKind::Radio => {
            uncheck_radio_group(tree, id);
            tree.set_attribute(id, "checked", "checked");
            ClickOutcome::Selected
        }
        ElementKind::OptionItem => {
            select_option(tree, id);
            ClickOutcome::Selected
        }
        ElementKind::Select
        | ElementKind::TextInput
        | ElementKind::FileUpload
        | ElementKind::Generic => ClickOutcome::Ignored,
    }
}

/// Uncheck every other radio button sharing this one's `name`, scoped to
/// the enclosing form (or the whole document when the radio is formless).
fn uncheck_radio_group(tree: &mut Document, id: NodeId) {
    let Some(name) = tree.get_attribute(id, "name").map(ToString::to_string) else {
        return;
    };
    let scope = enclosing_form(tree, id).unwrap_or_else(|| tree.root());
    let group: Vec<NodeId> = tree
        .descendants(scope)
        .filter(|&member| {
            member != id
                && classify(tree, member) == ElementKind::Radio
                && tree.get_attribute(member, "name") == Some(name.as_str())
        })
        .collect();
    for member in group {
        let _ = tree.remove_attribute(member, "checked");
    }
}

/// Mark an option selected. Unless the enclosing select is `multiple`,
/// every sibling option is deselected first.
fn select_option(tree: &mut Document, id: NodeId) {
    let select = tree
        .ancestors(id)
        .find(|&a| tree.as_element(a).is_some_and(|e| e.tag_name == "select"));

    if let Some(select) = select {
        let exclusive = tree.get_attribute(select, "multiple").is_none();
        if exclusive {
            let options: Vec<NodeId> = tree
                .descendants(select)
                .filter(|&o| tree.as_element(o).is_some_and(|e| e.tag_name == "option"))
                .collect();
            for option in options {
                let _ = tree.remove_attribute(option, "selected");
            }
        }
    }
    tree.set_attribute(id, "selected", "selected");
}
