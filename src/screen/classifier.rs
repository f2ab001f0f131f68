use crate::browser::surface::{Locator, NodeSnapshot, Surface};
use crate::error::Result;
use crate::screen::screen_model::{ControlCategory, ControlDescriptor, ControlDetail};

const MAX_NAME_BODY: usize = 20;

/// Enumerate every control on the surface, category by category in
/// `ControlCategory::ALL` order, document order within a category.
pub fn extract_controls<S: Surface + ?Sized>(surface: &mut S) -> Result<Vec<ControlDescriptor>> {
    let mut controls = Vec::new();

    for category in ControlCategory::ALL {
        let nodes = surface.query_all(&Locator::css(category.selector()), None)?;
        controls.extend(nodes.iter().filter_map(|node| classify(category, node)));
    }

    Ok(controls)
}

/// Build a descriptor for one node. Returns `None` for nodes the category
/// deliberately skips (links without usable text).
pub fn classify(category: ControlCategory, node: &NodeSnapshot) -> Option<ControlDescriptor> {
    let (raw_text, detail) = match category {
        ControlCategory::Button => {
            let text = first_non_empty(&[&node.text, &node.value, &node.aria_label]).unwrap_or_default();
            let action = derive_action(&text).to_string();
            (text, ControlDetail::Button { action })
        }
        ControlCategory::Input => {
            let source =
                first_non_empty(&[&node.name, &node.placeholder, &node.id, &node.aria_label])
                    .unwrap_or_default();
            (
                source,
                ControlDetail::Input {
                    input_type: node.input_type.clone(),
                    validation: derive_validation(node).to_string(),
                },
            )
        }
        ControlCategory::Dropdown => {
            let source = first_non_empty(&[&node.name, &node.id, &node.aria_label]).unwrap_or_default();
            (
                source,
                ControlDetail::Dropdown {
                    options: node.options.clone(),
                },
            )
        }
        ControlCategory::Link => {
            let text = node.text.as_deref().map(str::trim).unwrap_or("");
            if text.is_empty() || text.contains("javascript:") {
                return None;
            }
            (
                text.to_string(),
                ControlDetail::Link {
                    href: node.href.clone(),
                },
            )
        }
        ControlCategory::Table => {
            let source = first_non_empty(&[&node.id]).unwrap_or_default();
            (
                source,
                ControlDetail::Table {
                    headers: node.headers.clone(),
                },
            )
        }
    };

    Some(ControlDescriptor {
        category,
        derived_name: derive_name(category, &raw_text),
        locator_hint: locator_hint(node),
        raw_text,
        detail,
    })
}

/// Category prefix plus the first 20 ASCII alphanumerics of `source`,
/// falling back to the category's default word.
pub fn derive_name(category: ControlCategory, source: &str) -> String {
    let body: String = source
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_NAME_BODY)
        .collect();

    if body.is_empty() {
        format!("{}{}", category.prefix(), category.default_word())
    } else {
        format!("{}{}", category.prefix(), body)
    }
}

/// Best-effort selector: id > name attribute > first class token > tag.
pub fn locator_hint(node: &NodeSnapshot) -> String {
    if let Some(id) = non_empty(&node.id) {
        return format!("#{}", id);
    }
    if let Some(name) = non_empty(&node.name) {
        return format!("[name=\"{}\"]", name);
    }
    if let Some(class) = node
        .class_name
        .as_deref()
        .and_then(|c| c.split_whitespace().next())
    {
        return format!(".{}", class);
    }
    node.tag.to_lowercase()
}

fn derive_action(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if lower.contains("login") || lower.contains("sign in") {
        "login"
    } else if lower.contains("submit") || lower.contains("send") {
        "submit"
    } else if lower.contains("search") {
        "search"
    } else {
        "click"
    }
}

fn derive_validation(node: &NodeSnapshot) -> &'static str {
    match node.input_type.as_deref() {
        Some("email") => "email format",
        Some("password") => "password strength",
        _ if node.required => "required field",
        _ => "standard validation",
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn first_non_empty(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| non_empty(c))
        .map(str::to_string)
}
