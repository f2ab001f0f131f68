use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

// ============================================================================
// Locator descriptions
// ============================================================================

/// A pure description of a DOM lookup, evaluated by the browser side.
///
/// `Role`, `Label` and `Placeholder` text is matched as a case-insensitive
/// pattern (Playwright `getByRole` / `getByLabel` / `getByPlaceholder`);
/// `Css` is passed through as a Playwright selector, so `:has-text()` and
/// the `i` attribute flag are available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    Role {
        role: String,
        name: String,
    },
    Label {
        text: String,
        /// Restrict label matches to this tag (e.g. `select`)
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },
    Placeholder {
        text: String,
    },
    Css {
        selector: String,
    },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Locator::Role { role, name } => format!("role={}[name=/{}/i]", role, name),
            Locator::Label { text, tag: Some(tag) } => format!("label=/{}/i >> {}", text, tag),
            Locator::Label { text, tag: None } => format!("label=/{}/i", text),
            Locator::Placeholder { text } => format!("placeholder=/{}/i", text),
            Locator::Css { selector } => selector.clone(),
        }
    }
}

// ============================================================================
// Node snapshots and handles
// ============================================================================

/// Attributes of one DOM node, as reported by the browser helper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSnapshot {
    pub tag: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub text: Option<String>,
    pub value: Option<String>,
    pub aria_label: Option<String>,
    pub placeholder: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub required: bool,
    pub href: Option<String>,
    pub options: Vec<String>,
    pub headers: Vec<String>,
    /// Attached but not rendered (display:none, zero size, ...)
    pub hidden: bool,
}

impl NodeSnapshot {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_aria_label(mut self, label: &str) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_type(mut self, input_type: &str) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|h| h.to_string()).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A resolved element: the locator that found it plus its position in the
/// match set. Actions are replayed against `locator` at `index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementHandle {
    pub locator: Locator,
    pub index: usize,
    #[serde(skip)]
    pub node: NodeSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    Attached,
    Visible,
    Hidden,
}

// ============================================================================
// Surface trait
// ============================================================================

/// A rendered, interactive surface driven through a single session.
///
/// Implementations are not expected to be thread-safe: every method takes
/// `&mut self`, so only one control-level operation can be in flight.
pub trait Surface {
    fn navigate(&mut self, address: &str) -> Result<()>;

    /// Wait until network and content have settled.
    fn wait_settled(&mut self) -> Result<()>;

    fn title(&mut self) -> Result<String>;

    fn current_url(&mut self) -> Result<String>;

    /// All nodes matching `locator`, in document order. With `wait_ms`, the
    /// browser waits up to that long for the first match to become visible
    /// and reports a timeout as an error.
    fn query_all(&mut self, locator: &Locator, wait_ms: Option<u64>) -> Result<Vec<NodeSnapshot>>;

    /// Whether a `window` global with this name is defined and truthy.
    fn has_global(&mut self, name: &str) -> Result<bool>;

    fn click(&mut self, handle: &ElementHandle) -> Result<()>;

    fn fill(&mut self, handle: &ElementHandle, value: &str) -> Result<()>;

    fn select_option(&mut self, handle: &ElementHandle, label: &str) -> Result<()>;

    fn hover(&mut self, handle: &ElementHandle) -> Result<()>;

    fn wait_for_state(
        &mut self,
        handle: &ElementHandle,
        state: ElementState,
        timeout_ms: u64,
    ) -> Result<()>;

    /// Tear down the underlying session. Must be safe to call more than once.
    fn release(&mut self) -> Result<()>;
}

// ============================================================================
// StaticSurface: scripted, in-memory (for testing without a browser)
// ============================================================================

/// In-memory surface with canned query results.
///
/// Every query and interaction is recorded so callers can assert on the
/// exact lookup order.
#[derive(Debug, Default)]
pub struct StaticSurface {
    pub address: String,
    pub page_title: String,
    pub nodes: HashMap<Locator, Vec<NodeSnapshot>>,
    pub failing: HashSet<Locator>,
    pub globals: HashSet<String>,
    pub fault: Option<String>,
    pub query_log: Vec<Locator>,
    pub interactions: Vec<String>,
    pub navigations: Vec<String>,
    pub released: bool,
}

impl StaticSurface {
    pub fn new(address: &str, title: &str) -> Self {
        Self {
            address: address.to_string(),
            page_title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn with_nodes(mut self, locator: Locator, nodes: Vec<NodeSnapshot>) -> Self {
        self.nodes.entry(locator).or_default().extend(nodes);
        self
    }

    /// Make queries for `locator` fail as if the selector were invalid or timed out.
    pub fn with_failure(mut self, locator: Locator) -> Self {
        self.failing.insert(locator);
        self
    }

    pub fn with_global(mut self, name: &str) -> Self {
        self.globals.insert(name.to_string());
        self
    }

    /// Make every DOM query fail with an extraction fault.
    pub fn with_fault(mut self, message: &str) -> Self {
        self.fault = Some(message.to_string());
        self
    }

    fn record(&mut self, verb: &str, handle: &ElementHandle, extra: Option<&str>) {
        let entry = match extra {
            Some(extra) => format!("{}:{}#{}={}", verb, handle.locator.describe(), handle.index, extra),
            None => format!("{}:{}#{}", verb, handle.locator.describe(), handle.index),
        };
        self.interactions.push(entry);
    }
}

impl Surface for StaticSurface {
    fn navigate(&mut self, address: &str) -> Result<()> {
        self.navigations.push(address.to_string());
        self.address = address.to_string();
        Ok(())
    }

    fn wait_settled(&mut self) -> Result<()> {
        Ok(())
    }

    fn title(&mut self) -> Result<String> {
        Ok(self.page_title.clone())
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.address.clone())
    }

    fn query_all(&mut self, locator: &Locator, wait_ms: Option<u64>) -> Result<Vec<NodeSnapshot>> {
        self.query_log.push(locator.clone());

        if let Some(message) = &self.fault {
            return Err(SynthError::Extraction(message.clone()));
        }

        if self.failing.contains(locator) {
            return Err(SynthError::SessionProtocol {
                command: "query_all".into(),
                error: format!("Timeout {}ms exceeded waiting for {}", wait_ms.unwrap_or(0), locator.describe()),
            });
        }

        let found = self.nodes.get(locator).cloned().unwrap_or_default();
        let first_visible = found.first().is_some_and(|n| !n.hidden);
        if wait_ms.is_some() && !first_visible {
            return Err(SynthError::SessionProtocol {
                command: "query_all".into(),
                error: format!("Timeout {}ms exceeded waiting for {}", wait_ms.unwrap_or(0), locator.describe()),
            });
        }
        Ok(found)
    }

    fn has_global(&mut self, name: &str) -> Result<bool> {
        if let Some(message) = &self.fault {
            return Err(SynthError::Extraction(message.clone()));
        }
        Ok(self.globals.contains(name))
    }

    fn click(&mut self, handle: &ElementHandle) -> Result<()> {
        self.record("click", handle, None);
        Ok(())
    }

    fn fill(&mut self, handle: &ElementHandle, value: &str) -> Result<()> {
        self.record("fill", handle, Some(value));
        Ok(())
    }

    fn select_option(&mut self, handle: &ElementHandle, label: &str) -> Result<()> {
        self.record("select", handle, Some(label));
        Ok(())
    }

    fn hover(&mut self, handle: &ElementHandle) -> Result<()> {
        self.record("hover", handle, None);
        Ok(())
    }

    fn wait_for_state(
        &mut self,
        handle: &ElementHandle,
        state: ElementState,
        _timeout_ms: u64,
    ) -> Result<()> {
        let state = format!("{:?}", state).to_lowercase();
        self.record("wait", handle, Some(&state));
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.released = true;
        Ok(())
    }
}
