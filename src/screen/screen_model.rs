use serde::{Deserialize, Serialize};

// ============================================================================
// Control categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCategory {
    Button,
    Input,
    Dropdown,
    Link,
    Table,
}

impl ControlCategory {
    /// Extraction order.
    pub const ALL: [ControlCategory; 5] = [
        ControlCategory::Button,
        ControlCategory::Input,
        ControlCategory::Dropdown,
        ControlCategory::Link,
        ControlCategory::Table,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            ControlCategory::Button => "btn",
            ControlCategory::Input => "input",
            ControlCategory::Dropdown => "dropdown",
            ControlCategory::Link => "lnk",
            ControlCategory::Table => "tbl",
        }
    }

    /// Name body used when the source text sanitizes to nothing.
    pub fn default_word(self) -> &'static str {
        match self {
            ControlCategory::Button => "Button",
            ControlCategory::Input => "Input",
            ControlCategory::Dropdown => "Select",
            ControlCategory::Link => "Link",
            ControlCategory::Table => "Data",
        }
    }

    /// Selector enumerating every node of this category.
    pub fn selector(self) -> &'static str {
        match self {
            ControlCategory::Button => {
                r#"button, input[type="button"], input[type="submit"], [role="button"]"#
            }
            ControlCategory::Input => "input, textarea",
            ControlCategory::Dropdown => r#"select, [role="combobox"], [role="listbox"]"#,
            ControlCategory::Link => "a[href]",
            ControlCategory::Table => r#"table, [role="table"]"#,
        }
    }
}

// ============================================================================
// Control descriptors
// ============================================================================

/// Category-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlDetail {
    Button { action: String },
    Input { input_type: Option<String>, validation: String },
    Dropdown { options: Vec<String> },
    Link { href: Option<String> },
    Table { headers: Vec<String> },
}

/// One discovered interactive control.
///
/// `derived_name` is always `prefix + body` where body is 1..=20 ASCII
/// alphanumerics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDescriptor {
    pub category: ControlCategory,
    pub raw_text: String,
    pub derived_name: String,
    pub locator_hint: String,
    pub detail: ControlDetail,
}

impl ControlDescriptor {
    pub fn name_lower(&self) -> String {
        self.derived_name.to_lowercase()
    }

    pub fn input_type(&self) -> Option<&str> {
        match &self.detail {
            ControlDetail::Input { input_type, .. } => input_type.as_deref(),
            _ => None,
        }
    }

    /// The derived name without its category prefix.
    pub fn name_body(&self) -> &str {
        self.derived_name
            .strip_prefix(self.category.prefix())
            .unwrap_or(&self.derived_name)
    }
}

// ============================================================================
// Page-level signals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSignal {
    React,
    Angular,
    Vue,
    Jquery,
    Bootstrap,
    Material,
    Ecommerce,
    Form,
    Dashboard,
}

impl PlatformSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformSignal::React => "react",
            PlatformSignal::Angular => "angular",
            PlatformSignal::Vue => "vue",
            PlatformSignal::Jquery => "jquery",
            PlatformSignal::Bootstrap => "bootstrap",
            PlatformSignal::Material => "material",
            PlatformSignal::Ecommerce => "ecommerce",
            PlatformSignal::Form => "form",
            PlatformSignal::Dashboard => "dashboard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusinessTag {
    Authentication,
    Ecommerce,
    Forms,
    Navigation,
    DataDisplay,
    Search,
}

impl BusinessTag {
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessTag::Authentication => "authentication",
            BusinessTag::Ecommerce => "ecommerce",
            BusinessTag::Forms => "forms",
            BusinessTag::Navigation => "navigation",
            BusinessTag::DataDisplay => "dataDisplay",
            BusinessTag::Search => "search",
        }
    }
}

/// A usage scenario inferred from co-occurring controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub name: String,
    pub steps: Vec<String>,
    pub positive_case: String,
    pub negative_case: String,
}

// ============================================================================
// Page analysis
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub url: String,
    pub title: String,
    pub controls: Vec<ControlDescriptor>,
    pub platform: Vec<PlatformSignal>,
    pub business_logic: Vec<BusinessTag>,
    pub workflows: Vec<Workflow>,
    pub page_name: String,
}

impl PageAnalysis {
    pub fn element_names(&self) -> Vec<&str> {
        self.controls.iter().map(|c| c.derived_name.as_str()).collect()
    }

    /// Comma-joined element names, as handed to the generator.
    pub fn joined_element_names(&self) -> String {
        self.element_names().join(",")
    }

    pub fn joined_platform(&self) -> String {
        self.platform
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn joined_business_logic(&self) -> String {
        self.business_logic
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `navigate,waitForLoad` followed by one verb per actionable control.
    pub fn page_actions(&self) -> String {
        let mut actions = vec!["navigate".to_string(), "waitForLoad".to_string()];

        for control in &self.controls {
            let verb = match control.category {
                ControlCategory::Button => "click",
                ControlCategory::Input => "fill",
                ControlCategory::Dropdown => "select",
                ControlCategory::Link | ControlCategory::Table => continue,
            };
            actions.push(format!("{}{}", verb, control.name_body()));
        }

        actions.join(",")
    }

    /// Positive then negative case of every workflow, comma-joined.
    pub fn scenarios(&self) -> String {
        self.workflows
            .iter()
            .flat_map(|w| [w.positive_case.as_str(), w.negative_case.as_str()])
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Path component of the source address, if it parses.
    pub fn path(&self) -> Option<String> {
        url::Url::parse(&self.url).ok().map(|u| u.path().to_string())
    }
}
