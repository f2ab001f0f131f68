use std::fmt;

use crate::browser::surface::Locator;

/// What kind of control a cue is expected to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CueKind {
    Generic,
    InputField,
    Dropdown,
}

impl CueKind {
    /// The fixed, ordered strategy list for this kind.
    pub fn strategies(self) -> &'static [LookupStrategy] {
        match self {
            CueKind::Generic => GENERIC_STRATEGIES,
            CueKind::InputField => INPUT_FIELD_STRATEGIES,
            CueKind::Dropdown => DROPDOWN_STRATEGIES,
        }
    }
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CueKind::Generic => "element",
            CueKind::InputField => "input field",
            CueKind::Dropdown => "dropdown",
        };
        f.write_str(label)
    }
}

/// One lookup strategy. Each variant maps to a single `Locator` for a cue;
/// evaluation lives in the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStrategy {
    // Buttons
    ButtonRole,
    ButtonText,
    SubmitValue,
    ButtonValue,
    RoleButtonText,

    // Inputs
    Label,
    Placeholder,
    InputName,
    InputId,
    TextareaName,
    TextInputPlaceholder,
    EmailInputPlaceholder,
    PasswordInputPlaceholder,

    // Links
    LinkRole,
    LinkText,

    // Generic text and accessibility attributes
    InnermostText,
    AriaLabel,
    TitleAttr,
    AltAttr,

    // Dropdowns
    SelectName,
    SelectId,
    SelectLabel,
    ComboboxAria,
    ListboxAria,
}

const GENERIC_STRATEGIES: &[LookupStrategy] = &[
    LookupStrategy::ButtonRole,
    LookupStrategy::ButtonText,
    LookupStrategy::SubmitValue,
    LookupStrategy::ButtonValue,
    LookupStrategy::RoleButtonText,
    LookupStrategy::Label,
    LookupStrategy::Placeholder,
    LookupStrategy::InputName,
    LookupStrategy::InputId,
    LookupStrategy::TextareaName,
    LookupStrategy::LinkRole,
    LookupStrategy::LinkText,
    LookupStrategy::InnermostText,
    LookupStrategy::AriaLabel,
    LookupStrategy::TitleAttr,
    LookupStrategy::AltAttr,
];

const INPUT_FIELD_STRATEGIES: &[LookupStrategy] = &[
    LookupStrategy::Label,
    LookupStrategy::Placeholder,
    LookupStrategy::InputName,
    LookupStrategy::InputId,
    LookupStrategy::TextareaName,
    LookupStrategy::TextInputPlaceholder,
    LookupStrategy::EmailInputPlaceholder,
    LookupStrategy::PasswordInputPlaceholder,
];

const DROPDOWN_STRATEGIES: &[LookupStrategy] = &[
    LookupStrategy::SelectName,
    LookupStrategy::SelectId,
    LookupStrategy::SelectLabel,
    LookupStrategy::ComboboxAria,
    LookupStrategy::ListboxAria,
];

impl LookupStrategy {
    pub fn locator(self, cue: &str) -> Locator {
        match self {
            LookupStrategy::ButtonRole => role("button", cue),
            LookupStrategy::ButtonText => has_text("button", cue),
            LookupStrategy::SubmitValue => attr_contains(r#"input[type="submit"]"#, "value", cue),
            LookupStrategy::ButtonValue => attr_contains(r#"input[type="button"]"#, "value", cue),
            LookupStrategy::RoleButtonText => has_text(r#"[role="button"]"#, cue),

            LookupStrategy::Label => Locator::Label {
                text: cue.to_string(),
                tag: None,
            },
            LookupStrategy::Placeholder => Locator::Placeholder {
                text: cue.to_string(),
            },
            LookupStrategy::InputName => attr_contains("input", "name", cue),
            LookupStrategy::InputId => attr_contains("input", "id", cue),
            LookupStrategy::TextareaName => attr_contains("textarea", "name", cue),
            LookupStrategy::TextInputPlaceholder => {
                attr_contains(r#"input[type="text"]"#, "placeholder", cue)
            }
            LookupStrategy::EmailInputPlaceholder => {
                attr_contains(r#"input[type="email"]"#, "placeholder", cue)
            }
            LookupStrategy::PasswordInputPlaceholder => {
                attr_contains(r#"input[type="password"]"#, "placeholder", cue)
            }

            LookupStrategy::LinkRole => role("link", cue),
            LookupStrategy::LinkText => has_text("a", cue),

            LookupStrategy::InnermostText => {
                let quoted = quote(cue);
                Locator::css(format!(
                    r#"*:has-text("{q}"):not(:has(*:has-text("{q}")))"#,
                    q = quoted
                ))
            }
            LookupStrategy::AriaLabel => attr_contains("", "aria-label", cue),
            LookupStrategy::TitleAttr => attr_contains("", "title", cue),
            LookupStrategy::AltAttr => attr_contains("", "alt", cue),

            LookupStrategy::SelectName => attr_contains("select", "name", cue),
            LookupStrategy::SelectId => attr_contains("select", "id", cue),
            LookupStrategy::SelectLabel => Locator::Label {
                text: cue.to_string(),
                tag: Some("select".into()),
            },
            LookupStrategy::ComboboxAria => attr_contains(r#"[role="combobox"]"#, "aria-label", cue),
            LookupStrategy::ListboxAria => attr_contains(r#"[role="listbox"]"#, "aria-label", cue),
        }
    }
}

fn role(role: &str, cue: &str) -> Locator {
    Locator::Role {
        role: role.to_string(),
        name: cue.to_string(),
    }
}

fn has_text(base: &str, cue: &str) -> Locator {
    Locator::css(format!(r#"{}:has-text("{}")"#, base, quote(cue)))
}

/// Case-insensitive attribute substring match, e.g. `input[name*="email" i]`.
fn attr_contains(base: &str, attr: &str, cue: &str) -> Locator {
    Locator::css(format!(r#"{}[{}*="{}" i]"#, base, attr, quote(cue)))
}

/// Escape a cue for use inside a double-quoted selector string.
fn quote(cue: &str) -> String {
    cue.replace('\\', "\\\\").replace('"', "\\\"")
}
