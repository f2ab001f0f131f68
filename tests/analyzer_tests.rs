use screen_synth::browser::surface::{Locator, NodeSnapshot, StaticSurface};
use screen_synth::error::SynthError;
use screen_synth::screen::analyzer::{SurfaceAnalyzer, build_analysis, derive_page_name};
use screen_synth::screen::classifier::{classify, derive_name, extract_controls, locator_hint};
use screen_synth::screen::intent::{infer_business_logic, infer_workflows};
use screen_synth::screen::platform::detect_platform;
use screen_synth::screen::screen_model::{
    BusinessTag, ControlCategory, ControlDescriptor, ControlDetail, PlatformSignal,
};

use crate::common::{CHECKOUT_URL, button, category, checkout_surface, input};

mod common;

// =========================================================================
// Helpers
// =========================================================================

fn control(category: ControlCategory, name: &str) -> ControlDescriptor {
    ControlDescriptor {
        category,
        raw_text: name.to_string(),
        derived_name: name.to_string(),
        locator_hint: String::new(),
        detail: match category {
            ControlCategory::Button => ControlDetail::Button {
                action: "click".into(),
            },
            ControlCategory::Input => ControlDetail::Input {
                input_type: None,
                validation: "standard validation".into(),
            },
            ControlCategory::Dropdown => ControlDetail::Dropdown { options: vec![] },
            ControlCategory::Link => ControlDetail::Link { href: None },
            ControlCategory::Table => ControlDetail::Table { headers: vec![] },
        },
    }
}

fn controls(names: &[(ControlCategory, &str)]) -> Vec<ControlDescriptor> {
    names.iter().map(|(c, n)| control(*c, n)).collect()
}

fn workflow_names(controls: &[ControlDescriptor]) -> Vec<String> {
    infer_workflows(controls).into_iter().map(|w| w.name).collect()
}

// =========================================================================
// Naming
// =========================================================================

#[test]
fn derived_name_invariants_hold_for_awkward_input() {
    let long = "x".repeat(200);
    let samples = ["", "   ", "!!!@@@", "Sign in", "ünïcödé", "a-b_c.d", long.as_str()];

    for category in ControlCategory::ALL {
        for sample in samples {
            let name = derive_name(category, sample);
            let prefix = category.prefix();

            assert!(name.starts_with(prefix), "{} lacks prefix {}", name, prefix);
            assert!(name.len() > prefix.len(), "{} has empty body", name);
            assert!(name.len() <= prefix.len() + 20, "{} too long", name);
            assert!(name[prefix.len()..].chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}

#[test]
fn derived_name_keeps_alphanumerics_in_order() {
    assert_eq!(derive_name(ControlCategory::Button, "Add To Cart"), "btnAddToCart");
    assert_eq!(derive_name(ControlCategory::Input, "user_email"), "inputuseremail");
    assert_eq!(derive_name(ControlCategory::Link, "Home!"), "lnkHome");
}

#[test]
fn derived_name_falls_back_to_category_word() {
    assert_eq!(derive_name(ControlCategory::Button, ""), "btnButton");
    assert_eq!(derive_name(ControlCategory::Input, "***"), "inputInput");
    assert_eq!(derive_name(ControlCategory::Dropdown, ""), "dropdownSelect");
    assert_eq!(derive_name(ControlCategory::Link, " "), "lnkLink");
    assert_eq!(derive_name(ControlCategory::Table, ""), "tblData");
}

#[test]
fn derived_name_body_is_capped_at_twenty() {
    let name = derive_name(ControlCategory::Input, "abcdefghijklmnopqrstuvwxyz");
    assert_eq!(name, "inputabcdefghijklmnopqrst");
}

// =========================================================================
// Classification
// =========================================================================

#[test]
fn button_source_falls_back_from_text_to_value_to_aria_label() {
    let by_value = classify(
        ControlCategory::Button,
        &NodeSnapshot::new("input").with_value("Send it"),
    )
    .unwrap();
    assert_eq!(by_value.derived_name, "btnSendit");
    assert_eq!(
        by_value.detail,
        ControlDetail::Button {
            action: "submit".into()
        }
    );

    let by_aria = classify(
        ControlCategory::Button,
        &NodeSnapshot::new("button").with_aria_label("Close"),
    )
    .unwrap();
    assert_eq!(by_aria.derived_name, "btnClose");
}

#[test]
fn button_action_follows_text() {
    let action = |text: &str| match classify(ControlCategory::Button, &button(text)).unwrap().detail {
        ControlDetail::Button { action } => action,
        other => panic!("unexpected detail {:?}", other),
    };

    assert_eq!(action("Sign in"), "login");
    assert_eq!(action("Submit order"), "submit");
    assert_eq!(action("Search"), "search");
    assert_eq!(action("Next"), "click");
}

#[test]
fn input_validation_class_by_type_then_required() {
    let validation = |node: NodeSnapshot| match classify(ControlCategory::Input, &node).unwrap().detail {
        ControlDetail::Input { validation, .. } => validation,
        other => panic!("unexpected detail {:?}", other),
    };

    assert_eq!(validation(input("mail", "email")), "email format");
    assert_eq!(validation(input("pw", "password").required()), "password strength");
    assert_eq!(validation(input("zip", "text").required()), "required field");
    assert_eq!(validation(input("note", "text")), "standard validation");
}

#[test]
fn input_source_prefers_name_then_placeholder_then_id() {
    let by_placeholder = classify(
        ControlCategory::Input,
        &NodeSnapshot::new("input").with_placeholder("First name").with_id("fn"),
    )
    .unwrap();
    assert_eq!(by_placeholder.derived_name, "inputFirstname");

    let by_id = classify(ControlCategory::Input, &NodeSnapshot::new("input").with_id("zip")).unwrap();
    assert_eq!(by_id.derived_name, "inputzip");
}

#[test]
fn links_without_usable_text_are_skipped() {
    assert!(classify(ControlCategory::Link, &NodeSnapshot::new("a").with_href("/x")).is_none());
    assert!(classify(
        ControlCategory::Link,
        &NodeSnapshot::new("a").with_text("javascript:void(0)")
    )
    .is_none());

    let kept = classify(
        ControlCategory::Link,
        &NodeSnapshot::new("a").with_text("Help").with_href("/help"),
    )
    .unwrap();
    assert_eq!(kept.derived_name, "lnkHelp");
}

#[test]
fn dropdown_keeps_option_labels() {
    let select = classify(
        ControlCategory::Dropdown,
        &NodeSnapshot::new("select")
            .with_name("country")
            .with_options(&["France", "Peru"]),
    )
    .unwrap();

    assert_eq!(select.derived_name, "dropdowncountry");
    assert_eq!(
        select.detail,
        ControlDetail::Dropdown {
            options: vec!["France".into(), "Peru".into()]
        }
    );
}

#[test]
fn locator_hint_prefers_id_then_name_then_class() {
    assert_eq!(locator_hint(&NodeSnapshot::new("input").with_id("q").with_name("n")), "#q");
    assert_eq!(locator_hint(&NodeSnapshot::new("input").with_name("n")), "[name=\"n\"]");
    assert_eq!(locator_hint(&NodeSnapshot::new("div").with_class("btn primary")), ".btn");
    assert_eq!(locator_hint(&NodeSnapshot::new("BUTTON")), "button");
}

#[test]
fn extraction_walks_categories_in_order() {
    let mut surface = checkout_surface().with_nodes(
        category(ControlCategory::Table),
        vec![NodeSnapshot::new("table").with_id("orders").with_headers(&["Id", "Total"])],
    );

    let found = extract_controls(&mut surface).unwrap();
    let names: Vec<&str> = found.iter().map(|c| c.derived_name.as_str()).collect();

    assert_eq!(
        names,
        vec!["btnLogin", "btnAddToCart", "inputEmail", "inputPassword", "tblorders"]
    );
}

// =========================================================================
// Business logic and workflows
// =========================================================================

#[test]
fn authentication_workflow_needs_email_and_password() {
    let with_both = controls(&[
        (ControlCategory::Input, "inputEmail"),
        (ControlCategory::Input, "inputPassword"),
        (ControlCategory::Button, "btnSubmit"),
    ]);
    assert!(workflow_names(&with_both).contains(&"Authentication".to_string()));

    let email_only = controls(&[
        (ControlCategory::Input, "inputEmail"),
        (ControlCategory::Button, "btnSubmit"),
    ]);
    assert!(!workflow_names(&email_only).contains(&"Authentication".to_string()));

    let password_only = controls(&[(ControlCategory::Input, "inputPassword")]);
    assert!(!workflow_names(&password_only).contains(&"Authentication".to_string()));
}

#[test]
fn workflows_are_independent_and_ordered() {
    let all = controls(&[
        (ControlCategory::Input, "inputEmail"),
        (ControlCategory::Input, "inputPassword"),
        (ControlCategory::Button, "btnAddToCart"),
    ]);
    assert_eq!(
        workflow_names(&all),
        vec!["Authentication", "Form Submission", "Shopping"]
    );

    let none = controls(&[(ControlCategory::Link, "lnkHome")]);
    assert!(workflow_names(&none).is_empty());
}

#[test]
fn authentication_workflow_cases() {
    let flows = infer_workflows(&controls(&[
        (ControlCategory::Input, "inputEmail"),
        (ControlCategory::Input, "inputPassword"),
    ]));

    let auth = &flows[0];
    assert_eq!(auth.steps, vec!["Enter credentials", "Submit form", "Verify redirect"]);
    assert_eq!(auth.positive_case, "Valid login with correct credentials");
    assert_eq!(auth.negative_case, "Invalid credentials, empty fields, SQL injection");
}

#[test]
fn business_logic_tags_in_declaration_order() {
    let tags = infer_business_logic(&controls(&[
        (ControlCategory::Input, "inputsearch"),
        (ControlCategory::Input, "inputEmail"),
        (ControlCategory::Input, "inputName"),
        (ControlCategory::Button, "btnCheckout"),
        (ControlCategory::Table, "tblorders"),
    ]));

    assert_eq!(
        tags,
        vec![
            BusinessTag::Authentication,
            BusinessTag::Ecommerce,
            BusinessTag::Forms,
            BusinessTag::DataDisplay,
            BusinessTag::Search,
        ]
    );
}

#[test]
fn navigation_needs_more_than_three_links() {
    let three = controls(&[
        (ControlCategory::Link, "lnkA"),
        (ControlCategory::Link, "lnkB"),
        (ControlCategory::Link, "lnkC"),
    ]);
    assert!(!infer_business_logic(&three).contains(&BusinessTag::Navigation));

    let mut four = three;
    four.push(control(ControlCategory::Link, "lnkD"));
    assert!(infer_business_logic(&four).contains(&BusinessTag::Navigation));
}

#[test]
fn business_tag_labels() {
    assert_eq!(BusinessTag::DataDisplay.as_str(), "dataDisplay");
    assert_eq!(BusinessTag::Authentication.as_str(), "authentication");
}

// =========================================================================
// Platform detection
// =========================================================================

#[test]
fn platform_signals_from_globals_and_selectors() {
    let mut surface = StaticSurface::new("https://x", "X")
        .with_global("jQuery")
        .with_nodes(Locator::css("form"), vec![NodeSnapshot::new("form")])
        .with_nodes(
            Locator::css("[data-reactroot]"),
            vec![NodeSnapshot::new("div")],
        );

    let signals = detect_platform(&mut surface).unwrap();
    assert_eq!(
        signals,
        vec![PlatformSignal::React, PlatformSignal::Jquery, PlatformSignal::Form]
    );
}

#[test]
fn platform_detection_propagates_faults() {
    let mut surface = StaticSurface::new("https://x", "X").with_fault("page crashed");
    let err = detect_platform(&mut surface).unwrap_err();
    assert!(matches!(err, SynthError::Extraction(_)));
}

// =========================================================================
// Page naming and full analysis
// =========================================================================

#[test]
fn page_name_from_first_title_token() {
    assert_eq!(derive_page_name("Checkout - Shop", "https://x/checkout"), "CheckoutPage");
    assert_eq!(derive_page_name("My-Account area", "https://x/"), "MyAccountPage");
}

#[test]
fn page_name_falls_back_to_path_then_home() {
    assert_eq!(derive_page_name("", "https://x/orders/42"), "ordersPage");
    assert_eq!(derive_page_name("", "https://x/"), "HomePage");
    assert_eq!(derive_page_name("", "https://x/---/checkout"), "checkoutPage");
    assert_eq!(derive_page_name("???", "not a url"), "HomePage");
}

#[test]
fn analyze_checkout_surface() {
    let mut surface = checkout_surface();
    surface.address = CHECKOUT_URL.to_string();

    let analysis = SurfaceAnalyzer.analyze(&mut surface).unwrap();

    assert_eq!(analysis.page_name, "CheckoutPage");
    assert_eq!(analysis.url, CHECKOUT_URL);
    assert_eq!(
        analysis.element_names(),
        vec!["btnLogin", "btnAddToCart", "inputEmail", "inputPassword"]
    );
    assert_eq!(
        analysis.business_logic,
        vec![BusinessTag::Authentication, BusinessTag::Ecommerce]
    );
    assert_eq!(
        analysis.workflows.iter().map(|w| w.name.as_str()).collect::<Vec<_>>(),
        vec!["Authentication", "Form Submission", "Shopping"]
    );
    assert_eq!(
        analysis.page_actions(),
        "navigate,waitForLoad,clickLogin,clickAddToCart,fillEmail,fillPassword"
    );
    assert_eq!(analysis.path().as_deref(), Some("/checkout"));
}

#[test]
fn analyze_surfaces_extraction_fault() {
    let mut surface = checkout_surface().with_fault("navigation failed");
    let err = SurfaceAnalyzer.analyze(&mut surface).unwrap_err();
    assert!(matches!(err, SynthError::Extraction(m) if m == "navigation failed"));
}

#[test]
fn scenarios_join_positive_then_negative_cases() {
    let analysis = build_analysis(
        "https://x/cart",
        "Cart",
        controls(&[(ControlCategory::Button, "btnAddToCart")]),
        vec![],
    );

    assert_eq!(
        analysis.scenarios(),
        "Complete purchase flow, Empty cart, invalid payment, out of stock"
    );
}
