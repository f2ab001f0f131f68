use crate::screen::screen_model::{BusinessTag, ControlCategory, ControlDescriptor, Workflow};

fn any_name_contains(controls: &[ControlDescriptor], needles: &[&str]) -> bool {
    controls.iter().any(|c| {
        let name = c.name_lower();
        needles.iter().any(|n| name.contains(n))
    })
}

fn count_of(controls: &[ControlDescriptor], category: ControlCategory) -> usize {
    controls.iter().filter(|c| c.category == category).count()
}

/// Business-logic tags whose predicate holds, in declaration order.
pub fn infer_business_logic(controls: &[ControlDescriptor]) -> Vec<BusinessTag> {
    let predicates = [
        (
            BusinessTag::Authentication,
            any_name_contains(controls, &["login", "password", "email"]),
        ),
        (
            BusinessTag::Ecommerce,
            any_name_contains(controls, &["cart", "buy", "checkout"]),
        ),
        (
            BusinessTag::Forms,
            count_of(controls, ControlCategory::Input) > 2,
        ),
        (
            BusinessTag::Navigation,
            count_of(controls, ControlCategory::Link) > 3,
        ),
        (
            BusinessTag::DataDisplay,
            controls.iter().any(|c| c.category == ControlCategory::Table),
        ),
        (
            BusinessTag::Search,
            controls
                .iter()
                .any(|c| c.name_lower().contains("search") || c.input_type() == Some("search")),
        ),
    ];

    predicates
        .into_iter()
        .filter_map(|(tag, holds)| holds.then_some(tag))
        .collect()
}

/// Workflows inferred from the control set, in rule declaration order.
///
/// Rules are independent: a page can yield anywhere from zero to three.
pub fn infer_workflows(controls: &[ControlDescriptor]) -> Vec<Workflow> {
    let mut workflows = Vec::new();

    if any_name_contains(controls, &["email"]) && any_name_contains(controls, &["password"]) {
        workflows.push(workflow(
            "Authentication",
            &["Enter credentials", "Submit form", "Verify redirect"],
            "Valid login with correct credentials",
            "Invalid credentials, empty fields, SQL injection",
        ));
    }

    if count_of(controls, ControlCategory::Input) > 0 {
        workflows.push(workflow(
            "Form Submission",
            &["Fill required fields", "Validate inputs", "Submit form"],
            "Valid data submission",
            "Invalid data, missing required fields, boundary values",
        ));
    }

    if any_name_contains(controls, &["cart"]) {
        workflows.push(workflow(
            "Shopping",
            &["Add to cart", "View cart", "Checkout", "Payment"],
            "Complete purchase flow",
            "Empty cart, invalid payment, out of stock",
        ));
    }

    workflows
}

fn workflow(name: &str, steps: &[&str], positive: &str, negative: &str) -> Workflow {
    Workflow {
        name: name.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        positive_case: positive.to_string(),
        negative_case: negative.to_string(),
    }
}
