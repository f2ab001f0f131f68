use std::path::{Path, PathBuf};

use screen_synth::registry::registry::{
    ArtifactRegistry, ExistingArtifact, RegistryConfig, matches_analysis, missing_elements,
};
use screen_synth::registry::store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
use screen_synth::screen::analyzer::build_analysis;
use screen_synth::screen::classifier::classify;
use screen_synth::screen::screen_model::{ControlCategory, PageAnalysis};

use crate::common::{CHECKOUT_URL, button, input};

mod common;

// =========================================================================
// Helpers
// =========================================================================

fn existing(name: &str, content: &str) -> ExistingArtifact {
    ExistingArtifact {
        name: name.to_string(),
        path: PathBuf::from(format!("pageObjects/{}.js", name)),
        content: content.to_string(),
    }
}

fn analysis(url: &str, title: &str) -> PageAnalysis {
    let controls = vec![
        classify(ControlCategory::Button, &button("Login")).unwrap(),
        classify(ControlCategory::Input, &input("Email", "email")).unwrap(),
    ];
    build_analysis(url, title, controls, vec![])
}

// =========================================================================
// Matching heuristic
// =========================================================================

#[test]
fn address_in_content_matches_without_title_overlap() {
    let prior = existing("LegacyScreen", "// covers https://x/checkout\nclass LegacyScreen {}");
    assert!(matches_analysis(&prior, &analysis(CHECKOUT_URL, "Checkout")));
}

#[test]
fn path_in_content_matches() {
    let prior = existing("Legacy", "await page.goto(BASE + '/checkout');");
    assert!(matches_analysis(&prior, &analysis(CHECKOUT_URL, "Payments")));
}

#[test]
fn title_token_in_name_matches_without_address_overlap() {
    let prior = existing("CheckoutPage", "class CheckoutPage {}");
    assert!(matches_analysis(&prior, &analysis("https://other/pay", "Checkout - Step 2")));
}

#[test]
fn title_match_is_case_insensitive() {
    let prior = existing("checkoutpage", "");
    assert!(matches_analysis(&prior, &analysis("https://other/pay", "CHECKOUT")));
}

#[test]
fn unrelated_artifact_does_not_match() {
    let prior = existing("ProfilePage", "class ProfilePage { url = 'https://x/profile' }");
    assert!(!matches_analysis(&prior, &analysis(CHECKOUT_URL, "Checkout")));
}

#[test]
fn unrelated_pages_sharing_a_first_title_word_collide() {
    // Loose on purpose: "Account Settings" updates the "Account Login" artifact.
    let prior = existing("AccountLoginPage", "class AccountLoginPage {}");
    assert!(matches_analysis(&prior, &analysis("https://x/settings", "Account Settings")));
}

#[test]
fn short_title_token_matches_inside_longer_names() {
    let prior = existing("CartographyPage", "class CartographyPage {}");
    assert!(matches_analysis(&prior, &analysis("https://x/basket", "Cart")));
}

#[test]
fn empty_title_and_root_path_are_not_needles() {
    let prior = existing("AnythingPage", "import x from '/';");
    assert!(!matches_analysis(&prior, &analysis("https://x/", "")));
}

#[test]
fn find_existing_returns_first_match_in_scan_order() {
    let registry = ArtifactRegistry::from_entries(vec![
        existing("AlphaPage", "nothing"),
        existing("CheckoutPage", "class CheckoutPage {}"),
        existing("CheckoutPageV2", "class CheckoutPageV2 {}"),
    ]);

    let found = registry.find_existing(&analysis(CHECKOUT_URL, "Checkout")).unwrap();
    assert_eq!(found.name, "CheckoutPage");
}

#[test]
fn find_existing_on_empty_registry() {
    let registry = ArtifactRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.find_existing(&analysis(CHECKOUT_URL, "Checkout")).is_none());
}

// =========================================================================
// Delta
// =========================================================================

#[test]
fn delta_lists_names_absent_from_content() {
    let prior = existing("CheckoutPage", "this.btnLogin = page.locator('#login');");
    let delta = missing_elements(&prior, &analysis(CHECKOUT_URL, "Checkout"));
    assert_eq!(delta, vec!["inputEmail"]);
}

#[test]
fn delta_is_empty_when_all_names_present() {
    let prior = existing("CheckoutPage", "btnLogin inputEmail");
    assert!(missing_elements(&prior, &analysis(CHECKOUT_URL, "Checkout")).is_empty());
}

// =========================================================================
// Scanning
// =========================================================================

#[test]
fn scan_skips_excluded_names_and_other_extensions() {
    let store = MemoryArtifactStore::new()
        .with_file("pageObjects/LoginPage.js", "class LoginPage {}")
        .with_file("pageObjects/LoginTask.js", "class LoginTask {}")
        .with_file("pageObjects/notes.txt", "notes")
        .with_file("tests/loginpage.spec.js", "test()");

    let registry = ArtifactRegistry::scan(&store, &RegistryConfig::default()).unwrap();

    let names: Vec<&str> = registry.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["LoginPage"]);
    assert_eq!(registry.entries()[0].path, PathBuf::from("pageObjects/LoginPage.js"));
    assert_eq!(registry.entries()[0].content, "class LoginPage {}");
}

#[test]
fn scan_honours_custom_config() {
    let store = MemoryArtifactStore::new()
        .with_file("po/HomeScreen.ts", "class HomeScreen {}")
        .with_file("po/HomeDraft.ts", "class HomeDraft {}");
    let config = RegistryConfig {
        dir: "po".into(),
        extension: "ts".into(),
        exclude: vec!["Draft".into()],
    };

    let registry = ArtifactRegistry::scan(&store, &config).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.entries()[0].name, "HomeScreen");
}

#[test]
fn registry_config_yaml_defaults() {
    let config: RegistryConfig = serde_yaml::from_str("dir: screens").unwrap();
    assert_eq!(config.dir, "screens");
    assert_eq!(config.extension, "js");
    assert_eq!(config.exclude, vec!["Task"]);
}

// =========================================================================
// Filesystem store
// =========================================================================

#[test]
fn fs_store_round_trip_with_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(dir.path());

    let path = Path::new("Features/step_definitions/login.step.js");
    store.write(path, "Given").unwrap();

    assert!(dir.path().join(path).is_file());
    assert_eq!(store.read(path).unwrap().as_deref(), Some("Given"));
    assert_eq!(store.read(Path::new("missing.js")).unwrap(), None);
}

#[test]
fn fs_store_lists_sorted_names_and_feeds_scan() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsArtifactStore::new(dir.path());
    store.write(Path::new("pageObjects/ZetaPage.js"), "class ZetaPage {}").unwrap();
    store.write(Path::new("pageObjects/AlphaPage.js"), "class AlphaPage {}").unwrap();
    store.write(Path::new("pageObjects/BuildTask.js"), "class BuildTask {}").unwrap();
    std::fs::create_dir_all(dir.path().join("pageObjects/nested.js")).unwrap();

    assert_eq!(
        store.list(Path::new("pageObjects"), "js").unwrap(),
        vec!["AlphaPage", "BuildTask", "ZetaPage"]
    );

    let registry = ArtifactRegistry::scan(&store, &RegistryConfig::default()).unwrap();
    let names: Vec<&str> = registry.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["AlphaPage", "ZetaPage"]);
}

#[test]
fn fs_store_missing_dir_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsArtifactStore::new(dir.path());
    assert!(store.list(Path::new("pageObjects"), "js").unwrap().is_empty());
}
