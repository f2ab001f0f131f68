#![allow(dead_code)]

use std::sync::Arc;

use screen_synth::browser::surface::{Locator, NodeSnapshot, StaticSurface};
use screen_synth::orchestrator::Orchestrator;
use screen_synth::registry::reconciler::Reconciler;
use screen_synth::registry::registry::RegistryConfig;
use screen_synth::registry::store::MemoryArtifactStore;
use screen_synth::screen::screen_model::ControlCategory;
use screen_synth::synth::artifact::ArtifactLayout;
use screen_synth::synth::generator::MockGenerator;
use screen_synth::synth::synthesizer::Synthesizer;
use screen_synth::trace::logger::TraceLogger;

pub const CHECKOUT_URL: &str = "https://x/checkout";

pub fn category(category: ControlCategory) -> Locator {
    Locator::css(category.selector())
}

pub fn button(text: &str) -> NodeSnapshot {
    NodeSnapshot::new("button").with_text(text)
}

pub fn input(name: &str, input_type: &str) -> NodeSnapshot {
    NodeSnapshot::new("input").with_name(name).with_type(input_type)
}

/// Title "Checkout" with Email/Password inputs and Login/Add To Cart buttons.
pub fn checkout_surface() -> StaticSurface {
    StaticSurface::new("about:blank", "Checkout")
        .with_nodes(
            category(ControlCategory::Button),
            vec![button("Login"), button("Add To Cart")],
        )
        .with_nodes(
            category(ControlCategory::Input),
            vec![input("Email", "email"), input("Password", "password")],
        )
}

pub fn reconciler_with(generator: Arc<MockGenerator>) -> Reconciler {
    Reconciler::new(Synthesizer::new(generator), ArtifactLayout::default())
}

pub fn orchestrator_with(
    generator: Arc<MockGenerator>,
    store: MemoryArtifactStore,
) -> Orchestrator<MemoryArtifactStore> {
    Orchestrator::new(
        reconciler_with(generator),
        store,
        RegistryConfig::default(),
        TraceLogger::disabled(),
    )
    .unwrap()
}
