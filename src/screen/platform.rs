use crate::browser::surface::{Locator, Surface};
use crate::error::Result;
use crate::screen::screen_model::PlatformSignal;

/// A single presence check against the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// A truthy `window` global
    Global(&'static str),
    /// At least one node matches the selector
    Selector(&'static str),
}

/// Indicator table. An indicator holds when any of its probes holds; probes
/// are checked left to right and stop at the first hit.
pub const INDICATORS: &[(PlatformSignal, &[Probe])] = &[
    (
        PlatformSignal::React,
        &[Probe::Global("React"), Probe::Selector("[data-reactroot]")],
    ),
    (
        PlatformSignal::Angular,
        &[Probe::Global("angular"), Probe::Selector("[ng-app]")],
    ),
    (
        PlatformSignal::Vue,
        &[Probe::Global("Vue"), Probe::Selector("[data-v-]")],
    ),
    (
        PlatformSignal::Jquery,
        &[Probe::Global("jQuery"), Probe::Global("$")],
    ),
    (
        PlatformSignal::Bootstrap,
        &[Probe::Selector(".container, .row, .col-")],
    ),
    (PlatformSignal::Material, &[Probe::Selector(".mat-")]),
    (
        PlatformSignal::Ecommerce,
        &[Probe::Selector(".cart, .checkout, .product")],
    ),
    (PlatformSignal::Form, &[Probe::Selector("form")]),
    (
        PlatformSignal::Dashboard,
        &[Probe::Selector(".dashboard, .sidebar, .nav")],
    ),
];

/// Platform signals present on the surface, in indicator-table order.
pub fn detect_platform<S: Surface + ?Sized>(surface: &mut S) -> Result<Vec<PlatformSignal>> {
    let mut detected = Vec::new();

    for (signal, probes) in INDICATORS {
        for probe in *probes {
            if probe_holds(surface, *probe)? {
                detected.push(*signal);
                break;
            }
        }
    }

    Ok(detected)
}

fn probe_holds<S: Surface + ?Sized>(surface: &mut S, probe: Probe) -> Result<bool> {
    match probe {
        Probe::Global(name) => surface.has_global(name),
        Probe::Selector(selector) => Ok(!surface.query_all(&Locator::css(selector), None)?.is_empty()),
    }
}
