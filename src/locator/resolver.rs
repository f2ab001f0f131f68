use tracing::{debug, info};

use crate::browser::surface::{ElementHandle, ElementState, Surface};
use crate::error::{Result, SynthError};

use super::strategy::CueKind;

pub const DEFAULT_STRATEGY_WAIT_MS: u64 = 2000;

/// Locates a control by a human-readable cue.
///
/// Strategies for the cue's kind are tried strictly in declared order; the
/// first one whose match set is non-empty within `strategy_wait_ms` wins and
/// its first element is returned. A strategy that errors (bad selector,
/// timeout) counts as no match.
#[derive(Debug, Clone)]
pub struct Resolver {
    pub strategy_wait_ms: u64,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            strategy_wait_ms: DEFAULT_STRATEGY_WAIT_MS,
        }
    }
}

impl Resolver {
    pub fn new(strategy_wait_ms: u64) -> Self {
        Self { strategy_wait_ms }
    }

    pub fn resolve<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        cue: &str,
        kind: CueKind,
    ) -> Result<ElementHandle> {
        for strategy in kind.strategies() {
            let locator = strategy.locator(cue);

            match surface.query_all(&locator, Some(self.strategy_wait_ms)) {
                Ok(nodes) => {
                    if let Some(node) = nodes.into_iter().next() {
                        debug!(cue, ?strategy, "resolved");
                        return Ok(ElementHandle {
                            locator,
                            index: 0,
                            node,
                        });
                    }
                }
                Err(e) => {
                    debug!(cue, ?strategy, error = %e, "strategy produced no match");
                }
            }
        }

        Err(SynthError::ResolutionExhausted {
            cue: cue.to_string(),
            kind: kind.to_string(),
        })
    }

    // ------------------------------------------------------------------------
    // Cue-driven interactions
    // ------------------------------------------------------------------------

    pub fn click<S: Surface + ?Sized>(&self, surface: &mut S, cue: &str) -> Result<()> {
        let handle = self.resolve(surface, cue, CueKind::Generic)?;
        surface.click(&handle)?;
        info!("Clicked on: {}", cue);
        Ok(())
    }

    pub fn type_into<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &str,
        text: &str,
    ) -> Result<()> {
        let handle = self.resolve(surface, field, CueKind::InputField)?;
        surface.fill(&handle, text)?;
        info!("Typed \"{}\" in {} field", text, field);
        Ok(())
    }

    pub fn clear<S: Surface + ?Sized>(&self, surface: &mut S, field: &str) -> Result<()> {
        self.type_into(surface, field, "")
    }

    pub fn select_from<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        dropdown: &str,
        option: &str,
    ) -> Result<()> {
        let handle = self.resolve(surface, dropdown, CueKind::Dropdown)?;
        surface.select_option(&handle, option)?;
        info!("Selected \"{}\" from {}", option, dropdown);
        Ok(())
    }

    pub fn hover<S: Surface + ?Sized>(&self, surface: &mut S, cue: &str) -> Result<()> {
        let handle = self.resolve(surface, cue, CueKind::Generic)?;
        surface.hover(&handle)?;
        Ok(())
    }

    /// Resolve a cue and wait for the element to reach `state`.
    pub fn wait_for<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        cue: &str,
        state: ElementState,
        timeout_ms: u64,
    ) -> Result<()> {
        let handle = self.resolve(surface, cue, CueKind::Generic)?;
        surface.wait_for_state(&handle, state, timeout_ms)
    }
}
