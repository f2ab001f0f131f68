use tracing::{debug, info};

use crate::browser::surface::Surface;
use crate::error::Result;
use crate::screen::classifier::extract_controls;
use crate::screen::intent::{infer_business_logic, infer_workflows};
use crate::screen::platform::detect_platform;
use crate::screen::screen_model::{ControlDescriptor, PageAnalysis, PlatformSignal};

/// Analyzes an already-loaded surface into a `PageAnalysis`.
///
/// Every DOM query happens here, before any generation work starts. Faults
/// from the surface are propagated unchanged; nothing is retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceAnalyzer;

impl SurfaceAnalyzer {
    pub fn analyze<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<PageAnalysis> {
        let controls = extract_controls(surface)?;
        let title = surface.title()?;
        let url = surface.current_url()?;
        let platform = detect_platform(surface)?;

        debug!(controls = controls.len(), ?platform, "extraction pass complete");

        let analysis = build_analysis(&url, &title, controls, platform);
        info!(
            "Analyzed {} as {} ({} controls, {} workflows)",
            analysis.url,
            analysis.page_name,
            analysis.controls.len(),
            analysis.workflows.len()
        );
        Ok(analysis)
    }
}

/// Assemble an analysis from extracted parts. Pure; no surface access.
pub fn build_analysis(
    url: &str,
    title: &str,
    controls: Vec<ControlDescriptor>,
    platform: Vec<PlatformSignal>,
) -> PageAnalysis {
    let business_logic = infer_business_logic(&controls);
    let workflows = infer_workflows(&controls);

    PageAnalysis {
        url: url.to_string(),
        title: title.to_string(),
        page_name: derive_page_name(title, url),
        controls,
        platform,
        business_logic,
        workflows,
    }
}

/// `<first title token>Page`, else `<first path segment with content>Page`, else `HomePage`.
/// Both candidates are reduced to ASCII alphanumerics.
pub fn derive_page_name(title: &str, url: &str) -> String {
    let title_part = sanitize(title.split(' ').next().unwrap_or(""));
    if !title_part.is_empty() {
        return format!("{}Page", title_part);
    }

    let path_part = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.map(sanitize).find(|s| !s.is_empty()))
        })
        .unwrap_or_else(|| "Home".to_string());

    format!("{}Page", path_part)
}

fn sanitize(text: &str) -> String {
    text.chars().filter(char::is_ascii_alphanumeric).collect()
}
