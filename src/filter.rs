//! Resource filtering for provisioned tabs.
//!
//! Translation pages pull in images, stylesheets and web fonts that a
//! scraping tab never renders. [`ResourceFilter`] is a pure predicate over
//! [`ResourceKind`] used by the request interceptor to decide which network
//! requests to abort. The filter itself performs no I/O and no logging;
//! wiring it into the browser lives in the driver layer.
//!
//! # Example
//!
//! ```rust
//! use translate_tab_pool::{ResourceFilter, ResourceKind};
//!
//! let filter = ResourceFilter::default();
//! assert!(!filter.allows(ResourceKind::Image));
//! assert!(filter.allows(ResourceKind::Document));
//! assert!(filter.allows(ResourceKind::Xhr));
//! ```

use std::collections::HashSet;
use std::str::FromStr;

/// Network resource categories a tab can request.
///
/// Mirrors the resource types reported by the DevTools protocol, collapsed
/// to the categories the filter cares about. Anything unrecognized maps to
/// [`ResourceKind::Other`] and is allowed by the default filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Top-level and frame documents.
    Document,
    /// JavaScript files.
    Script,
    /// Images of any format.
    Image,
    /// CSS stylesheets.
    Stylesheet,
    /// Web fonts.
    Font,
    /// XMLHttpRequest traffic.
    Xhr,
    /// fetch() traffic.
    Fetch,
    /// Audio and video.
    Media,
    /// Everything else (websockets, manifests, prefetch, ...).
    Other,
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Parse a resource kind from its lowercase name.
    ///
    /// Used by the environment configuration to parse comma-separated
    /// blocklists such as `image,stylesheet,font`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(ResourceKind::Document),
            "script" => Ok(ResourceKind::Script),
            "image" => Ok(ResourceKind::Image),
            "stylesheet" => Ok(ResourceKind::Stylesheet),
            "font" => Ok(ResourceKind::Font),
            "xhr" => Ok(ResourceKind::Xhr),
            "fetch" => Ok(ResourceKind::Fetch),
            "media" => Ok(ResourceKind::Media),
            "other" => Ok(ResourceKind::Other),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Document => "document",
            ResourceKind::Script => "script",
            ResourceKind::Image => "image",
            ResourceKind::Stylesheet => "stylesheet",
            ResourceKind::Font => "font",
            ResourceKind::Xhr => "xhr",
            ResourceKind::Fetch => "fetch",
            ResourceKind::Media => "media",
            ResourceKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A pure predicate deciding which resource kinds a tab may load.
///
/// The default blocks images, stylesheets and fonts, which cuts the bulk of
/// a translation page's bandwidth while leaving the DOM and scripting
/// intact. The decision depends only on the resource kind, never on the
/// request URL or any external state.
///
/// # Example
///
/// ```rust
/// use translate_tab_pool::{ResourceFilter, ResourceKind};
///
/// let filter = ResourceFilter::block([ResourceKind::Media]);
/// assert!(!filter.allows(ResourceKind::Media));
/// assert!(filter.allows(ResourceKind::Image));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    blocked: HashSet<ResourceKind>,
}

impl ResourceFilter {
    /// Create a filter blocking exactly the given kinds.
    pub fn block<I: IntoIterator<Item = ResourceKind>>(kinds: I) -> Self {
        Self {
            blocked: kinds.into_iter().collect(),
        }
    }

    /// Create a filter that allows everything.
    pub fn allow_all() -> Self {
        Self {
            blocked: HashSet::new(),
        }
    }

    /// Whether a request of the given kind may proceed.
    pub fn allows(&self, kind: ResourceKind) -> bool {
        !self.blocked.contains(&kind)
    }

    /// The kinds this filter blocks, in unspecified order.
    pub fn blocked_kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.blocked.iter().copied()
    }

    /// Whether the filter blocks anything at all.
    ///
    /// The driver skips request interception entirely for a no-op filter.
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}

impl Default for ResourceFilter {
    /// Block images, stylesheets and fonts.
    fn default() -> Self {
        Self::block([
            ResourceKind::Image,
            ResourceKind::Stylesheet,
            ResourceKind::Font,
        ])
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
