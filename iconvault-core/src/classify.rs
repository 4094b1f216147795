use iconvault_model::Tintability;

/// Substring whose presence marks an SVG as accepting a runtime tint.
pub const TINT_MARKER: &str = "currentColor";

/// Classify freshly fetched content.
///
/// This is a substring heuristic, not a parse: it neither validates the SVG
/// nor looks at where the marker appears. Cached entries are never
/// reclassified; their variant is read back from which cache path exists.
pub fn classify(contents: &str) -> Tintability {
    Tintability::from(contents.contains(TINT_MARKER))
}
