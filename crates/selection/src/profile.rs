/// Capability and quirk profile of the engine a page runs on.
///
/// The capability flags drive strategy selection; the quirk flags change how
/// the selection reacts to DOM mutation and how it reports ranges across
/// shadow boundaries. Presets cover the engine families that matter; tests
/// build custom profiles by tweaking fields on a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineProfile {
    pub name: &'static str,
    /// Native shadow root support exists at all.
    pub has_shadow: bool,
    /// A shady-DOM flattening polyfill is active instead of real
    /// encapsulation.
    pub has_shady: bool,
    /// Shadow roots expose their own scoped selection.
    pub has_selection_api: bool,
    pub is_safari: bool,
    /// Splitting a text node snaps selection endpoints past the split back
    /// to the split offset instead of relocating them into the new sibling.
    /// This is the observable side channel offset probing depends on.
    pub clamps_split_endpoints: bool,
    /// Document-level range reporting stops at the outermost shadow host;
    /// endpoints inside a shadow tree come back as host positions.
    pub clamps_reported_range: bool,
    /// A one-character selection loses its direction: anchor and focus are
    /// stored smallest-first no matter how the user dragged.
    pub erases_single_char_direction: bool,
}

impl EngineProfile {
    pub fn chrome() -> Self {
        EngineProfile {
            name: "chrome",
            has_shadow: true,
            has_shady: false,
            has_selection_api: true,
            is_safari: false,
            clamps_split_endpoints: false,
            clamps_reported_range: true,
            erases_single_char_direction: false,
        }
    }

    pub fn firefox() -> Self {
        EngineProfile {
            name: "firefox",
            has_shadow: true,
            has_shady: false,
            has_selection_api: false,
            is_safari: false,
            clamps_split_endpoints: false,
            clamps_reported_range: false,
            erases_single_char_direction: false,
        }
    }

    pub fn safari() -> Self {
        EngineProfile {
            name: "safari",
            has_shadow: true,
            has_shady: false,
            has_selection_api: false,
            is_safari: true,
            clamps_split_endpoints: true,
            clamps_reported_range: true,
            erases_single_char_direction: true,
        }
    }

    /// No native shadow roots; a flattening polyfill stands in for them, so
    /// the document-level selection sees everything.
    pub fn shady() -> Self {
        EngineProfile {
            name: "shady",
            has_shadow: false,
            has_shady: true,
            has_selection_api: false,
            is_safari: false,
            clamps_split_endpoints: false,
            clamps_reported_range: false,
            erases_single_char_direction: false,
        }
    }
}
