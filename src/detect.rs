use selection::EngineProfile;

/// How ranges get answered on this engine, decided once at construction.
///
/// The three variants are mutually exclusive and cover every profile:
/// flattened or boundary-piercing engines read the document selection,
/// engines with scoped shadow selections read those, and the rest get the
/// probing resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The document-level selection already sees across boundaries.
    Document,
    /// Each shadow root exposes its own scoped selection.
    PerRoot,
    /// No native answer exists; resolve by probing and bisection.
    Probe,
}

impl Strategy {
    pub fn detect(profile: EngineProfile) -> Strategy {
        let use_document = !profile.has_shadow
            || profile.has_shady
            || (!profile.has_selection_api && !profile.is_safari);
        let strategy = if use_document {
            Strategy::Document
        } else if profile.has_selection_api {
            Strategy::PerRoot
        } else {
            Strategy::Probe
        };
        log::trace!(target: "shadow.detect", "profile {} resolves ranges via {strategy:?}", profile.name);
        strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_profiles_map_to_their_strategies() {
        assert_eq!(Strategy::detect(EngineProfile::chrome()), Strategy::PerRoot);
        assert_eq!(Strategy::detect(EngineProfile::firefox()), Strategy::Document);
        assert_eq!(Strategy::detect(EngineProfile::shady()), Strategy::Document);
        assert_eq!(Strategy::detect(EngineProfile::safari()), Strategy::Probe);
    }

    #[test]
    fn missing_shadow_support_always_reads_the_document() {
        let mut profile = EngineProfile::safari();
        profile.has_shadow = false;
        assert_eq!(Strategy::detect(profile), Strategy::Document);
    }
}
