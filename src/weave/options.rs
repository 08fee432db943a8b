//! Weave configuration options.

use crate::metadata::{CustomAttribute, Module};

/// Options modulating a single weave.
///
/// Built with chainable methods; the default configuration clones every
/// member and propagates every root attribute.
///
/// # Examples
///
/// ```rust
/// use cilweave::WeaveOptions;
///
/// let options = WeaveOptions::new()
///     .skip_attribute("Weaving.SkipAttribute")
///     .meta_attribute("Weaving.MixAttribute");
/// assert!(options.is_meta_attribute("Weaving.MixAttribute"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeaveOptions {
    skip_attribute: Option<String>,
    meta_attributes: Vec<String>,
}

impl WeaveOptions {
    /// Creates the default options: nothing skipped, nothing filtered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the skip marker attribute type.
    ///
    /// Source members carrying an attribute of this type are excluded from
    /// cloning, together with everything they contain.
    #[must_use]
    pub fn skip_attribute(mut self, full_name: &str) -> Self {
        self.skip_attribute = Some(full_name.to_string());
        self
    }

    /// Registers an attribute type as weave-meta.
    ///
    /// Meta attributes describe the weave itself; applications on the source
    /// root are not propagated to the target root. All other root attributes
    /// are.
    #[must_use]
    pub fn meta_attribute(mut self, full_name: &str) -> Self {
        self.meta_attributes.push(full_name.to_string());
        self
    }

    /// Returns `true` when the given attribute type is registered as meta.
    #[must_use]
    pub fn is_meta_attribute(&self, full_name: &str) -> bool {
        self.meta_attributes.iter().any(|a| a == full_name)
    }

    /// Returns `true` when a member carrying `attributes` must be skipped.
    ///
    /// The attribute type is rendered against `module` so module-local skip
    /// marker types are recognized too.
    #[must_use]
    pub fn skips(&self, module: &Module, attributes: &[CustomAttribute]) -> bool {
        let Some(marker) = &self.skip_attribute else {
            return false;
        };
        attributes
            .iter()
            .any(|a| module.type_ref_name(&a.constructor.declaring) == *marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::factories;

    #[test]
    fn test_default_skips_nothing() {
        let (module, _) = factories::module_with_root("Mix", "Source");
        let options = WeaveOptions::new();
        let attr = factories::marker_attribute("Weaving.SkipAttribute");
        assert!(!options.skips(&module, &[attr]));
    }

    #[test]
    fn test_skip_marker_matches_by_full_name() {
        let (module, _) = factories::module_with_root("Mix", "Source");
        let options = WeaveOptions::new().skip_attribute("Weaving.SkipAttribute");
        let skip = factories::marker_attribute("Weaving.SkipAttribute");
        let other = factories::marker_attribute("Weaving.OtherAttribute");
        assert!(options.skips(&module, &[other, skip]));

        let only_other = factories::marker_attribute("Weaving.OtherAttribute");
        assert!(!options.skips(&module, &[only_other]));
    }

    #[test]
    fn test_meta_attribute_registration() {
        let options = WeaveOptions::new()
            .meta_attribute("Weaving.MixAttribute")
            .meta_attribute("Weaving.MixTargetAttribute");
        assert!(options.is_meta_attribute("Weaving.MixAttribute"));
        assert!(!options.is_meta_attribute("System.ObsoleteAttribute"));
    }
}
