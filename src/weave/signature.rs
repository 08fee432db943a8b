//! Cross-module signature matching.
//!
//! Two method signatures on opposite sides of a weave are considered equal
//! when, after substituting the target root type's full name back to the
//! source root type's full name in the target-side rendering, the canonical
//! string forms match. This substitution is the definitive oracle for
//! matching a closed-generic or nested method to its open counterpart across
//! the rewritten module boundary: the only systematic difference between the
//! two frames is the root name itself.

use crate::metadata::{MethodId, Module};

/// Returns `true` when a target-side signature matches a source-side one
/// under root-name substitution.
///
/// # Arguments
///
/// * `target_signature` - Canonical rendering in the target frame
/// * `source_signature` - Canonical rendering in the source frame
/// * `source_root` - Full name of the source root type
/// * `target_root` - Full name of the target root type
#[must_use]
pub fn signatures_match(
    target_signature: &str,
    source_signature: &str,
    source_root: &str,
    target_root: &str,
) -> bool {
    target_signature.replace(target_root, source_root) == source_signature
}

/// Finds the method of `declaring` in `target` whose signature matches the
/// source-frame rendering of `reference`.
///
/// Candidates are rendered in the target frame and compared through
/// [`signatures_match`]. Returns the first match in declaration order.
#[must_use]
pub fn find_matching_method(
    target: &Module,
    declaring: crate::metadata::TypeId,
    source_signature: &str,
    source_root: &str,
    target_root: &str,
) -> Option<MethodId> {
    target
        .type_(declaring)
        .methods
        .iter()
        .copied()
        .find(|&m| {
            signatures_match(
                &target.method_full_name(m),
                source_signature,
                source_root,
                target_root,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TypeRef;
    use crate::test::factories;

    #[test]
    fn test_substitution_match() {
        assert!(signatures_match(
            "System.Void App.Target::Run(App.Target/Nested)",
            "System.Void Mix.Source::Run(Mix.Source/Nested)",
            "Mix.Source",
            "App.Target",
        ));
    }

    #[test]
    fn test_substitution_is_reflexive() {
        let sig = "System.Void Mix.Source::Run(System.Int32)";
        assert!(signatures_match(sig, sig, "Mix.Source", "Mix.Source"));
    }

    #[test]
    fn test_substitution_is_transitive() {
        // a matches b under A->B, b matches c under B->C, then a matches c
        // under A->C, all renderings differing only in the root name.
        let a = "System.Void Root.A::M(Root.A)";
        let b = "System.Void Root.B::M(Root.B)";
        let c = "System.Void Root.C::M(Root.C)";
        assert!(signatures_match(b, a, "Root.A", "Root.B"));
        assert!(signatures_match(c, b, "Root.B", "Root.C"));
        assert!(signatures_match(c, a, "Root.A", "Root.C"));
    }

    #[test]
    fn test_mismatched_parameter_rejected() {
        assert!(!signatures_match(
            "System.Void App.Target::Run(System.Int64)",
            "System.Void Mix.Source::Run(System.Int32)",
            "Mix.Source",
            "App.Target",
        ));
    }

    #[test]
    fn test_find_matching_method_by_declaration_order() {
        let (mut target, root) = factories::module_with_root("App", "Target");
        factories::add_void_method(&mut target, root, "Other", &[]);
        let wanted = factories::add_void_method(
            &mut target,
            root,
            "Run",
            &[TypeRef::core("System.Int32")],
        );

        let found = find_matching_method(
            &target,
            root,
            "System.Void Mix.Source::Run(System.Int32)",
            "Mix.Source",
            "App.Target",
        );
        assert_eq!(found, Some(wanted));

        let missing = find_matching_method(
            &target,
            root,
            "System.Void Mix.Source::Absent()",
            "Mix.Source",
            "App.Target",
        );
        assert!(missing.is_none());
    }
}
