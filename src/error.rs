use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure conditions that can occur while building the clone graph,
/// scheduling the two weave passes, and rewriting references. Every failure is fatal to the
/// weave in progress; none is recovered locally. Each variant carries the fully-qualified
/// name of the offending metadata entity so the failure can be pinpointed in build logs.
///
/// # Error Categories
///
/// ## Graph Construction Errors
/// - [`Error::InvalidGraph`] - Edge endpoint outside the vertex set, or mismatched-kind siblings
/// - [`Error::NoParent`] - Parent lookup on a root vertex
/// - [`Error::NoPreviousSibling`] - Previous-sibling lookup on a first sibling
/// - [`Error::ParentCycle`] - The parent relation is not a forest
/// - [`Error::CyclicDependency`] - The dependency relation admits no topological order
///
/// ## Reference Rewriting Errors
/// - [`Error::UnknownGenericParameter`] - Generic parameter reference with no registered cloner
/// - [`Error::UnmaterializedGenericParameter`] - Generic parameter target still deferred
/// - [`Error::UnresolvedDeclaringType`] - Method's declaring type unresolvable in the target
/// - [`Error::SignatureMatchMissing`] - No local method matches the substituted signature
///
/// ## Lifecycle Errors
/// - [`Error::DoubleInvoke`] - Registry or cloner lifecycle violated
///
/// ## Object Model Errors
/// - [`Error::TypeNotFound`] - A root type name does not resolve in its module
///
/// # Examples
///
/// ```rust
/// use cilweave::{Error, Result};
///
/// fn check(result: Result<()>) {
///     match result {
///         Ok(()) => println!("weave completed"),
///         Err(Error::CyclicDependency(members)) => {
///             eprintln!("dependency cycle: {members}");
///         }
///         Err(e) => eprintln!("weave failed: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied vertex and edge sets do not form a valid clone graph.
    ///
    /// Raised during graph construction when an edge endpoint is not a member
    /// of the vertex set, or when a sibling edge connects vertices of
    /// different kinds. The message names both endpoints.
    #[error("Invalid clone graph - {0}")]
    InvalidGraph(String),

    /// A parent lookup was performed on a root vertex.
    ///
    /// Roots have no incoming parent edge; use the fallible lookup when the
    /// vertex may be a root. The message names the vertex.
    #[error("Vertex has no parent - {0}")]
    NoParent(String),

    /// A previous-sibling lookup was performed on a first sibling.
    ///
    /// The vertex has no incoming sibling edge; use the fallible lookup when
    /// the vertex may be first among its peers. The message names the vertex.
    #[error("Vertex has no previous sibling - {0}")]
    NoPreviousSibling(String),

    /// The parent relation contains a cycle.
    ///
    /// Detected during depth computation when the walk toward a root exceeds
    /// the vertex count. A valid input's parent edges always form a forest,
    /// so this indicates corrupted discovery output.
    #[error("Cycle in parent chain - {0}")]
    ParentCycle(String),

    /// The dependency edges admit no topological order.
    ///
    /// The message lists the members of the offending strongly connected
    /// component. The weave aborts before any target mutation.
    #[error("Cyclic dependency between {0}")]
    CyclicDependency(String),

    /// A generic parameter reference has no registered cloner.
    ///
    /// Every generic parameter reachable from the source root must have been
    /// discovered and paired with a cloner before references to it can be
    /// rewritten. The message names the parameter and its owner.
    #[error("No cloner registered for generic parameter - {0}")]
    UnknownGenericParameter(String),

    /// A generic parameter target was looked up while still deferred.
    ///
    /// Generic parameter targets are materialized when their owner's shell is
    /// created; a lookup that observes the deferred placeholder means the
    /// driver scheduled population before creation completed.
    #[error("Generic parameter target not yet materialized - {0}")]
    UnmaterializedGenericParameter(String),

    /// A method's root-imported declaring type could not be resolved.
    ///
    /// The declaring type reference did not resolve to a definition in the
    /// target module nor to anything in the target's reference closure.
    #[error("Could not resolve declaring type - {0}")]
    UnresolvedDeclaringType(String),

    /// No local method matches the source method's substituted signature.
    ///
    /// After substituting the target root's full name back to the source
    /// root's, no method in the imported declaring type rendered an equal
    /// signature. The message carries the substituted signature sought.
    #[error("No signature match for method - {0}")]
    SignatureMatchMissing(String),

    /// A one-shot lifecycle transition was attempted twice.
    ///
    /// Covers populating an already-populated cloner, adding cloners after
    /// discovery closed, target lookups before discovery closed, and
    /// re-flipping the discovery gate.
    #[error("Lifecycle violation - {0}")]
    DoubleInvoke(String),

    /// A type name did not resolve within its module.
    ///
    /// Raised when a weave is requested against a source or target root name
    /// that the respective module does not define.
    #[error("Type not found in module - {0}")]
    TypeNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = Error::CyclicDependency("A.B::M, A.B::N".to_string());
        assert_eq!(err.to_string(), "Cyclic dependency between A.B::M, A.B::N");

        let err = Error::TypeNotFound("Mix.Source".to_string());
        assert!(err.to_string().contains("Mix.Source"));
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<E: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
