//! Shared state of one weave in progress.

use crate::metadata::{Module, TypeId};
use crate::weave::options::WeaveOptions;

/// Borrowed state threaded through the creation and population passes.
///
/// The source module is held immutably for the whole weave; only the current
/// cloner mutates the target through this context. Root names are rendered
/// once up front because they anchor the signature substitution oracle.
pub(crate) struct WeaveContext<'w> {
    /// The module being read
    pub source: &'w Module,
    /// The module being rewritten
    pub target: &'w mut Module,
    /// Options for this weave
    pub options: &'w WeaveOptions,
    /// The source root type
    pub source_root: TypeId,
    /// The target root type
    pub target_root: TypeId,
    /// Canonical full name of the source root
    pub source_root_name: String,
    /// Canonical full name of the target root
    pub target_root_name: String,
}
