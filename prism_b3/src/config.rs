//! Configuration for procedures and the passes built on them.

/// Configuration for a [`crate::ir::Procedure`].
///
/// # Example
///
/// ```
/// use prism_b3::ProcedureConfig;
///
/// // Large function, checked after every pass
/// let config = ProcedureConfig {
///     initial_value_capacity: 4096,
///     ..ProcedureConfig::debug()
/// };
/// assert!(config.validate_after_mutation);
/// ```
#[derive(Debug, Clone)]
pub struct ProcedureConfig {
    // =========================================================================
    // Storage
    // =========================================================================
    /// Values reserved up front.
    ///
    /// Default: 256
    pub initial_value_capacity: usize,

    /// Blocks reserved up front.
    ///
    /// Default: 16
    pub initial_block_capacity: usize,

    // =========================================================================
    // Debugging
    // =========================================================================
    /// Run [`crate::ir::Procedure::validate`] after every pass and abort on
    /// the first problem.
    ///
    /// Default: on in debug builds, off in release builds
    pub validate_after_mutation: bool,
}

impl Default for ProcedureConfig {
    fn default() -> Self {
        Self {
            initial_value_capacity: 256,
            initial_block_capacity: 16,
            validate_after_mutation: cfg!(debug_assertions),
        }
    }
}

impl ProcedureConfig {
    /// Small, unchecked procedures (stubs and thunks).
    pub fn minimal() -> Self {
        Self {
            initial_value_capacity: 16,
            initial_block_capacity: 2,
            validate_after_mutation: false,
        }
    }

    /// Validate after every pass regardless of build profile.
    pub fn debug() -> Self {
        Self {
            validate_after_mutation: true,
            ..Default::default()
        }
    }
}

/// Configuration for local common subexpression elimination.
#[derive(Debug, Clone)]
pub struct CseConfig {
    /// Maximum sweeps over the procedure. A sweep that changes nothing ends
    /// the pass early.
    ///
    /// Default: 4
    pub max_iterations: usize,

    /// Allow merging values that are control dependent (Div, Mod). Safe
    /// within one block because the earlier value dominates the later one.
    ///
    /// Default: true
    pub merge_control_dependent: bool,
}

impl Default for CseConfig {
    fn default() -> Self {
        Self {
            max_iterations: 4,
            merge_control_dependent: true,
        }
    }
}

impl CseConfig {
    /// One sweep, pure values only.
    pub fn minimal() -> Self {
        Self {
            max_iterations: 1,
            merge_control_dependent: false,
        }
    }
}
