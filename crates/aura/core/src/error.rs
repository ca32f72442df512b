//! Common error infrastructure for aura-core.
//!
//! Domain-specific errors (e.g., `WorldError`, `TickError`) live next to the
//! code that produces them. This module holds the shared severity and context
//! types plus the [`AuraError`] trait every error enum implements.
//!
//! # Failure Policy
//!
//! - **Contract violations** (an illegal handle mode) are assertions, never values
//! - **Missing optional data** (no caster, no modifier) skips the dependent branch
//! - **Malformed content** is logged and abandons only the affected sub-operation
//! - **Script vetoes** are a control path, not errors

use crate::state::{AuraId, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the world can keep simulating without intervention.
    ///
    /// Examples: periodic tick target despawned, proc target gone
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown unit, aura already applied to target
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: application refers to a destroyed aura
    Internal,

    /// Fatal error - the engine cannot continue with this configuration.
    ///
    /// Examples: required oracle missing from the environment
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Unit the failing operation targeted (if applicable).
    pub unit: Option<UnitId>,

    /// Aura the failing effect belongs to (if applicable).
    pub aura: Option<AuraId>,

    /// Effect slot within the aura (if applicable).
    pub effect_index: Option<u8>,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unit: None,
            aura: None,
            effect_index: None,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_aura(mut self, aura: AuraId) -> Self {
        self.aura = Some(aura);
        self
    }

    #[must_use]
    pub const fn with_effect_index(mut self, index: u8) -> Self {
        self.effect_index = Some(index);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all aura-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait AuraError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
