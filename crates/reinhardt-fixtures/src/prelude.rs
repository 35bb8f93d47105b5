//! Convenience re-exports for common usage.

// Error types
pub use crate::error::{
	AssertionFailure, ExpectationMismatch, FixtureError, FixtureResult, Mismatch, MismatchKind,
};

// Directives
pub use crate::directive::{
	DirectiveRegistry, DirectiveResolver, DirectiveSet, DirectiveSource, ExpectationDirective,
	OperationDirective, ResolvedDirectives,
};
pub use crate::scope::TestScope;

// Operations and assertions
pub use crate::assertion::{AssertionLookup, AssertionMode, DatabaseAssertion, DefaultAssertionLookup};
pub use crate::operation::{
	DefaultOperationLookup, MsSqlOperationLookup, NativeOperation, OperationKind, OperationLookup,
};

// Connections
pub use crate::connection::{ConnectionHandle, ConnectionProvider, DatabaseConnection};
pub use crate::registry::DatabaseConnections;

// Orchestration
pub use crate::executor::{OperationExecutor, Phase};
pub use crate::runner::{FixtureRunner, FixtureRunnerBuilder, FixtureSession, FixtureState};
pub use crate::settings::{FixtureSettings, ScopeConfiguration};

// Datasets
pub use reinhardt_dataset::prelude::*;
