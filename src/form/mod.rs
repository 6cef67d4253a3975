//! Form module
//!
//! Declarative per-node fields and their snapshot/restore to a flat
//! string-keyed mapping.

mod field;
mod report;
mod state;

pub use field::{FieldKind, FieldSpec, FieldValue};
pub use report::{FieldFailure, RestoreReport};
pub use state::{Field, FieldHandle, FormState};
