//! Domain models with validation at construction
//!
//! Creation input is validated when building a `NewRecord`.
//! Invalid input returns ValidationError, not panic.

pub mod record;
pub mod validation;

pub use record::{NewRecord, PostRecordInput, Record, RecordChanges, UpdateRecordInput};
pub use validation::ValidationError;
