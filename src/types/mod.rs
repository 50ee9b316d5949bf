pub mod error;

pub use error::{
    AggregateFailure, BackendError, BackendFailure, DEADLINE_EXCEEDED, ErrorCategory,
    ExplainError, Result,
};
