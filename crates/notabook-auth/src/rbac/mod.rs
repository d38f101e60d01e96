//! Role-based capability checks.

pub mod capability;
pub mod evaluator;

pub use capability::Capability;
pub use evaluator::PermissionEvaluator;
