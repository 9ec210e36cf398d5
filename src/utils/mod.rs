//! Shared utilities: argument merging and validation.

pub mod options;
pub mod validation;

pub use options::{merge_args, split_args};
pub use validation::{is_valid_account_name, validate_peer_graph, validate_shape_config};
