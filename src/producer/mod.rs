//! Producer naming and binding.

pub mod binder;
pub mod names;

pub use binder::{bind_producers, BindingPlan, ProducerAssignment};
pub use names::{is_shared_producer, producer_name, SYSTEM_PRODUCER};
