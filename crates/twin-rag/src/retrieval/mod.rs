//! Vector storage: the on-disk collection and the adapter the pipeline uses

pub mod adapter;
pub mod collection;

pub use adapter::DocumentStore;
pub use collection::VectorCollection;
