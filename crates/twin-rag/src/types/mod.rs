//! Core types for the digital twin

pub mod audience;
pub mod document;
pub mod query;
pub mod response;

pub use audience::Audience;
pub use document::Document;
