pub mod context;
pub mod document;
pub mod error;
pub mod health;
pub mod insight;
pub mod openapi;
pub mod organization;
pub mod scoring;
