pub mod models;
pub mod dto;
pub mod filters;
pub mod serializer;
pub mod handlers;
pub mod service;

pub use service::JobService;
