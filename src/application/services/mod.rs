//! Application services - Business logic orchestration

pub mod command_service;
pub mod gallery_service;

pub use command_service::CommandService;
pub use gallery_service::{GalleryService, missing_arg, PAGE_SIZE};
