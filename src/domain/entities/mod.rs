//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod reply;
pub mod image;

pub use user::User;
pub use message::{Attachment, Message, MessageType, Content};
pub use command::{Command, CommandRegistry};
pub use reply::{ForwardNode, Reply, Segment};
pub use image::{ImageRecord, NewImage, TagRecord};
