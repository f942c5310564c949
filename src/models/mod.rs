//! Typed records for Notion API payloads.

pub mod date;
pub mod list;
pub mod rich_text;
pub mod types;

pub use date::{NotionDate, Timestamp};
pub use list::ObjectList;
pub use rich_text::{RichTextValue, TextContent};
pub use types::{
    BackgroundColor, Color, ModelError, NotionEmail, NotionEquation, NotionLink, NotionUrl,
    ObjectId, ObjectType,
};
