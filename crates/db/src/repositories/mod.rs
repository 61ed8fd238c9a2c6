//! Repository layer.

mod custom_tab;
mod link;
mod tag;
mod user;

pub use custom_tab::CustomTabRepository;
pub use link::{GroupCount, LinkFilter, LinkOrder, LinkRepository, NewLink};
pub use tag::TagRepository;
pub use user::UserRepository;
