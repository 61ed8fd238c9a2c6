//! Database entities.

pub mod custom_tab;
pub mod link;
pub mod link_tab;
pub mod tag;
pub mod user;

pub use custom_tab::Entity as CustomTab;
pub use link::Entity as Link;
pub use link_tab::Entity as LinkTab;
pub use tag::Entity as Tag;
pub use user::Entity as User;
