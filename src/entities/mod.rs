pub mod prelude;

pub mod access_keys;
pub mod bookmarks;
pub mod chapter_pages;
pub mod chapters;
pub mod comics;
pub mod comments;
pub mod reading_history;
pub mod users;
