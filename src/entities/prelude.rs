pub use super::access_keys::Entity as AccessKeys;
pub use super::bookmarks::Entity as Bookmarks;
pub use super::chapter_pages::Entity as ChapterPages;
pub use super::chapters::Entity as Chapters;
pub use super::comics::Entity as Comics;
pub use super::comments::Entity as Comments;
pub use super::reading_history::Entity as ReadingHistory;
pub use super::users::Entity as Users;
