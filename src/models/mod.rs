pub mod access_key;
pub mod comic;
pub mod comment;
pub mod reading;
pub mod stats;
pub mod user;
