pub mod token;
pub use token::{Claims, TokenError, TokenService};

pub mod access_service;
pub use access_service::{AccessError, AccessService};

pub mod access_service_impl;
pub use access_service_impl::SeaOrmAccessService;

pub mod account_service;
pub use account_service::{AccountError, AccountService};

pub mod account_service_impl;
pub use account_service_impl::SeaOrmAccountService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod reading_service;
pub use reading_service::{BookmarkOutcome, ReadingError, ReadingService};

pub mod reading_service_impl;
pub use reading_service_impl::SeaOrmReadingService;

pub mod comment_service;
pub use comment_service::{CommentError, CommentService};

pub mod comment_service_impl;
pub use comment_service_impl::SeaOrmCommentService;

pub mod seed;
