mod admin;
mod keys;
mod seed;
mod view;

pub use admin::cmd_create_admin;
pub use keys::cmd_generate_keys;
pub use seed::cmd_seed;
pub use view::cmd_view_data;
