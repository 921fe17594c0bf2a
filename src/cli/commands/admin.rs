//! Create or repair the bootstrap admin account

use crate::config::Config;
use crate::db::Store;
use crate::models::user::{Role, UserStatus};
use crate::services::seed;

pub async fn cmd_create_admin(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let security = &config.security;

    let existed = store
        .get_user_by_username(&security.bootstrap_admin_username)
        .await?
        .is_some();

    seed::ensure_admin(&store, security).await?;

    let admin = store
        .get_user_by_username(&security.bootstrap_admin_username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Admin account missing after bootstrap"))?;

    if existed {
        store
            .set_user_password(admin.id, &security.bootstrap_admin_password, security)
            .await?;
        store
            .update_user_role_status(admin.id, Some(Role::Admin), Some(UserStatus::Active))
            .await?;
        println!("✓ Admin user already existed, password, role and status were reset");
    } else {
        println!("✓ Created admin user");
    }

    println!("  Username: {}", admin.username);
    println!("  Email:    {}", admin.email);
    println!("  Password: {}", security.bootstrap_admin_password);

    if let Some(key_id) = admin.key_id
        && let Some(key) = store.get_key(key_id).await?
    {
        println!("  Key:      {}", key.key_value);
    }

    Ok(())
}
