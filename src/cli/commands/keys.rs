use crate::config::Config;
use crate::db::Store;
use crate::services::{AccessService, SeaOrmAccessService};

pub async fn cmd_generate_keys(
    config: &Config,
    count: u32,
    prefix: &str,
    expires_days: Option<i64>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmAccessService::new(store);

    println!("Generating {count} keys with prefix '{prefix}'...");
    let result = service.create_bulk(count, prefix, expires_days).await?;

    for key in &result.keys {
        println!("  ✓ {key}");
    }

    println!("{:=<50}", "");
    println!("Created: {} keys", result.created);
    println!("Errors:  {} keys", result.errors);
    println!("{:=<50}", "");

    let keys = service.list_keys().await?;
    println!();
    println!("All keys ({} total):", keys.len());
    for (index, key) in keys.iter().enumerate() {
        let expires = key
            .expires_at
            .map_or_else(|| "never".to_string(), |at| at.format("%Y-%m-%d").to_string());
        println!("{}. {}", index + 1, key.key_value);
        println!(
            "   User: {} | Email: {}",
            key.user_name.as_deref().unwrap_or("N/A"),
            key.user_email.as_deref().unwrap_or("N/A")
        );
        println!(
            "   Active: {} | Expires: {expires}",
            if key.is_active { "yes" } else { "no" }
        );
    }

    Ok(())
}
