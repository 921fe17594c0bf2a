use crate::config::Config;
use crate::db::Store;
use crate::services::seed;

pub async fn cmd_seed(config: &Config, count: Option<usize>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let count = count.unwrap_or(config.catalog.demo_comic_count);

    let created = seed::seed_demo_catalog(&store, count).await?;

    if created == 0 {
        println!("Catalog already has comics, nothing to seed.");
    } else {
        println!("✓ Seeded {created} demo comics");
    }

    Ok(())
}
