//! Print a summary of the stored data

use crate::config::Config;
use crate::constants::limits::TOP_N;
use crate::db::Store;

/// Chapters listed for the first comic before eliding the rest.
const CHAPTER_PREVIEW: usize = 5;

pub async fn cmd_view_data(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    println!("{:=<60}", "");

    let comics = store.list_comics().await?;
    println!();
    println!("Comics ({} total)", comics.len());
    for (index, entry) in comics.iter().enumerate() {
        let comic = &entry.comic;
        println!("{}. {}", index + 1, comic.title);
        println!("   Author: {}", comic.author);
        println!(
            "   Genre: {} | Rating: {} | Chapters: {}",
            comic.genre.as_deref().unwrap_or("N/A"),
            comic.rating,
            comic.total_chapters
        );
        println!("   ID: {}", comic.id);
    }

    let keys = store.list_keys().await?;
    println!();
    println!("Keys ({} total)", keys.len());
    for (index, key) in keys.iter().enumerate() {
        println!("{}. {}", index + 1, key.key_value);
        println!(
            "   User: {} | Email: {}",
            key.user_name.as_deref().unwrap_or("N/A"),
            key.user_email.as_deref().unwrap_or("N/A")
        );
        println!(
            "   Active: {} | Expires: {} | Last used: {}",
            if key.is_active { "yes" } else { "no" },
            key.expires_at
                .map_or_else(|| "never".to_string(), |at| at.to_rfc3339()),
            key.last_used_at
                .map_or_else(|| "never".to_string(), |at| at.to_rfc3339())
        );
    }

    if let Some(first) = comics.first() {
        println!();
        println!(
            "Chapters of \"{}\" ({} total)",
            first.comic.title,
            first.chapters.len()
        );
        for chapter in first.chapters.iter().take(CHAPTER_PREVIEW) {
            println!("  {}. {} ({} pages)", chapter.number, chapter.title, chapter.pages);
        }
        if first.chapters.len() > CHAPTER_PREVIEW {
            println!(
                "  ... and {} more chapters",
                first.chapters.len() - CHAPTER_PREVIEW
            );
        }
    }

    let reading = store.reading_stats(TOP_N).await?;
    println!();
    println!("Most read comics");
    if reading.top_comics_by_reads.is_empty() {
        println!("  No reading history yet");
    }
    for row in &reading.top_comics_by_reads {
        println!("  {} ({} reads)", row.title, row.read_count);
    }

    println!();
    println!(
        "Users: {} | Keys: {} | Comics: {}",
        store.count_users().await?,
        store.count_keys().await?,
        store.count_comics().await?
    );
    println!("{:=<60}", "");

    Ok(())
}
