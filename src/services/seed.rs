//! First-start bootstrap: the admin account with its key, and an optional demo catalog.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::models::access_key::NewAccessKey;
use crate::models::comic::{NewChapter, NewComic, NewPage};
use crate::models::user::{NewUser, Role, UserStatus};

const GENRES: &[&str] = &[
    "Action",
    "Romance",
    "Comedy",
    "Fantasy",
    "Horror",
    "Drama",
    "Sci-Fi",
    "Mystery",
    "Adventure",
    "Supernatural",
];

const STATUSES: &[&str] = &["Ongoing", "Completed", "On hiatus"];

const WORDS: &[&str] = &[
    "shadow", "blade", "moon", "garden", "iron", "crimson", "whisper", "tower", "river", "storm",
    "ember", "silent", "crown", "hollow", "star", "wolf", "glass", "dream", "frost", "lantern",
    "echo", "serpent", "golden", "ashen", "veil", "harbor", "spirit", "thorn", "sky", "oath",
];

const FIRST_NAMES: &[&str] = &[
    "Aiko", "Minh", "Sora", "Linh", "Kenji", "Mai", "Hana", "Duc", "Yuki", "Tuan", "Rin", "Lan",
];

const LAST_NAMES: &[&str] = &[
    "Tanaka", "Nguyen", "Sato", "Tran", "Kobayashi", "Le", "Mori", "Pham", "Ito", "Vo",
];

/// A generated comic with chapters and their pages.
pub type DemoComic = (NewComic, Vec<(NewChapter, Vec<NewPage>)>);

/// Creates the bootstrap admin and its never-expiring key when missing.
/// Returns `true` if anything was created.
pub async fn ensure_admin(store: &Store, security: &SecurityConfig) -> Result<bool> {
    let mut changed = false;

    let admin = match store
        .get_user_by_username(&security.bootstrap_admin_username)
        .await?
    {
        Some(user) => user,
        None => {
            let user = store
                .create_user(
                    NewUser {
                        username: security.bootstrap_admin_username.clone(),
                        email: security.bootstrap_admin_email.clone(),
                        password: security.bootstrap_admin_password.clone(),
                        full_name: Some("Administrator".to_string()),
                        phone: None,
                        role: Role::Admin,
                        status: UserStatus::Active,
                    },
                    security,
                )
                .await
                .context("Failed to create bootstrap admin")?;
            info!(username = %user.username, "Created bootstrap admin account");
            changed = true;
            user
        }
    };

    let key = match store
        .get_key_by_value(&security.bootstrap_admin_key)
        .await?
    {
        Some(key) => key,
        None => {
            let key = store
                .create_key(NewAccessKey {
                    key_value: security.bootstrap_admin_key.clone(),
                    user_name: Some("Admin".to_string()),
                    user_email: Some(security.bootstrap_admin_email.clone()),
                    expires_at: None,
                })
                .await?
                .context("Bootstrap key was created concurrently")?;
            info!(key_id = key.id, "Created bootstrap admin key");
            changed = true;
            key
        }
    };

    if admin.key_id.is_none() {
        store.assign_key_to_user(admin.id, key.id).await?;
        changed = true;
    }

    Ok(changed)
}

fn words(rng: &mut impl Rng, count: usize) -> String {
    (0..count)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn image_url(rng: &mut impl Rng, width: u32, height: u32) -> String {
    let seed: u32 = rng.random_range(1..=100_000);
    format!("https://picsum.photos/seed/{seed}/{width}/{height}")
}

/// Builds `count` random comics. Each gets 15 to 30 chapters of 15 to 30 pages.
pub fn generate_demo_catalog(rng: &mut impl Rng, count: usize) -> Vec<DemoComic> {
    let today = Utc::now();

    (0..count)
        .map(|_| {
            let chapter_count: i32 = rng.random_range(15..=30);
            let author = format!(
                "{} {}",
                FIRST_NAMES.choose(rng).copied().unwrap_or("Anon"),
                LAST_NAMES.choose(rng).copied().unwrap_or("Author"),
            );
            let rating = f64::from(rng.random_range(60..=90_u32)) / 10.0;

            let comic = NewComic {
                title: title_case(&words(rng, 3)),
                author,
                thumbnail: Some(image_url(rng, 300, 400)),
                rating: Some(rating),
                year: Some(today.year() - rng.random_range(0..5)),
                genre: GENRES.choose(rng).map(ToString::to_string),
                description: Some(format!("{}.", words(rng, 18))),
                status: STATUSES.choose(rng).map(ToString::to_string),
                views: Some(rng.random_range(1_000..=100_000)),
                likes: Some(rng.random_range(100..=10_000)),
            };

            let chapters = (1..=chapter_count)
                .map(|number| {
                    let page_count: i32 = rng.random_range(15..=30);
                    let released = today - Duration::days(rng.random_range(0..730));
                    let chapter = NewChapter {
                        number,
                        title: format!("Chapter {number}: {}", title_case(&words(rng, 3))),
                        release_date: Some(released.format("%Y-%m-%d").to_string()),
                    };
                    let pages = (1..=page_count)
                        .map(|page_number| NewPage {
                            page_number,
                            image_url: image_url(rng, 800, 1200),
                        })
                        .collect();
                    (chapter, pages)
                })
                .collect();

            (comic, chapters)
        })
        .collect()
}

/// Fills the catalog with demo comics if it is empty. Returns how many were added.
pub async fn seed_demo_catalog(store: &Store, count: usize) -> Result<usize> {
    if store.count_comics().await? > 0 {
        info!("Catalog already has comics, skipping seed");
        return Ok(0);
    }

    // ThreadRng is not Send; generate everything before the first await.
    let catalog = generate_demo_catalog(&mut rand::rng(), count);

    let mut created = 0;
    for (comic, chapters) in catalog {
        store.import_comic(comic, chapters).await?;
        created += 1;
    }

    info!(count = created, "Seeded demo catalog");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_catalog_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = generate_demo_catalog(&mut rng, 3);
        assert_eq!(catalog.len(), 3);

        for (comic, chapters) in &catalog {
            assert!(!comic.title.is_empty());
            assert!((15..=30).contains(&chapters.len()));
            let rating = comic.rating.unwrap();
            assert!((6.0..=9.0).contains(&rating));

            for (index, (chapter, pages)) in chapters.iter().enumerate() {
                assert_eq!(chapter.number, i32::try_from(index).unwrap() + 1);
                assert!((15..=30).contains(&pages.len()));
                assert_eq!(pages[0].page_number, 1);
            }
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("iron moon garden"), "Iron Moon Garden");
        assert_eq!(title_case(""), "");
    }
}
