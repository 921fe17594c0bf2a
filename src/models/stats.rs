use sea_orm::FromQueryResult;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct UserCommentCount {
    pub username: String,
    pub email: String,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ComicCommentCount {
    pub title: String,
    pub genre: Option<String>,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct GenreCommentCount {
    pub genre: Option<String>,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ComicAverageRating {
    pub title: String,
    pub avg_rating: f64,
    pub rating_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentStats {
    pub top_users: Vec<UserCommentCount>,
    pub top_comics: Vec<ComicCommentCount>,
    pub top_genres: Vec<GenreCommentCount>,
    pub avg_ratings: Vec<ComicAverageRating>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ComicViews {
    pub id: i32,
    pub title: String,
    pub genre: Option<String>,
    pub views: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ComicReadCount {
    pub title: String,
    pub genre: Option<String>,
    pub read_count: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct GenreReadCount {
    pub genre: Option<String>,
    pub read_count: i64,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct UserReadCount {
    pub username: String,
    pub email: String,
    pub read_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    pub top_comics_by_views: Vec<ComicViews>,
    pub top_comics_by_reads: Vec<ComicReadCount>,
    pub top_genres_by_reads: Vec<GenreReadCount>,
    pub top_users_by_reads: Vec<UserReadCount>,
}

/// Averages are reported to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth() {
        assert!((round_to_tenth(4.25) - 4.3).abs() < f64::EPSILON);
        assert!((round_to_tenth(3.333_333) - 3.3).abs() < f64::EPSILON);
        assert!((round_to_tenth(5.0) - 5.0).abs() < f64::EPSILON);
    }
}
