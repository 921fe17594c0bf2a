use serde::Serialize;

/// Uniform envelope: `{success, data?, message?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Success carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewDto {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct BookmarkStatusDto {
    #[serde(rename = "isBookmarked")]
    pub is_bookmarked: bool,
}

#[derive(Debug, Serialize)]
pub struct KeyCreatedDto {
    #[serde(rename = "keyId")]
    pub key_id: i32,
}

#[derive(Debug, Serialize)]
pub struct KeyStateDto {
    pub key_value: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserStateDto {
    pub id: i32,
    pub username: String,
    pub status: String,
    pub role: String,
}
