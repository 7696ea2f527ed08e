// src/models/media.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Tipos MIME aceitos pelo serviço de armazenamento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "mime_type")]
pub enum MimeType {
    #[sqlx(rename = "image/jpeg")]
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[sqlx(rename = "image/png")]
    #[serde(rename = "image/png")]
    Png,
    #[sqlx(rename = "image/gif")]
    #[serde(rename = "image/gif")]
    Gif,
    #[sqlx(rename = "application/pdf")]
    #[serde(rename = "application/pdf")]
    Pdf,
    #[sqlx(rename = "video/mp4")]
    #[serde(rename = "video/mp4")]
    Mp4,
}

impl MimeType {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "application/pdf" => Some(Self::Pdf),
            "video/mp4" => Some(Self::Mp4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "media_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Profile,
    Gallery,
    Document,
    Video,
}

impl MediaType {
    // Para os campos texto do multipart, onde não há serde
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "profile" => Some(Self::Profile),
            "gallery" => Some(Self::Gallery),
            "document" => Some(Self::Document),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

// Um arquivo vinculado a exatamente um especialista
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: Uuid,

    pub storage_url: String,
    // Identificador opaco no serviço de armazenamento; usado para exclusão
    pub storage_public_id: String,

    pub file_name: String,
    pub file_size: i64,
    pub display_order: i32,
    pub mime_type: MimeType,
    pub media_type: MediaType,

    pub specialist_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaPayload {
    #[validate(range(min = 0, message = "A ordem de exibição não pode ser negativa."))]
    pub display_order: Option<i32>,
    pub media_type: Option<MediaType>,
}
