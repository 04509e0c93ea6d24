use crate::model::gender::Gender;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "first_name": "Admin",
        "last_name": "System",
        "email": "admin@example.com",
        "birth_date": "1990-01-01",
        "gender": "male",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
)]
pub struct Admin {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Admin")]
    pub first_name: String,

    #[schema(example = "System")]
    pub last_name: String,

    #[schema(example = "admin@example.com", format = "email")]
    pub email: String,

    /// Argon2 hash, never serialized into responses.
    #[serde(skip_serializing)]
    #[schema(write_only)]
    pub password: String,

    #[schema(example = "1990-01-01", value_type = String, format = "date")]
    pub birth_date: NaiveDate,

    #[schema(example = "male")]
    pub gender: Gender,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(example = "2024-01-01T00:00:00Z", value_type = String, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}
