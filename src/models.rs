use crate::model::gender::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterAdminReq {
    #[schema(example = "Admin")]
    pub first_name: String,
    #[schema(example = "System")]
    pub last_name: String,
    #[schema(example = "admin@example.com", format = "email")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
    #[schema(example = "1990-01-01", value_type = String, format = "date")]
    pub birth_date: NaiveDate,
    #[schema(example = "male")]
    pub gender: Gender,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin@example.com", format = "email")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub admin_id: u64,
    /// Admin email, doubles as the token subject.
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
