use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by identity tokens issued by the login service.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
