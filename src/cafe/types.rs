use serde::{Deserialize, Serialize};

/// Response for a successful delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}
