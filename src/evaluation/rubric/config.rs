use serde::{Deserialize, Serialize};

/// Point table shared by the live projection and the final calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricConfig {
    pub max_score: u32,
    pub upload_credit: u32,
    pub submit_credit: u32,
    pub invalid_submit_penalty: u32,
    pub invalid_file_penalty: u32,
    pub invalid_id_penalty: u32,
    pub hint_penalty: u32,
}

impl RubricConfig {
    pub const fn standard() -> Self {
        Self {
            max_score: 100,
            upload_credit: 40,
            submit_credit: 60,
            invalid_submit_penalty: 10,
            invalid_file_penalty: 5,
            invalid_id_penalty: 5,
            hint_penalty: 2,
        }
    }
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self::standard()
    }
}
