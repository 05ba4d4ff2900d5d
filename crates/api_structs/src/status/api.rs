use serde::{Deserialize, Serialize};

pub mod check_connection {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct APIResponse {
        pub message: String,
    }
}
