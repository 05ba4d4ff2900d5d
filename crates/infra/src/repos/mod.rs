mod medication;
mod shared;
mod user;

pub use medication::{IMedicationRepo, InMemoryMedicationRepo, MedicationRepo};
pub use user::{IUserRepo, InMemoryUserRepo, UserRepo};

use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub medications: Arc<dyn IMedicationRepo>,
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    pub async fn create_mongodb(connection_string: &str, db_name: &str) -> anyhow::Result<Self> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Makes sure the credentials are valid before the server starts
        db.run_command(doc! {"ping": 1}, None).await?;
        info!("Connected to mongodb database: {}", db_name);

        Ok(Self {
            medications: Arc::new(MedicationRepo::new(&db)),
            users: Arc::new(UserRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            medications: Arc::new(InMemoryMedicationRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
        }
    }
}
