use super::IUserRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use medimate_domain::{User, ID};
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

pub struct UserRepo {
    collection: Collection<UserMongo>,
}

impl UserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for UserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        mongo_repo::insert(&self.collection, user).await
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        mongo_repo::save(&self.collection, user).await
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        let filter = doc! {
            "_id": user_id.as_string()
        };
        mongo_repo::find(&self.collection, filter).await
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        mongo_repo::find_many(&self.collection, doc! {}).await
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        let filter = doc! {
            "_id": user_id.as_string()
        };
        mongo_repo::delete(&self.collection, filter).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct UserMongo {
    _id: ID,
    first_name: String,
    last_name: String,
    phone: String,
}

impl MongoDocument<User> for UserMongo {
    fn to_domain(self) -> User {
        User {
            id: self._id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
        }
    }

    fn from_domain(user: &User) -> Self {
        Self {
            _id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
        }
    }

    fn id_filter(user: &User) -> Document {
        doc! {
            "_id": user.id.as_string()
        }
    }
}
