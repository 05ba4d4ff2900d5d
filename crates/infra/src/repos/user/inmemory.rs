use super::IUserRepo;
use crate::repos::shared::inmemory_repo;
use medimate_domain::{User, ID};
use std::sync::Mutex;

pub struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        inmemory_repo::insert(user, &self.users)
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        inmemory_repo::save(user, &self.users)
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        inmemory_repo::find(user_id, &self.users)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(inmemory_repo::find_by(|_| true, &self.users))
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        inmemory_repo::delete(user_id, &self.users)
    }
}
