use futures::stream::TryStreamExt;
use mongodb::bson::Document;
use mongodb::Collection;
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Conversion between a domain entity and its mongodb document form.
pub trait MongoDocument<E>: Serialize + DeserializeOwned + Unpin + Send + Sync {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn id_filter(entity: &E) -> Document;
}

pub async fn insert<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    entity: &E,
) -> anyhow::Result<()> {
    let doc = D::from_domain(entity);
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    entity: &E,
) -> anyhow::Result<()> {
    let doc = D::from_domain(entity);
    collection.replace_one(D::id_filter(entity), doc, None).await?;
    Ok(())
}

pub async fn find<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    filter: Document,
) -> Option<E> {
    match collection.find_one(filter, None).await {
        Ok(doc) => doc.map(|d| d.to_domain()),
        Err(err) => {
            error!("Mongodb find query failed: {:?}", err);
            None
        }
    }
}

pub async fn find_many<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    filter: Document,
) -> anyhow::Result<Vec<E>> {
    let cursor = collection.find(filter, None).await?;
    let docs: Vec<D> = cursor.try_collect().await?;
    Ok(docs.into_iter().map(|d| d.to_domain()).collect())
}

pub async fn delete<E, D: MongoDocument<E>>(
    collection: &Collection<D>,
    filter: Document,
) -> Option<E> {
    match collection.find_one_and_delete(filter, None).await {
        Ok(doc) => doc.map(|d| d.to_domain()),
        Err(err) => {
            error!("Mongodb delete query failed: {:?}", err);
            None
        }
    }
}
