use medimate_domain::{Entity, ID};
use std::sync::Mutex;

pub fn insert<T: Entity + Clone>(entity: &T, collection: &Mutex<Vec<T>>) -> anyhow::Result<()> {
    let mut collection = collection.lock().unwrap();
    collection.push(entity.clone());
    Ok(())
}

pub fn save<T: Entity + Clone>(entity: &T, collection: &Mutex<Vec<T>>) -> anyhow::Result<()> {
    let mut collection = collection.lock().unwrap();
    if let Some(pos) = collection.iter().position(|e| e.id() == entity.id()) {
        collection[pos] = entity.clone();
    }
    Ok(())
}

pub fn find<T: Entity + Clone>(id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|e| e.id() == id).cloned()
}

pub fn find_by<T: Entity + Clone, F: Fn(&T) -> bool>(
    pred: F,
    collection: &Mutex<Vec<T>>,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|e| pred(e)).cloned().collect()
}

pub fn delete<T: Entity + Clone>(id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    let pos = collection.iter().position(|e| e.id() == id)?;
    Some(collection.remove(pos))
}
