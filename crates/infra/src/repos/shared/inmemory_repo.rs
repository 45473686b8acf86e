use gifting_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

/// Inserts the value unless `conflicts` matches an existing item.
/// Returns whether it was inserted
pub fn insert_unless<T: Clone, F: Fn(&T) -> bool>(
    val: &T,
    collection: &Mutex<Vec<T>>,
    conflicts: F,
) -> bool {
    let mut collection = collection.lock().unwrap();
    if collection.iter().any(conflicts) {
        return false;
    }
    collection.push(val.clone());
    true
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    for item in collection.iter_mut() {
        if item.id() == val.id() {
            *item = val.clone();
        }
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}

/// Applies `update` to the item with the given id while holding the lock,
/// so that the checks done by `update` and its writes are atomic.
/// Returns what `update` returned, or `false` when there is no such item
pub fn update_one<T: Entity, U: FnOnce(&mut T) -> bool>(
    val_id: &ID,
    collection: &Mutex<Vec<T>>,
    update: U,
) -> bool {
    let mut collection = collection.lock().unwrap();
    match collection.iter_mut().find(|item| item.id() == val_id) {
        Some(item) => update(item),
        None => false,
    }
}
