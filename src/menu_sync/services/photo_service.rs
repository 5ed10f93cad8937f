// src/menu_sync/services/photo_service.rs
// Gallery queries and mutations for one language partition at a time.

use crate::client::SyncClient;
use crate::error::SyncError;
use crate::models::{sort_by_display_order, Language, MenuPhoto, PhotoId};
use crate::storage::{CachedValue, QueryKey};
use tracing::{debug, info, warn};

/// Direction of a single-step move in the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Applies `requested` to a snapshot: each requested id takes its index as
/// `display_order`. Ids missing from the snapshot are skipped, and photos the
/// request does not list are left out until the refetch brings them back.
pub fn optimistic_reorder(snapshot: &[MenuPhoto], requested: &[PhotoId]) -> Vec<MenuPhoto> {
    requested
        .iter()
        .enumerate()
        .filter_map(|(index, id)| {
            snapshot.iter().find(|photo| &photo.id == id).map(|photo| MenuPhoto {
                display_order: index as u64,
                ..photo.clone()
            })
        })
        .collect()
}

/// Full id order after swapping `id` with its neighbour, or `None` when the
/// photo is unknown or already at that edge.
pub fn swapped_order(photos: &[MenuPhoto], id: &str, direction: Direction) -> Option<Vec<PhotoId>> {
    let index = photos.iter().position(|photo| photo.id == id)?;
    let neighbour = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => Some(index + 1).filter(|next| *next < photos.len())?,
    };
    let mut order: Vec<PhotoId> = photos.iter().map(|photo| photo.id.clone()).collect();
    order.swap(index, neighbour);
    Some(order)
}

impl SyncClient {
    /// Photos of `language` sorted by `display_order`, served from the cache
    /// while fresh. Without an actor this is an empty list.
    pub async fn menu_photos(&self, language: Language) -> Result<Vec<MenuPhoto>, SyncError> {
        if self.actor().is_none() {
            return Ok(Vec::new());
        }
        let key = QueryKey::MenuPhotos(language);
        match self.fresh(&key, CachedValue::into_photos) {
            Some(photos) => Ok(photos),
            None => self.fetch_menu_photos(language).await,
        }
    }

    /// Whatever the cache currently holds for `language`, fresh or not.
    pub fn cached_menu_photos(&self, language: Language) -> Option<Vec<MenuPhoto>> {
        self.cache
            .get(&QueryKey::MenuPhotos(language))
            .and_then(CachedValue::into_photos)
    }

    pub async fn fetch_menu_photos(&self, language: Language) -> Result<Vec<MenuPhoto>, SyncError> {
        let Some(actor) = self.actor() else {
            return Ok(Vec::new());
        };
        let call = async move {
            let mut photos = actor.get_photos(language).await?;
            sort_by_display_order(&mut photos);
            Ok::<_, SyncError>(photos)
        };
        self.run_query(
            QueryKey::MenuPhotos(language),
            "get_photos",
            CachedValue::Photos,
            CachedValue::into_photos,
            call,
        )
        .await
    }

    pub async fn delete_photo(&self, language: Language, id: &str) -> Result<(), SyncError> {
        let actor = self.require_actor()?;
        self.remote("delete_photo", actor.delete_photo(language, id)).await?;
        info!(%language, id, "photo deleted");
        self.invalidate(QueryKey::MenuPhotos(language)).await;
        Ok(())
    }

    /// Sends a new gallery order. The cache shows the requested order right
    /// away, goes back to the exact previous list if the actor refuses, and is
    /// refetched either way, also when the partition was never loaded.
    ///
    /// # Errors
    ///
    /// `ActorUnavailable` before anything is touched, otherwise the actor's error.
    pub async fn reorder_photos(&self, language: Language, new_order: Vec<PhotoId>) -> Result<(), SyncError> {
        let actor = self.require_actor()?;
        let key = QueryKey::MenuPhotos(language);
        let _in_flight = self.track_reorder(language);

        // In-flight fetches must not overwrite the optimistic list
        if self.cache.cancel(&key) {
            debug!(%key, "cancelled in-flight fetch before reorder");
        }

        let snapshot = self.cached_menu_photos(language);
        if let Some(previous) = &snapshot {
            let optimistic = optimistic_reorder(previous, &new_order);
            if optimistic.len() != new_order.len() {
                debug!(
                    %language,
                    requested = new_order.len(),
                    known = optimistic.len(),
                    "reorder names photos missing from the cache"
                );
            }
            self.cache.set(&key, CachedValue::Photos(optimistic));
        }

        let result = self
            .remote("reorder_photos", actor.reorder_photos(language, new_order))
            .await;

        match &result {
            Ok(()) => info!(%language, "photos reordered"),
            Err(e) => {
                if let Some(previous) = snapshot {
                    warn!(%language, error = %e, "reorder failed, restoring previous order");
                    self.cache.set(&key, CachedValue::Photos(previous));
                }
            }
        }

        self.settle(key).await;
        result
    }

    /// Swaps `id` with its neighbour in `direction`. Returns `false` when
    /// nothing was sent: the photo is at the edge, unknown, or a reorder of
    /// this language is still in flight.
    pub async fn move_photo(&self, language: Language, id: &str, direction: Direction) -> Result<bool, SyncError> {
        self.require_actor()?;
        if self.is_reordering(language) {
            debug!(%language, id, "move ignored while a reorder is in flight");
            return Ok(false);
        }
        let photos = self.menu_photos(language).await?;
        let Some(order) = swapped_order(&photos, id, direction) else {
            return Ok(false);
        };
        self.reorder_photos(language, order).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhotoBlob;

    fn photo(id: &str, display_order: u64) -> MenuPhoto {
        MenuPhoto {
            id: id.to_string(),
            image: PhotoBlob::Url(format!("https://cdn.test/{}", id)),
            display_order,
            name: format!("{}.webp", id),
            language: Language::Es,
        }
    }

    fn ids(photos: &[MenuPhoto]) -> Vec<&str> {
        photos.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn optimistic_order_uses_request_index() {
        let snapshot = vec![photo("a", 0), photo("b", 1), photo("c", 2)];
        let reordered = optimistic_reorder(&snapshot, &["c".into(), "a".into(), "b".into()]);

        assert_eq!(ids(&reordered), vec!["c", "a", "b"]);
        let ranks: Vec<u64> = reordered.iter().map(|p| p.display_order).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert_eq!(reordered[0].image, snapshot[2].image);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let snapshot = vec![photo("a", 0), photo("b", 1)];
        let reordered = optimistic_reorder(&snapshot, &["ghost".into(), "b".into(), "a".into()]);

        assert_eq!(ids(&reordered), vec!["b", "a"]);
        assert_eq!(reordered[0].display_order, 1);
        assert_eq!(reordered[1].display_order, 2);
    }

    #[test]
    fn reapplying_an_order_is_stable() {
        let snapshot = vec![photo("a", 0), photo("b", 1), photo("c", 2)];
        let order: Vec<PhotoId> = vec!["b".into(), "c".into(), "a".into()];

        let once = optimistic_reorder(&snapshot, &order);
        let twice = optimistic_reorder(&once, &order);
        assert_eq!(once, twice);
    }

    #[test]
    fn swaps_stop_at_the_edges() {
        let photos = vec![photo("a", 0), photo("b", 1), photo("c", 2)];

        assert_eq!(
            swapped_order(&photos, "b", Direction::Up),
            Some(vec!["b".into(), "a".into(), "c".into()])
        );
        assert_eq!(
            swapped_order(&photos, "b", Direction::Down),
            Some(vec!["a".into(), "c".into(), "b".into()])
        );
        assert_eq!(swapped_order(&photos, "a", Direction::Up), None);
        assert_eq!(swapped_order(&photos, "c", Direction::Down), None);
        assert_eq!(swapped_order(&photos, "zzz", Direction::Down), None);
    }
}
