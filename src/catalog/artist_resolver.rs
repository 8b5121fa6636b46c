//! Identity resolution for artists.
//!
//! Artists are identified case-insensitively by name. Resolution normalizes
//! the input (trim + lower-case), looks the canonical name up, and creates
//! the artist on a miss. The lookup-then-create sequence is not atomic; the
//! store's uniqueness constraint on the canonical name is the backstop, and
//! a creation that loses the race falls back to a single retry of the
//! lookup.

use crate::catalog_store::{new_entity_id, Artist, CatalogError, CatalogStore};
use anyhow::anyhow;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ArtistResolver {
    store: Arc<dyn CatalogStore>,
}

impl ArtistResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        ArtistResolver { store }
    }

    /// Return the canonical artist for `name_input`, creating one if no
    /// artist matches case-insensitively.
    pub fn resolve_or_create(&self, name_input: &str) -> Result<Artist, CatalogError> {
        let trimmed = name_input.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::Validation("Name is required".to_string()));
        }
        let canonical = trimmed.to_lowercase();

        if let Some(existing) = self.store.find_artist_by_canonical_name(&canonical)? {
            return Ok(existing);
        }

        let artist = Artist {
            id: new_entity_id(),
            name: canonical.clone(),
        };
        match self.store.insert_artist(&artist) {
            Ok(()) => {
                debug!("Created artist '{}' ({})", artist.name, artist.id);
                Ok(artist)
            }
            Err(CatalogError::Conflict(_)) => {
                // Someone else created it concurrently; take their record.
                self.store
                    .find_artist_by_canonical_name(&canonical)?
                    .ok_or_else(|| {
                        CatalogError::Store(anyhow!(
                            "artist '{}' missing after creation conflict",
                            canonical
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }
}
