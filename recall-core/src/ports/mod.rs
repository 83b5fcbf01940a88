use crate::{CoreError, Deck, DeckId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod clock;
pub mod lookup;
pub mod memory;

pub use clock::*;
pub use lookup::*;
pub use memory::*;

/// Everything the store persists: deck data and the current-deck pointer.
/// Session state is never part of it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreImage {
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub current_deck_id: Option<DeckId>,
}

pub trait Persistence: Send + Sync {
    /// Returns an empty image when nothing has been stored yet.
    fn load(&self) -> Result<StoreImage, CoreError>;
    fn save(&self, image: &StoreImage) -> Result<(), CoreError>;
}

impl<P: Persistence + ?Sized> Persistence for std::sync::Arc<P> {
    fn load(&self) -> Result<StoreImage, CoreError> {
        (**self).load()
    }

    fn save(&self, image: &StoreImage) -> Result<(), CoreError> {
        (**self).save(image)
    }
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
