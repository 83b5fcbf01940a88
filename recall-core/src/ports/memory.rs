use crate::{CoreError, Persistence, StoreImage};
use parking_lot::RwLock;

/// Keeps the last saved image in memory. Used for ephemeral stores and tests.
#[derive(Default)]
pub struct MemoryPersistence {
    image: RwLock<StoreImage>,
    saves: RwLock<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(image: StoreImage) -> Self {
        Self {
            image: RwLock::new(image),
            saves: RwLock::new(0),
        }
    }

    pub fn snapshot(&self) -> StoreImage {
        self.image.read().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.read()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<StoreImage, CoreError> {
        Ok(self.image.read().clone())
    }

    fn save(&self, image: &StoreImage) -> Result<(), CoreError> {
        *self.image.write() = image.clone();
        *self.saves.write() += 1;
        Ok(())
    }
}
