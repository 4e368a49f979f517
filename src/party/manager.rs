//! Registry of parties.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::{Party, PartyError};
use crate::store::Partitions;
use crate::util::id::new_party_id;
use crate::wheel::SpinConfig;

pub type SharedParty = Arc<Mutex<Party>>;

#[derive(Clone, Default)]
pub struct PartyManager {
    parties: Arc<DashMap<String, SharedParty>>,
    root: String,
    spin_config: SpinConfig,
}

impl PartyManager {
    /// Each party stores its photos under `<root><party id>/`.
    pub fn new(root: impl Into<String>, spin_config: SpinConfig) -> Self {
        Self { parties: Arc::new(DashMap::new()), root: root.into(), spin_config }
    }

    pub fn create(&self) -> String {
        let id = new_party_id();
        let parts = Partitions::new(format!("{}{}", self.root, id));
        let party = Party::new(id.clone(), parts, self.spin_config);
        self.parties.insert(id.clone(), Arc::new(Mutex::new(party)));
        tracing::info!(party_id = %id, "party created");
        id
    }

    pub fn get(&self, id: &str) -> Result<SharedParty, PartyError> {
        self.parties.get(id).map(|p| p.value().clone()).ok_or(PartyError::NotFound)
    }

    pub fn remove(&self, id: &str) -> Option<SharedParty> {
        self.parties.remove(id).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize { self.parties.len() }

    pub fn is_empty(&self) -> bool { self.parties.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_remove() {
        let manager = PartyManager::new("parties/", SpinConfig::default());
        let a = manager.create();
        let b = manager.create();
        assert_ne!(a, b);
        assert_eq!(manager.len(), 2);

        let party = manager.get(&a).unwrap();
        assert_eq!(party.lock().partitions().root(), format!("parties/{a}/"));

        assert!(manager.remove(&a).is_some());
        assert!(matches!(manager.get(&a), Err(PartyError::NotFound)));
        assert!(manager.remove(&a).is_none());
    }
}
