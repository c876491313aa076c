use license_curator::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock HistoryStore keeping the history in memory across use case instances
#[derive(Default, Clone)]
pub struct MockHistoryStore {
    pub history: Arc<Mutex<Option<LicenseHistory>>>,
    pub save_count: Arc<Mutex<usize>>,
}

impl MockHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<LicenseHistory> {
        self.history.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

impl HistoryStore for MockHistoryStore {
    type Lock = ();

    fn lock(&self) -> Result<()> {
        Ok(())
    }

    fn load(&self) -> Result<Option<LicenseHistory>> {
        Ok(self.current())
    }

    fn save_all(&self, history: &LicenseHistory) -> Result<()> {
        *self.history.lock().unwrap() = Some(history.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}
