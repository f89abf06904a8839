use crate::form::DraftForm;
use crate::models::FilterSelection;
use crate::store::TaskStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything one page view works against: the store plus the transient
/// draft and filter, which are never persisted.
#[derive(Debug)]
pub struct Board {
    pub store: TaskStore,
    pub draft: DraftForm,
    pub filter: FilterSelection,
}

impl Board {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            draft: DraftForm::default(),
            filter: FilterSelection::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Mutex<Board>>,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self {
            board: Arc::new(Mutex::new(Board::new(store))),
        }
    }
}
