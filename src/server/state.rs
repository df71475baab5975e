use secrecy::SecretString;
use std::sync::Arc;

use crate::storage::Database;
use crate::tasks::{DailyTaskSelector, Quotas};

/// Shared state handed to every request handler.
pub struct AppState {
    pub db: Database,
    pub selector: DailyTaskSelector,
    pub admin_token: Option<SecretString>,
}

impl AppState {
    pub fn new(db: Database, quotas: Quotas, admin_token: Option<SecretString>) -> Arc<Self> {
        let selector = DailyTaskSelector::new(db.clone(), quotas);

        Arc::new(Self {
            db,
            selector,
            admin_token,
        })
    }
}
