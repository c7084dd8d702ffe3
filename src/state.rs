use std::sync::Arc;

use crate::config::Config;
use crate::notion::NotionClient;
use crate::schema::FormRegistry;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub forms: FormRegistry,
    pub notion: NotionClient,
}
