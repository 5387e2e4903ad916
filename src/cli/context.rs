use std::error::Error;
use std::sync::Arc;

use tracing::info;

use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::conversation::ConversationController;
use crate::core::endpoint::GeminiClient;
use crate::core::session_store::SessionStore;
use crate::core::storage::FileStore;

pub type Controller = ConversationController<FileStore>;

/// History store under the configured data dir, or the platform default.
pub fn open_file_store(config: &Config) -> Result<FileStore, Box<dyn Error>> {
    match &config.data_dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => FileStore::default_location(),
    }
}

pub fn open_session_store(config: &Config) -> Result<SessionStore<FileStore>, Box<dyn Error>> {
    let backend = open_file_store(config)?;
    info!(dir = %path_display(backend.dir()), "opening conversation history");
    Ok(SessionStore::load(backend))
}

/// Controller wired to the Gemini endpoint and the on-disk history.
pub fn open_controller(config: &Config) -> Result<Controller, Box<dyn Error>> {
    let settings = config.resolve()?;
    let endpoint = GeminiClient::new(&settings.base_url, &settings.model, &settings.api_key)?;
    let store = open_session_store(config)?;
    info!(model = %settings.model, "endpoint configured");
    Ok(ConversationController::new(store, Arc::new(endpoint)))
}
