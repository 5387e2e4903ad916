use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::conversation::ConversationController;
use crate::core::endpoint::{EndpointError, GenerateEndpoint};
use crate::core::session_store::SessionStore;
use crate::core::storage::MemoryStore;

#[derive(Default)]
struct Script {
    steps: VecDeque<Result<String, ()>>,
    queries: Vec<String>,
}

/// Endpoint that answers from a fixed script and records what it was asked.
///
/// `Err(())` steps fail with a 500 status. An exhausted script fails too.
#[derive(Clone, Default)]
pub struct ScriptedEndpoint {
    script: Arc<Mutex<Script>>,
}

impl ScriptedEndpoint {
    pub fn script<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Result<&'static str, ()>>,
    {
        let steps = steps
            .into_iter()
            .map(|step| step.map(str::to_string))
            .collect();
        Self {
            script: Arc::new(Mutex::new(Script {
                steps,
                queries: Vec::new(),
            })),
        }
    }

    pub fn replies<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self::script(replies.into_iter().map(Ok))
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn queries(&self) -> Vec<String> {
        self.script.lock().unwrap().queries.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().queries.len()
    }
}

#[async_trait]
impl GenerateEndpoint for ScriptedEndpoint {
    async fn generate(&self, query: &str) -> Result<String, EndpointError> {
        let mut script = self.script.lock().unwrap();
        script.queries.push(query.to_string());
        match script.steps.pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(())) | None => Err(EndpointError::Status {
                status: 500,
                summary: "scripted failure".to_string(),
            }),
        }
    }
}

pub fn create_test_controller(endpoint: ScriptedEndpoint) -> ConversationController<MemoryStore> {
    ConversationController::new(SessionStore::load(MemoryStore::new()), Arc::new(endpoint))
}
