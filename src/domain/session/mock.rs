//! Recording session for testing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Identifier, Namespace, Session, SessionProvider};
use crate::domain::registry::ModelRegistry;
use crate::domain::relation::{LocalTable, Relation};
use crate::domain::DomainError;

/// Call made against a [`RecordingSession`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    UseDatabase(Identifier),
    UseSchema(Identifier),
    Table(Identifier),
}

/// Session that accepts any namespace and records every call
pub struct RecordingSession {
    calls: Mutex<Vec<SessionCall>>,
    database: Mutex<Option<Identifier>>,
    schema: Mutex<Option<Identifier>>,
    tables: HashMap<Identifier, Arc<LocalTable>>,
    registry: Arc<dyn ModelRegistry>,
}

impl RecordingSession {
    pub fn new(registry: Arc<dyn ModelRegistry>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            database: Mutex::new(None),
            schema: Mutex::new(None),
            tables: HashMap::new(),
            registry,
        }
    }

    pub fn with_table(mut self, name: &str, table: LocalTable) -> Self {
        self.tables
            .insert(Identifier::new(name).unwrap(), Arc::new(table));
        self
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Session for RecordingSession {
    fn id(&self) -> &str {
        "recording"
    }

    async fn use_database(&self, database: &Identifier) -> Result<(), DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push(SessionCall::UseDatabase(database.clone()));
        *self.database.lock().unwrap() = Some(database.clone());
        *self.schema.lock().unwrap() = None;
        Ok(())
    }

    async fn use_schema(&self, schema: &Identifier) -> Result<(), DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push(SessionCall::UseSchema(schema.clone()));
        *self.schema.lock().unwrap() = Some(schema.clone());
        Ok(())
    }

    fn current_namespace(&self) -> Result<Option<Namespace>, DomainError> {
        let database = self.database.lock().unwrap().clone();
        let schema = self.schema.lock().unwrap().clone();
        Ok(database.zip(schema).map(|(db, schema)| Namespace::new(db, schema)))
    }

    async fn table(&self, name: &Identifier) -> Result<Relation, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push(SessionCall::Table(name.clone()));
        self.tables
            .get(name)
            .map(|table| Relation::new(name.as_str(), Arc::clone(table)))
            .ok_or_else(|| DomainError::not_found(format!("Table '{}' not found", name)))
    }

    fn model_registry(&self) -> Arc<dyn ModelRegistry> {
        Arc::clone(&self.registry)
    }
}

/// Provider handing out one shared session, or failing when empty
#[derive(Default)]
pub struct StaticSessionProvider {
    session: Option<Arc<RecordingSession>>,
}

impl StaticSessionProvider {
    pub fn new(session: Arc<RecordingSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn without_session() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn active_session(&self) -> Result<Arc<dyn Session>, DomainError> {
        match &self.session {
            Some(session) => Ok(Arc::clone(session) as Arc<dyn Session>),
            None => Err(DomainError::session("No active session")),
        }
    }
}
