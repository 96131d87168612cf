use std::sync::Arc;

use crate::api::{ApiClient, AuthApi, Credentials};
use crate::config::ClientConfig;
use crate::error::{BootError, ClientError};
use crate::navigation::{
    AuthSessionGuard, NavigationController, NavigationError, NavigationOutcome, NavigationTable,
};
use crate::session::{FileStorage, LocalStorage, SessionState, StorageWarning, User};
use crate::store::{ProjectStore, SprintStore, Task, TaskStore};
use crate::sync::{EntitySync, SyncOutcome};

/// Composition root: every stateful piece is built here and handed out by reference
#[derive(Debug)]
pub struct ClientApp {
    pub session: SessionState,
    pub navigation: NavigationController,
    pub tasks: TaskStore,
    pub projects: ProjectStore,
    pub sprints: SprintStore,
    api: ApiClient,
}

impl ClientApp {
    pub fn new(config: &ClientConfig, storage: Arc<dyn LocalStorage>) -> Result<Self, BootError> {
        let session = SessionState::hydrate(Arc::clone(&storage));
        let api = ApiClient::from_config(&config.api, storage)?;

        let guard = AuthSessionGuard::new(
            config.navigation.login_route.clone(),
            config.navigation.home_route.clone(),
        );
        let navigation =
            NavigationController::new(NavigationTable::standard()?, guard, config.navigation.max_redirects);

        tracing::debug!(base_url = %api.base_url(), authenticated = session.is_authenticated(), "client ready");

        Ok(Self {
            session,
            navigation,
            tasks: TaskStore::new(),
            projects: ProjectStore::new(),
            sprints: SprintStore::new(),
            api,
        })
    }

    /// Build against the file-backed storage named by `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self, BootError> {
        let dir = match &config.storage.dir {
            Some(dir) => dir.clone(),
            None => FileStorage::default_dir()?,
        };
        Self::new(config, Arc::new(FileStorage::new(dir)))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn navigate(&mut self, path: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigation.navigate(path, &self.session)
    }

    /// Sign in against the remote. The session is set even when persisting it
    /// fails; those failures come back beside the user.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(User, Vec<StorageWarning>), ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&credentials).await?;
        let user = response.user.clone();
        let warnings = self.session.sign_in(response.user, response.token);
        Ok((user, warnings))
    }

    pub fn logout(&mut self) -> Vec<StorageWarning> {
        self.session.clear()
    }

    // ========================================
    // Tasks and projects
    // ========================================

    pub async fn refresh_tasks(&mut self) -> Result<usize, ClientError> {
        let result = EntitySync::new(&self.api).refresh(&mut self.tasks).await;
        self.watch(result)
    }

    pub async fn refresh_projects(&mut self) -> Result<usize, ClientError> {
        let result = EntitySync::new(&self.api).refresh(&mut self.projects).await;
        self.watch(result)
    }

    pub async fn refresh_sprints(&mut self) -> Result<usize, ClientError> {
        let result = EntitySync::new(&self.api).refresh(&mut self.sprints).await;
        self.watch(result)
    }

    pub async fn add_task(&mut self, task: Task) -> SyncOutcome<(), Task> {
        let mut outcome = EntitySync::new(&self.api).add(&mut self.tasks, task).await;
        outcome.remote = self.watch(outcome.remote);
        outcome
    }

    pub async fn update_task(&mut self, task: Task) -> SyncOutcome<bool, Task> {
        let mut outcome = EntitySync::new(&self.api).update(&mut self.tasks, task).await;
        outcome.remote = self.watch(outcome.remote);
        outcome
    }

    pub async fn delete_task(&mut self, id: u64) -> SyncOutcome<usize, ()> {
        let mut outcome = EntitySync::new(&self.api).delete(&mut self.tasks, &id).await;
        outcome.remote = self.watch(outcome.remote);
        outcome
    }

    /// A 401 means the stored credential is dead; drop the session
    fn watch<R>(&mut self, result: Result<R, ClientError>) -> Result<R, ClientError> {
        if let Err(e) = &result {
            if e.is_unauthorized() && self.session.is_authenticated() {
                self.session.invalidate(&e.to_string());
            }
        }
        result
    }
}
