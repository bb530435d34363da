use tracing::{error, info, warn};

use crate::gateway::ApiClient;
use crate::model::User;
use crate::persistence::SessionStore;
use crate::utils::Result;

/// Holds the authenticated user and keeps the API client's bearer token and
/// the on-disk token store in step.
#[derive(Debug)]
pub struct SessionProvider {
    api: ApiClient,
    store: SessionStore,
    user: Option<User>,
}

impl SessionProvider {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            user: None,
        }
    }

    /// Re-validate a previously stored token with `GET /auth/me`.
    ///
    /// A token that fails validation is removed from the store; the provider
    /// is then simply unauthenticated.
    pub async fn restore(&mut self) -> Result<Option<&User>> {
        let Some(stored) = self.store.load_token()? else {
            return Ok(None);
        };

        self.api.set_token(Some(stored.token));
        match self.api.me().await {
            Ok(user) => {
                info!("Restored session for {}", user.corporate_id);
                self.user = Some(user);
            }
            Err(e) => {
                error!("Session validation failed: {e}");
                self.api.set_token(None);
                self.store.clear_token()?;
                self.user = None;
            }
        }
        Ok(self.user.as_ref())
    }

    /// Log in and persist the returned token. Returns the server's message.
    pub async fn login(&mut self, corporate_id: &str, pin: &str) -> Result<String> {
        let (response, message) = self.api.login(corporate_id, pin).await?;
        self.store.save_token(&response.token)?;
        self.user = Some(response.user);
        Ok(message)
    }

    /// Log out. Local state is cleared even when the server call fails.
    pub async fn logout(&mut self) -> Result<()> {
        let remote = self.api.logout().await;
        if let Err(e) = &remote {
            warn!("Logout request failed, clearing local session anyway: {e}");
        }
        self.user = None;
        self.api.set_token(None);
        self.store.clear_token()?;
        remote
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The credential to open the push channel with, when authenticated.
    pub fn token(&self) -> Option<String> {
        if self.is_authenticated() {
            self.api.token()
        } else {
            None
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
