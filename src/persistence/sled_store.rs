//! Session token store backed by `sled`
//!
//! A single `session` tree holds the current bearer token under the
//! `vote_token` key, serialized as JSON together with the time it was saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use tracing::warn;

use crate::utils::Result;

const SESSION_TREE: &str = "session";
const TOKEN_KEY: &str = "vote_token";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredToken {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    _db: Db,
    tree: Tree,
}

impl SessionStore {
    /// Open or create a sled database at `path`.
    pub fn open(path: &str) -> Result<Self> {
        let db = sled::open(path)?;
        let tree = db.open_tree(SESSION_TREE)?;
        Ok(Self { _db: db, tree })
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let serialized = serde_json::to_vec(&stored)?;
        self.tree.insert(TOKEN_KEY, serialized)?;
        self.tree.flush()?;
        Ok(())
    }

    /// The stored token, if any. A record that no longer decodes is treated
    /// as absent and removed.
    pub fn load_token(&self) -> Result<Option<StoredToken>> {
        let Some(raw) = self.tree.get(TOKEN_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_slice::<StoredToken>(&raw) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                warn!("Discarding unreadable session record: {e}");
                self.clear_token()?;
                Ok(None)
            }
        }
    }

    pub fn clear_token(&self) -> Result<()> {
        self.tree.remove(TOKEN_KEY)?;
        self.tree.flush()?;
        Ok(())
    }
}
