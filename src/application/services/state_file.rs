//! JSON snapshot persistence.
//!
//! A snapshot file holds the structured form of one `SwitchState`. Loading
//! publishes the whole tree before handing it out; saving writes to a
//! sibling temp file and renames it over the target.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{traversal, SwitchState};

#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
    pretty: bool,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and publish the snapshot.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> ApplicationResult<Arc<SwitchState>> {
        let text = std::fs::read_to_string(&self.path).with_path_context("read state", &self.path)?;
        let state = SwitchState::from_json(&text)?.into_published();
        debug!(nodes = traversal::count_nodes(state.as_ref()), "state loaded");
        Ok(state)
    }

    #[instrument(level = "debug", skip(self, state), fields(path = %self.path.display()))]
    pub fn save(&self, state: &SwitchState) -> ApplicationResult<()> {
        let mut text = state.to_json(self.pretty)?;
        text.push('\n');

        let tmp = self.temp_path();
        std::fs::write(&tmp, text).with_path_context("write state", &tmp)?;
        std::fs::rename(&tmp, &self.path).with_path_context("replace state", &self.path)?;
        debug!(generation = state.generation(), "state saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
