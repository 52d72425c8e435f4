use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, info, warn};

use crate::config::CompanionConfig;
use crate::error::{BridgeError, Result};

/// A supervised companion subprocess.
///
/// The companion is an opaque executable: it is spawned, observed for
/// liveness, and killed on teardown. No stdio protocol is spoken with it;
/// all communication happens over its loopback socket.
#[derive(Debug)]
pub struct Companion {
    child: Child,
    path: PathBuf,
}

impl Companion {
    /// Spawn the companion binary at `path` with the configured arguments.
    pub fn launch(config: &CompanionConfig, path: &Path) -> Result<Self> {
        let child = Command::new(path)
            .args(&config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| BridgeError::Launch {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), pid = child.id(), "launched companion process");
        Ok(Self {
            child,
            path: path.to_path_buf(),
        })
    }

    /// Whether the subprocess is still alive.
    ///
    /// Note this is independent of socket liveness: a connected socket
    /// does not imply the process is running, and vice versa.
    pub fn is_running(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) => false,
            Err(err) => {
                warn!(%err, "failed to poll companion process");
                false
            }
        }
    }

    /// OS process id.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Kill the subprocess and reap it.
    pub fn stop(&mut self) {
        if let Err(err) = self.child.kill() {
            // Already exited is the common case here.
            debug!(%err, path = %self.path.display(), "companion kill returned error");
        }
        let _ = self.child.wait();
        debug!(path = %self.path.display(), "companion process stopped");
    }
}

impl Drop for Companion {
    fn drop(&mut self) {
        self.stop();
    }
}
