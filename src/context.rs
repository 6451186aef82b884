//! Service context that bundles the storage port for the current mode.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::supabase::SupabaseStore;
use crate::adapters::recording::object_store::RecordingObjectStore;
use crate::adapters::replaying::object_store::ReplayingObjectStore;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::Error;
use crate::ports::ObjectStore;

/// Environment variable naming a cassette to replay instead of going live.
pub const REPLAY_ENV: &str = "TREMOR_REPLAY";
/// Environment variable that turns on recording (`1` or `true`).
pub const RECORD_ENV: &str = "TREMOR_REC";

/// Bundles the port trait objects used by the viewer.
pub struct ServiceContext {
    /// Object storage port.
    pub store: Box<dyn ObjectStore>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, Error> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| Error::Config("Recording adapter still has references".into()))?
            .into_inner()
            .map_err(|e| Error::Config(format!("Recorder lock poisoned: {e}")))?;
        recorder.finish()
    }
}

impl ServiceContext {
    /// Pick live, recording or replaying mode from the environment.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the chosen constructor.
    pub async fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), Error> {
        if let Ok(cassette) = std::env::var(REPLAY_ENV) {
            tracing::info!(cassette = %cassette, "replaying storage interactions");
            return Ok((Self::replaying(Path::new(&cassette))?, None));
        }
        if std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1") {
            tracing::info!("recording storage interactions");
            let (ctx, session) = Self::recording(config).await?;
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(config).await?, None))
    }

    /// Open a live session against the configured storage service.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or rejected.
    pub async fn live(config: &Config) -> Result<Self, Error> {
        let url = config.storage_url()?;
        let key = config.storage_key()?;
        let store = SupabaseStore::connect(&url, &key, config.request_timeout()).await?;
        Ok(Self { store: Box::new(store) })
    }

    /// Open a live session wrapped in a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live session cannot be opened.
    pub async fn recording(config: &Config) -> Result<(Self, RecordingSession), Error> {
        let live_ctx = Self::live(config).await?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".tremor-templates/cassettes")
            .join(&timestamp)
            .join("object_store.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-object_store"),
            get_commit_hash(),
        )));

        let store = RecordingObjectStore::new(live_ctx.store, Arc::clone(&recorder));
        Ok((Self { store: Box::new(store) }, RecordingSession { recorder }))
    }

    /// Serve storage calls from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, Error> {
        let replayer = Arc::new(Mutex::new(CassetteReplayer::from_file(path)?));
        Ok(Self { store: Box::new(ReplayingObjectStore::new(replayer)) })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
