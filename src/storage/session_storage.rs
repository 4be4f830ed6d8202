use std::{
    collections::HashMap,
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, instrument, warn};

use crate::utils::time::date_to_record_name;

use super::entities::SessionEntity;

/// Interface for abstracting storage of sessions.
pub trait SessionStorage {
    /// Appends sessions to the log of a certain day. A session that already exists in the log is
    /// replaced by the appended version.
    fn append(
        &self,
        date: NaiveDate,
        sessions: Vec<SessionEntity>,
    ) -> impl Future<Output = Result<()>>;

    /// Retrieves the latest version of every session stored for a certain day.
    fn get_data_for(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SessionEntity>>> + Send;
}

impl<T: Deref> SessionStorage for T
where
    T::Target: SessionStorage,
{
    fn append(
        &self,
        date: NaiveDate,
        sessions: Vec<SessionEntity>,
    ) -> impl Future<Output = Result<()>> {
        self.deref().append(date, sessions)
    }

    fn get_data_for(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SessionEntity>>> + Send {
        self.deref().get_data_for(date)
    }
}

/// The main realization of [SessionStorage]. Every day is a separate file with a json session on
/// each line.
pub struct SessionStorageImpl {
    session_dir: PathBuf,
}

impl SessionStorageImpl {
    pub fn new(session_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&session_dir)?;

        Ok(Self { session_dir })
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.session_dir.join(date_to_record_name(date))
    }

    async fn get_all_inner(path: &Path) -> Result<Vec<SessionEntity>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<SessionEntity>, std::io::Error> {
            debug!("Extracting {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let mut buffer = BufReader::new(file);
            let mut line = Vec::<u8>::new();
            let mut sessions = vec![];
            // Lines are decoded one by one, so a line that isn't even utf-8 only loses itself.
            while buffer.read_until(b'\n', &mut line).await? > 0 {
                if !line.trim_ascii().is_empty() {
                    match serde_json::from_slice::<SessionEntity>(&line) {
                        Ok(v) => sessions.push(v),
                        Err(e) => {
                            // Incomplete sessions can't be placed on a timeline, so they are
                            // skipped the same way as lines cut off by a crash.
                            warn!(
                                "During parsing in path {:?} found illegal json string {}:  {e}",
                                path,
                                String::from_utf8_lossy(&line).trim_end()
                            )
                        }
                    }
                }
                line.clear();
            }

            buffer.into_inner().unlock_async().await?;

            Ok(sessions)
        }

        match extract(path).await {
            Ok(s) => Ok(latest_versions(s)),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }

    async fn append_inner(path: &Path, sessions: Vec<SessionEntity>) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        for session in sessions {
            serde_json::to_writer(&mut buffer, &session)?;
            buffer.push(b'\n');
        }

        let mut file = File::options()
            .append(true)
            .create(true)
            .open(path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = async {
            file.write_all(&buffer).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        Ok(result?)
    }
}

impl SessionStorage for SessionStorageImpl {
    #[instrument(skip(self, sessions), fields(count = sessions.len()))]
    async fn append(&self, date: NaiveDate, sessions: Vec<SessionEntity>) -> Result<()> {
        let path = self.path_for(date);
        Self::append_inner(&path, sessions).await
    }

    async fn get_data_for(&self, date: NaiveDate) -> Result<Vec<SessionEntity>> {
        let path = self.path_for(date);
        Self::get_all_inner(&path).await
    }
}

/// Leaves only the last written version of each session. Sessions keep the position of their
/// first appearance.
fn latest_versions(sessions: Vec<SessionEntity>) -> Vec<SessionEntity> {
    let mut positions = HashMap::<Arc<str>, usize>::new();
    let mut latest: Vec<SessionEntity> = vec![];
    for session in sessions {
        match positions.get(&session.id) {
            Some(&position) => latest[position] = session,
            None => {
                positions.insert(session.id.clone(), latest.len());
                latest.push(session);
            }
        }
    }
    latest
}
