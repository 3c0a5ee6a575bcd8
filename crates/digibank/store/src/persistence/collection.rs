//! Whole-file JSON collections.
//!
//! A collection is one file holding a JSON array of flat records. Every mutation reads
//! the whole array, changes it in memory and rewrites the file. Writers serialize on a
//! per-collection mutex and replace the file through a sibling temp file and a rename,
//! so readers never observe a partially written array.

use core::marker::PhantomData;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
    fs,
    io::AsyncWriteExt,
    sync::{Mutex, MutexGuard},
};

use crate::error::Result;

/// A record stored in a collection, keyed by a monotonic integer id.
pub trait Record: Serialize + DeserializeOwned {
    /// Name of the id field, as written in the collection file.
    const ID_FIELD: &'static str;

    /// Returns the id of this record.
    fn id(&self) -> u64;
}

/// A named collection of records backed by one JSON file.
pub struct Collection<R> {
    name: &'static str,
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

/// Exclusive write access to a collection, held for a whole read-modify-overwrite.
pub struct CollectionGuard<'a, R> {
    collection: &'a Collection<R>,
    _lock: MutexGuard<'a, ()>,
}

/// Returns one more than the largest id in `records`, or 1 when there are none.
pub fn next_id<R: Record>(records: &[R]) -> u64 {
    records.iter().map(Record::id).max().map_or(1, |max| max + 1)
}

impl<R: Record> Collection<R> {
    /// Creates a handle on `{data_dir}/{name}.json`. Performs no I/O.
    pub fn new(data_dir: &Path, name: &'static str) -> Self {
        Self {
            name,
            path: data_dir.join(format!("{name}.json")),
            lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes an empty array unless the file already exists.
    pub async fn ensure_exists(&self) -> Result<()> {
        let _lock = self.lock.lock().await;

        if fs::try_exists(&self.path).await? {
            return Ok(());
        }

        tracing::info!(collection = self.name, "creating empty collection file");
        self.write_atomically(&Vec::<R>::new()).await
    }

    /// Reads every record without taking the write lock.
    ///
    /// An absent file reads as empty. Content that does not parse also reads as empty
    /// and is reported at `warn` level.
    pub async fn read_all(&self) -> Result<Vec<R>> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    collection = self.name,
                    error = %err,
                    "collection file is corrupt, reading it as empty",
                );
                Ok(Vec::new())
            },
        }
    }

    /// Reads every record, failing on content that does not parse.
    ///
    /// Writers go through this path so that an unreadable file is never replaced by one
    /// holding only the records of the current write.
    async fn read_all_strict(&self) -> Result<Vec<R>> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok(Vec::new());
        };

        serde_json::from_slice(&bytes)
            .inspect_err(|err| {
                tracing::error!(
                    collection = self.name,
                    error = %err,
                    "collection file is corrupt, refusing to overwrite it",
                );
            })
            .map_err(From::from)
    }

    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Waits for exclusive write access.
    pub async fn lock(&self) -> CollectionGuard<'_, R> {
        CollectionGuard { collection: self, _lock: self.lock.lock().await }
    }

    async fn write_atomically(&self, records: &[R]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }
}

impl<R: Record> CollectionGuard<'_, R> {
    /// Reads every record. Unlike [`Collection::read_all`], corrupt content is an error.
    pub async fn read_all(&self) -> Result<Vec<R>> {
        self.collection.read_all_strict().await
    }

    pub async fn next_id(&self) -> Result<u64> {
        self.read_all().await.map(|records| next_id(&records))
    }

    pub async fn append_one(&self, record: R) -> Result<()> {
        let mut records = self.read_all().await?;
        records.push(record);
        self.overwrite_all(&records).await
    }

    pub async fn overwrite_all(&self, records: &[R]) -> Result<()> {
        tracing::debug!(
            collection = self.collection.name,
            id_field = R::ID_FIELD,
            count = records.len(),
            "overwriting collection",
        );
        self.collection.write_atomically(records).await
    }
}
