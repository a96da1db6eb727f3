//! Folder uploader
//!
//! Ensures the destination container exists, then uploads every file of the
//! source tree one at a time in traversal order. The first traversal or upload
//! error stops the run; objects uploaded before it are left in place.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::UploadConfig;
use crate::error::{Error, Result};
use crate::key::object_key;
use crate::traits::{ObjectStore, UploadRecord};
use crate::transfer::TransferOptions;
use crate::walk::{SourceFile, SourceFiles};

/// A file paired with the key it will be stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpload {
    pub source: SourceFile,
    pub key: String,
}

/// Lazy sequence of planned uploads
pub struct UploadPlan<'a> {
    files: SourceFiles,
    prefix: Option<&'a str>,
}

impl Iterator for UploadPlan<'_> {
    type Item = Result<PlannedUpload>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.files.next()?.map(|source| {
            let key = object_key(self.prefix, &source.relative);
            PlannedUpload { source, key }
        });
        Some(item)
    }
}

/// Progress notifications emitted during a run
///
/// All methods default to doing nothing.
pub trait UploadObserver {
    /// The create-container request failed; the run continues
    fn container_not_created(&self, _container: &str, _error: &Error) {}

    /// A file is about to be uploaded
    fn upload_started(&self, _planned: &PlannedUpload) {}

    /// A file was uploaded
    fn upload_finished(&self, _record: &UploadRecord) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl UploadObserver for Silent {}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub container: String,
    pub folder: String,
    pub files: Vec<UploadRecord>,
    pub total_bytes: u64,
    pub total_human: String,
    pub started_at: jiff::Timestamp,
    pub finished_at: jiff::Timestamp,
}

impl UploadSummary {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Uploads a validated configuration's folder through an [`ObjectStore`]
pub struct FolderUploader<'a, S: ?Sized> {
    config: &'a UploadConfig,
    store: &'a S,
    options: TransferOptions,
}

impl<'a, S> FolderUploader<'a, S>
where
    S: ObjectStore + ?Sized,
{
    pub fn new(config: &'a UploadConfig, store: &'a S) -> Self {
        Self {
            config,
            store,
            options: TransferOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }

    /// Files and keys that a run would upload, without touching the store
    pub fn plan(&self) -> UploadPlan<'a> {
        plan(self.config)
    }

    /// Ask the store to create the container, logging any failure
    pub async fn ensure_container(&self, observer: &dyn UploadObserver) {
        let container = self.config.container();
        match self.store.create_container(container).await {
            Ok(()) => tracing::info!(container, "container created"),
            Err(e) => {
                tracing::warn!(container, error = %e, "container creation failed (it may already exist)");
                observer.container_not_created(container, &e);
            }
        }
    }

    /// Upload the whole folder
    pub async fn run(&self, observer: &dyn UploadObserver) -> Result<UploadSummary> {
        let started_at = jiff::Timestamp::now();

        self.ensure_container(observer).await;

        let container = self.config.container();
        let mut files = Vec::new();

        for planned in self.plan() {
            let planned = planned?;
            observer.upload_started(&planned);

            let record = self
                .store
                .upload_file(container, &planned.key, &planned.source.path, &self.options)
                .await
                .map_err(|e| Error::upload(&planned.source.path, e))?;

            tracing::debug!(source = %record.source, key = %record.key, bytes = record.size_bytes, "uploaded");
            observer.upload_finished(&record);
            files.push(record);
        }

        let total_bytes = files.iter().map(|f| f.size_bytes).sum();
        Ok(UploadSummary {
            container: container.to_string(),
            folder: self.config.local_folder().display().to_string(),
            files,
            total_bytes,
            total_human: humansize::format_size(total_bytes, humansize::BINARY),
            started_at,
            finished_at: jiff::Timestamp::now(),
        })
    }
}

/// Planned uploads for a configuration
pub fn plan(config: &UploadConfig) -> UploadPlan<'_> {
    UploadPlan {
        files: SourceFiles::new(PathBuf::from(config.local_folder())),
        prefix: config.subfolder(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::traits::MockObjectStore;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.txt"), b"bravo!").unwrap();
        dir
    }

    fn config(folder: &Path, subfolder: Option<&str>) -> UploadConfig {
        Settings {
            storage_account: Some("account".into()),
            container: Some("container".into()),
            subfolder: subfolder.map(String::from),
            local_folder: Some(folder.to_string_lossy().into_owned()),
            connection_string: None,
        }
        .validate()
        .unwrap()
    }

    fn keys(config: &UploadConfig) -> Vec<String> {
        plan(config).map(|p| p.unwrap().key).collect()
    }

    fn accept_uploads(store: &mut MockObjectStore) {
        store
            .expect_upload_file()
            .returning(|_, key, source, _| {
                let size = fs::metadata(source)?.len();
                Ok(UploadRecord::new(source, key, size))
            });
    }

    #[derive(Default)]
    struct Recorder {
        started: RefCell<Vec<String>>,
        finished: RefCell<Vec<String>>,
        container_failures: RefCell<usize>,
    }

    impl UploadObserver for Recorder {
        fn container_not_created(&self, _container: &str, _error: &Error) {
            *self.container_failures.borrow_mut() += 1;
        }

        fn upload_started(&self, planned: &PlannedUpload) {
            self.started.borrow_mut().push(planned.key.clone());
        }

        fn upload_finished(&self, record: &UploadRecord) {
            self.finished.borrow_mut().push(record.key.clone());
        }
    }

    #[test]
    fn test_plan_keys_without_prefix() {
        let dir = tree();
        assert_eq!(keys(&config(dir.path(), None)), vec!["a.txt", "sub/b.txt"]);
    }

    #[test]
    fn test_plan_keys_with_prefix() {
        let dir = tree();
        assert_eq!(
            keys(&config(dir.path(), Some("docs"))),
            vec!["docs/a.txt", "docs/sub/b.txt"]
        );
        assert_eq!(
            keys(&config(dir.path(), Some("docs/"))),
            vec!["docs/a.txt", "docs/sub/b.txt"]
        );
    }

    #[tokio::test]
    async fn test_run_uploads_every_file_in_order() {
        let dir = tree();
        let config = config(dir.path(), Some("docs"));

        let mut seq = Sequence::new();
        let mut store = MockObjectStore::new();
        store
            .expect_create_container()
            .with(eq("container"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        for key in ["docs/a.txt", "docs/sub/b.txt"] {
            store
                .expect_upload_file()
                .withf(move |container, k, _, options| {
                    container == "container" && k == key && *options == TransferOptions::default()
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, key, source, _| {
                    let size = fs::metadata(source)?.len();
                    Ok(UploadRecord::new(source, key, size))
                });
        }

        let recorder = Recorder::default();
        let summary = FolderUploader::new(&config, &store)
            .run(&recorder)
            .await
            .unwrap();

        assert_eq!(summary.file_count(), 2);
        assert_eq!(summary.total_bytes, 11);
        assert_eq!(summary.container, "container");
        assert_eq!(summary.files[0].source, dir.path().join("a.txt").display().to_string());
        assert_eq!(*recorder.started.borrow(), vec!["docs/a.txt", "docs/sub/b.txt"]);
        assert_eq!(*recorder.finished.borrow(), vec!["docs/a.txt", "docs/sub/b.txt"]);
    }

    #[tokio::test]
    async fn test_container_failure_is_not_fatal() {
        let dir = tree();
        let config = config(dir.path(), None);

        let mut store = MockObjectStore::new();
        store
            .expect_create_container()
            .times(1)
            .returning(|_| Err(Error::Network("ContainerAlreadyExists".into())));
        accept_uploads(&mut store);

        let recorder = Recorder::default();
        let summary = FolderUploader::new(&config, &store)
            .run(&recorder)
            .await
            .unwrap();

        assert_eq!(summary.file_count(), 2);
        assert_eq!(*recorder.container_failures.borrow(), 1);
    }

    #[tokio::test]
    async fn test_empty_folder_succeeds_with_zero_uploads() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("only-dirs")).unwrap();
        let config = config(dir.path(), None);

        let mut store = MockObjectStore::new();
        store.expect_create_container().times(1).returning(|_| Ok(()));
        store.expect_upload_file().never();

        let summary = FolderUploader::new(&config, &store)
            .run(&Silent)
            .await
            .unwrap();

        assert_eq!(summary.file_count(), 0);
        assert_eq!(summary.total_bytes, 0);
    }

    #[tokio::test]
    async fn test_failure_stops_remaining_uploads() {
        let dir = TempDir::new().unwrap();
        for name in ["1.txt", "2.txt", "3.txt"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let config = config(dir.path(), None);

        let mut seq = Sequence::new();
        let mut store = MockObjectStore::new();
        store.expect_create_container().returning(|_| Ok(()));
        store
            .expect_upload_file()
            .withf(|_, key, _, _| key == "1.txt")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, key, source, _| Ok(UploadRecord::new(source, key, 5)));
        store
            .expect_upload_file()
            .withf(|_, key, _, _| key == "2.txt")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Err(Error::Network("connection reset".into())));
        store
            .expect_upload_file()
            .withf(|_, key, _, _| key == "3.txt")
            .never();

        let recorder = Recorder::default();
        let err = FolderUploader::new(&config, &store)
            .run(&recorder)
            .await
            .unwrap_err();

        match &err {
            Error::Upload { path, source } => {
                assert_eq!(path, &dir.path().join("2.txt"));
                assert!(matches!(**source, Error::Network(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("2.txt"));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(*recorder.finished.borrow(), vec!["1.txt"]);
    }

    #[tokio::test]
    async fn test_traversal_error_aborts_run() {
        let dir = tree();
        let root = dir.path().to_path_buf();
        let config = config(&root, None);
        fs::remove_dir_all(&root).unwrap();

        let mut store = MockObjectStore::new();
        store.expect_create_container().times(1).returning(|_| Ok(()));
        store.expect_upload_file().never();

        let recorder = Recorder::default();
        let err = FolderUploader::new(&config, &store)
            .run(&recorder)
            .await
            .unwrap_err();

        match &err {
            Error::Traversal { path, .. } => assert_eq!(path, &root),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains(&root.display().to_string()));
        assert_eq!(err.exit_code(), 1);
        assert!(recorder.started.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_custom_transfer_options_reach_store() {
        let dir = tree();
        let config = config(dir.path(), None);
        let options = TransferOptions::new().block_size(4096).concurrency(2);

        let mut store = MockObjectStore::new();
        store.expect_create_container().returning(|_| Ok(()));
        store
            .expect_upload_file()
            .withf(move |_, _, _, o| *o == options)
            .times(2)
            .returning(|_, key, source, _| Ok(UploadRecord::new(source, key, 0)));

        FolderUploader::new(&config, &store)
            .with_options(options)
            .run(&Silent)
            .await
            .unwrap();
    }
}
