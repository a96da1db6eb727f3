//! Folder upload
//!
//! Resolves the settings, connects to the blob service and uploads every file
//! under the folder, one at a time, stopping at the first failure.

use blobup_azure::AzureBlobClient;
use blobup_core::uploader;
use blobup_core::{
    Error, FolderUploader, PlannedUpload, Settings, UploadConfig, UploadObserver, UploadRecord,
    UploadSummary,
};
use clap::Args;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Upload settings; each falls back to its environment variable when unset
#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// Azure Storage account name [env: AZURE_STORAGE_ACCOUNT]
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// Container to upload into; created if missing [env: AZURE_STORAGE_CONTAINER]
    #[arg(long, value_name = "NAME")]
    pub container: Option<String>,

    /// Prefix for every object key [env: AZURE_STORAGE_SUBFOLDER]
    #[arg(long, value_name = "PREFIX")]
    pub subfolder: Option<String>,

    /// Local folder to upload [env: LOCAL_FOLDER]
    #[arg(long, value_name = "PATH")]
    pub folder: Option<String>,

    /// Storage connection string [env: AZURE_STORAGE_CONNECTION_STRING]
    #[arg(long, value_name = "STRING")]
    pub connection: Option<String>,

    /// List the files and keys that would be uploaded, then exit
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

impl UploadArgs {
    fn settings(&self) -> Settings {
        Settings {
            storage_account: self.account.clone(),
            container: self.container.clone(),
            subfolder: self.subfolder.clone(),
            local_folder: self.folder.clone(),
            connection_string: self.connection.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UploadOutput<'a> {
    status: &'static str,
    #[serde(flatten)]
    summary: &'a UploadSummary,
}

#[derive(Debug, Serialize)]
struct PlannedFile {
    source: String,
    key: String,
}

#[derive(Debug, Serialize)]
struct DryRunOutput<'a> {
    status: &'static str,
    container: &'a str,
    folder: String,
    files: Vec<PlannedFile>,
}

/// Execute the upload
pub async fn execute(args: UploadArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let config = match Settings::resolve(args.settings()).validate() {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if args.dry_run {
        return dry_run(&config, &formatter);
    }

    let client = match AzureBlobClient::connect(&config).await {
        Ok(client) => client,
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            return ExitCode::from_error(&e);
        }
    };
    tracing::debug!(account = client.account(), container = config.container(), "connected");

    let observer = ConsoleObserver {
        formatter: &formatter,
        spinner: ProgressBar::spinner(&output_config),
    };

    let result = FolderUploader::new(&config, &client).run(&observer).await;
    observer.spinner.finish_and_clear();

    match result {
        Ok(summary) => {
            if formatter.is_json() {
                formatter.json(&UploadOutput {
                    status: "success",
                    summary: &summary,
                });
            } else {
                formatter.success(&format!(
                    "Successfully uploaded folder '{}' to container '{}'",
                    summary.folder, summary.container
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to upload folder: {e}"));
            ExitCode::from_error(&e)
        }
    }
}

fn dry_run(config: &UploadConfig, formatter: &Formatter) -> ExitCode {
    let planned: Result<Vec<PlannedUpload>, Error> = uploader::plan(config).collect();
    let planned = match planned {
        Ok(planned) => planned,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&DryRunOutput {
            status: "dry-run",
            container: config.container(),
            folder: config.local_folder().display().to_string(),
            files: planned
                .iter()
                .map(|p| PlannedFile {
                    source: p.source.path.display().to_string(),
                    key: p.key.clone(),
                })
                .collect(),
        });
    } else {
        for p in &planned {
            formatter.println(&format!(
                "Would upload: {} -> {}",
                p.source.path.display(),
                p.key
            ));
        }
        formatter.success(&format!(
            "{} file(s) would be uploaded to container '{}'",
            planned.len(),
            config.container()
        ));
    }

    ExitCode::Success
}

/// Reports upload progress on the terminal
struct ConsoleObserver<'a> {
    formatter: &'a Formatter,
    spinner: ProgressBar,
}

impl UploadObserver for ConsoleObserver<'_> {
    fn container_not_created(&self, _container: &str, error: &Error) {
        self.spinner.suspend(|| {
            self.formatter
                .warning(&format!("Container creation result (might already exist): {error}"))
        });
    }

    fn upload_started(&self, planned: &PlannedUpload) {
        self.spinner
            .set_message(format!("Uploading {}", planned.source.path.display()));
    }

    fn upload_finished(&self, record: &UploadRecord) {
        self.spinner.suspend(|| {
            self.formatter.println(&format!(
                "Uploaded: {} -> {} ({})",
                record.source, record.key, record.size_human
            ))
        });
    }
}
