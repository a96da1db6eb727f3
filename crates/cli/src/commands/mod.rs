//! CLI definition and execution
//!
//! blobup has a single action, so the argument struct is flat: the upload
//! settings are flattened in next to the output flags.

use std::ffi::OsString;

use clap::Parser;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod upload;

const AFTER_HELP: &str = "\
Environment Variables:
  AZURE_STORAGE_ACCOUNT            Storage account name (used when -account is not set)
  AZURE_STORAGE_CONTAINER          Container name (used when -container is not set)
  AZURE_STORAGE_SUBFOLDER          Key prefix (used when -subfolder is not set)
  LOCAL_FOLDER                     Folder to upload (used when -folder is not set)
  AZURE_STORAGE_CONNECTION_STRING  Connection string (used when -connection is not set)

Examples:
  # Upload using command-line flags
  blobup -account mystorageaccount -container mycontainer -folder ./data

  # Upload under a prefix inside the container
  blobup -account mystorageaccount -container mycontainer -subfolder backups/2024 -folder ./data

  # Upload using environment variables
  export AZURE_STORAGE_ACCOUNT=mystorageaccount
  export AZURE_STORAGE_CONTAINER=mycontainer
  export LOCAL_FOLDER=./data
  blobup

  # Show what would be uploaded without contacting Azure
  blobup -container mycontainer -folder ./data --dry-run

Authentication:
  With -account, credentials are taken from the first source that works:
    1. Environment (AZURE_TENANT_ID, AZURE_CLIENT_ID, AZURE_CLIENT_SECRET)
    2. Managed identity on App Service, Functions or Container Apps
    3. Managed identity on an Azure VM
    4. Azure CLI (after 'az login')
  Alternatively pass -connection (or set AZURE_STORAGE_CONNECTION_STRING);
  a connection string takes precedence over the account name.";

/// blobup - upload a local folder to Azure Blob Storage
///
/// Every regular file under the folder is uploaded to the container, keyed by
/// its path relative to the folder and optionally prefixed with a sub-folder.
#[derive(Parser, Debug)]
#[command(name = "blobup")]
#[command(author, version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub upload: upload::UploadArgs,

    /// Output format: human-readable or JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Long options that may also be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "account",
    "container",
    "subfolder",
    "folder",
    "connection",
    "help",
    "version",
    "dry-run",
    "json",
    "no-color",
    "no-progress",
    "quiet",
    "debug",
];

/// Rewrite single-dash long options (`-account x`, `-folder=./data`) to
/// their double-dash form
///
/// Anything that is not a known long option, and everything after a bare
/// `--`, is passed through untouched.
pub fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.to_str() {
                Some(text) if is_single_dash_long(text) => OsString::from(format!("-{text}")),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}

/// Execute the CLI and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    upload::execute(cli.upload, output_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(args: &[&str]) -> Vec<String> {
        normalize_flags(args.iter().map(OsString::from))
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_single_dash_long_flags_rewritten() {
        assert_eq!(
            normalize(&["blobup", "-account", "acct", "-folder=./data", "-help"]),
            vec!["blobup", "--account", "acct", "--folder=./data", "--help"]
        );
    }

    #[test]
    fn test_other_arguments_untouched() {
        assert_eq!(
            normalize(&["blobup", "--container", "c", "-q", "-unknown", "value"]),
            vec!["blobup", "--container", "c", "-q", "-unknown", "value"]
        );
    }

    #[test]
    fn test_values_after_separator_untouched() {
        assert_eq!(
            normalize(&["blobup", "--", "-folder"]),
            vec!["blobup", "--", "-folder"]
        );
    }

    #[test]
    fn test_program_name_untouched() {
        assert_eq!(normalize(&["-folder"]), vec!["-folder"]);
    }

    #[test]
    fn test_parse_go_style_flags() {
        let cli = Cli::try_parse_from(normalize_flags(
            [
                "blobup",
                "-account",
                "acct",
                "-container",
                "box",
                "-subfolder",
                "backups/2024",
                "-folder",
                "./data",
                "-connection",
                "UseDevelopmentStorage=true",
            ]
            .map(OsString::from),
        ))
        .unwrap();

        assert_eq!(cli.upload.account.as_deref(), Some("acct"));
        assert_eq!(cli.upload.container.as_deref(), Some("box"));
        assert_eq!(cli.upload.subfolder.as_deref(), Some("backups/2024"));
        assert_eq!(cli.upload.folder.as_deref(), Some("./data"));
        assert_eq!(
            cli.upload.connection.as_deref(),
            Some("UseDevelopmentStorage=true")
        );
        assert!(!cli.upload.dry_run);
    }

    #[test]
    fn test_parse_output_flags() {
        let cli = Cli::try_parse_from(["blobup", "--json", "-q", "--no-color", "--dry-run"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.no_color);
        assert!(!cli.no_progress);
        assert!(cli.upload.dry_run);
    }

    #[test]
    fn test_help_mentions_environment() {
        let help = <Cli as clap::CommandFactory>::command()
            .render_help()
            .to_string();
        assert!(help.contains("AZURE_STORAGE_CONNECTION_STRING"));
        assert!(help.contains("LOCAL_FOLDER"));
        assert!(help.contains("Managed identity on App Service"));
    }
}
