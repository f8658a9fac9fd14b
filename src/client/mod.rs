//! Submission client.
//!
//! Holds the form and list state for the upload UI as an explicit state
//! container (`state`), keeps one preview URL per selected file (`previews`),
//! and talks to the uploads API (`api`). `SubmissionClient` ties them
//! together behind the `select_files` / `submit` / `refresh` operations.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod previews;
pub mod state;

pub use api::{HttpUploadsApi, UploadsApi};
pub use config::ClientConfig;
pub use controller::SubmissionClient;
pub use error::ClientError;
pub use models::{FormField, FormFields, SelectedFile, Signal, Upload};
pub use previews::{BlobUrlFactory, PreviewSet, PreviewUrlFactory};
pub use state::{reduce, Action, SubmissionState, Tab, MAX_SELECTED_FILES};
