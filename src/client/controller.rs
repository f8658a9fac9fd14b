use tracing::{debug, warn};

use crate::client::api::UploadsApi;
use crate::client::error::ClientError;
use crate::client::models::{FormField, SelectedFile};
use crate::client::previews::{PreviewSet, PreviewUrlFactory};
use crate::client::state::{Action, SubmissionState, Tab};

/// Shown when submit is pressed with nothing selected
pub const NO_FILES_ERROR: &str = "Please add at least one image.";

/// Drives `SubmissionState` through its actions and performs the network
/// calls and preview bookkeeping each operation needs.
///
/// Failures are recorded in `state().error`; the returned `Result` mirrors
/// the same outcome for callers that want it.
pub struct SubmissionClient<A, P>
where
    A: UploadsApi,
    P: PreviewUrlFactory,
{
    api: A,
    previews: PreviewSet<P>,
    state: SubmissionState,
}

impl<A, P> SubmissionClient<A, P>
where
    A: UploadsApi,
    P: PreviewUrlFactory,
{
    pub fn new(api: A, preview_factory: P) -> Self {
        Self {
            api,
            previews: PreviewSet::new(preview_factory),
            state: SubmissionState::default(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Preview URLs, index-aligned with `state().selected_files`
    pub fn preview_urls(&self) -> &[String] {
        self.previews.urls()
    }

    /// Replace the selection with the first five files and regenerate previews
    pub fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.state.apply(Action::SelectFiles(files));
        self.previews.replace(&self.state.selected_files);
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.state.apply(Action::SetField(field, value.into()));
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.state.apply(Action::SetTab(tab));
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        if !self.state.can_submit() {
            if self.state.submitting {
                return Err(ClientError::SubmissionInFlight);
            }
            let err = ClientError::Validation(NO_FILES_ERROR.to_string());
            self.state.apply(Action::ValidationFailed(err.to_string()));
            return Err(err);
        }

        self.state.apply(Action::SubmitStart);

        let result = {
            // Cleared on every exit, including when this future is dropped mid-request
            let _in_flight = InFlight(&mut self.state.submitting);
            self.api
                .create_submission(&self.state.selected_files, &self.state.fields)
                .await
        };

        match result {
            Ok(created) => {
                debug!("Submission accepted: {} uploads created", created.len());
                self.state.apply(Action::SubmitSuccess);
                self.previews.clear();

                // The submission itself succeeded; a failed reload only shows its error
                if let Err(e) = self.refresh().await {
                    warn!("Reload after submit failed: {}", e);
                }
                Ok(())
            }
            Err(err) => {
                self.state.apply(Action::SubmitFailure(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.api.list_uploads().await {
            Ok(uploads) => {
                self.state.apply(Action::RefreshSuccess(uploads));
                Ok(())
            }
            Err(err) => {
                self.state.apply(Action::RefreshFailure(err.to_string()));
                Err(err)
            }
        }
    }
}

/// Resets the `submitting` flag when dropped
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
