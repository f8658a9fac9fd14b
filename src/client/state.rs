use crate::client::models::{FormField, FormFields, SelectedFile, Upload};

/// Selections beyond this many files are dropped
pub const MAX_SELECTED_FILES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// The submission form
    #[default]
    Submit,
    /// The list of past uploads
    Uploads,
}

/// Everything that can change the client state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectFiles(Vec<SelectedFile>),
    SetField(FormField, String),
    SetTab(Tab),
    ValidationFailed(String),
    SubmitStart,
    SubmitSuccess,
    SubmitFailure(String),
    RefreshSuccess(Vec<Upload>),
    RefreshFailure(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionState {
    pub selected_files: Vec<SelectedFile>,
    pub fields: FormFields,
    pub uploads: Vec<Upload>,
    /// Most recent error, replaced by each new one
    pub error: Option<String>,
    pub submitting: bool,
    pub active_tab: Tab,
}

impl SubmissionState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectFiles(mut files) => {
                files.truncate(MAX_SELECTED_FILES);
                self.selected_files = files;
            }
            Action::SetField(field, value) => self.fields.set(field, value),
            Action::SetTab(tab) => self.active_tab = tab,
            Action::ValidationFailed(message) => self.error = Some(message),
            Action::SubmitStart => {
                self.error = None;
                self.submitting = true;
            }
            Action::SubmitSuccess => {
                self.submitting = false;
                self.selected_files.clear();
                self.fields = FormFields::default();
                self.active_tab = Tab::Uploads;
            }
            Action::SubmitFailure(message) => {
                self.submitting = false;
                self.error = Some(message);
            }
            Action::RefreshSuccess(uploads) => {
                self.uploads = uploads;
                self.error = None;
            }
            // The list already shown stays: stale beats empty
            Action::RefreshFailure(message) => self.error = Some(message),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.selected_files.is_empty()
    }
}

/// Next state after `action`
pub fn reduce(mut state: SubmissionState, action: Action) -> SubmissionState {
    state.apply(action);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", vec![1])
    }

    fn upload(name: &str) -> Upload {
        Upload {
            id: name.to_string(),
            filename: name.to_string(),
            created_at: Utc::now(),
            content_type: "image/png".to_string(),
            profile_url: String::new(),
            profile_bio: String::new(),
            conversation_text: String::new(),
            notes: String::new(),
            risk_score: 0,
            confidence: 0.0,
            signals: vec![],
            advice: vec![],
        }
    }

    #[test]
    fn test_select_files_truncates_to_five() {
        let mut state = SubmissionState::default();
        let files: Vec<SelectedFile> = (0..7).map(|i| file(&format!("{}.png", i))).collect();

        state.apply(Action::SelectFiles(files.clone()));

        assert_eq!(state.selected_files.len(), MAX_SELECTED_FILES);
        assert_eq!(state.selected_files, files[..5].to_vec());
    }

    #[test]
    fn test_select_files_replaces_selection() {
        let mut state = SubmissionState::default();
        state.apply(Action::SelectFiles(vec![file("a.png"), file("b.png")]));

        state.apply(Action::SelectFiles(vec![file("c.png")]));

        assert_eq!(state.selected_files, vec![file("c.png")]);
    }

    #[test]
    fn test_submit_start_clears_error_and_blocks_resubmit() {
        let mut state = SubmissionState {
            error: Some("old".to_string()),
            ..Default::default()
        };
        state.apply(Action::SelectFiles(vec![file("a.png")]));
        assert!(state.can_submit());

        state.apply(Action::SubmitStart);

        assert_eq!(state.error, None);
        assert!(state.submitting);
        assert!(!state.can_submit());
    }

    #[test]
    fn test_submit_success_resets_form_and_switches_tab() {
        let mut state = SubmissionState::default();
        state.apply(Action::SelectFiles(vec![file("a.png")]));
        state.apply(Action::SetField(FormField::Notes, "met on an app".to_string()));
        state.apply(Action::SubmitStart);

        state.apply(Action::SubmitSuccess);

        assert!(state.selected_files.is_empty());
        assert_eq!(state.fields, FormFields::default());
        assert_eq!(state.active_tab, Tab::Uploads);
        assert!(!state.submitting);
    }

    #[test]
    fn test_submit_failure_keeps_form() {
        let mut state = SubmissionState::default();
        state.apply(Action::SelectFiles(vec![file("a.png")]));
        state.apply(Action::SetField(
            FormField::ProfileUrl,
            "https://example.com/@alice".to_string(),
        ));
        state.apply(Action::SubmitStart);

        state.apply(Action::SubmitFailure("Database error occurred".to_string()));

        assert_eq!(state.selected_files, vec![file("a.png")]);
        assert_eq!(state.fields.profile_url, "https://example.com/@alice");
        assert_eq!(state.error.as_deref(), Some("Database error occurred"));
        assert_eq!(state.active_tab, Tab::Submit);
        assert!(!state.submitting);
    }

    #[test]
    fn test_refresh_failure_keeps_existing_list() {
        let mut state = SubmissionState::default();
        state.apply(Action::RefreshSuccess(vec![upload("a.png")]));

        state.apply(Action::RefreshFailure("Unable to load uploads".to_string()));

        assert_eq!(state.uploads.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Unable to load uploads"));

        state.apply(Action::RefreshSuccess(vec![upload("a.png"), upload("b.png")]));
        assert_eq!(state.uploads.len(), 2);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let before = SubmissionState::default();

        let after = reduce(before.clone(), Action::SetTab(Tab::Uploads));

        assert_eq!(before.active_tab, Tab::Submit);
        assert_eq!(after.active_tab, Tab::Uploads);
    }

    #[test]
    fn test_latest_error_wins() {
        let mut state = SubmissionState::default();

        state.apply(Action::ValidationFailed("first".to_string()));
        state.apply(Action::RefreshFailure("second".to_string()));

        assert_eq!(state.error.as_deref(), Some("second"));
    }
}
