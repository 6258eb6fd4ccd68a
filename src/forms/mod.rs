pub mod backends;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::notify::{Notifier, ToastLevel};
use crate::validate::{FieldErrors, Schema};

/// Where a submitted draft goes: create for add-mode, update for edit-mode.
/// Implemented by the resource clients (see `backends`).
#[async_trait]
pub trait FormBackend: Send + Sync {
    type Draft: Schema + Clone + Default + Send + Sync;
    type Saved: Send;

    /// Entity name used in success toasts ("Department", "Course", ...)
    fn entity(&self) -> &'static str;

    async fn create(&self, draft: &Self::Draft) -> Result<Self::Saved, ApiError>;

    async fn update(&self, id: Uuid, draft: &Self::Draft) -> Result<Self::Saved, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(Uuid),
}

/// What a submit attempt produced.
#[derive(Debug)]
pub enum SubmitOutcome<S> {
    /// A previous submit is still in flight; nothing was done
    InFlight,
    /// Schema rejected the draft; field errors are populated, nothing was sent
    Invalid,
    /// Persisted. The owning list should refetch and reset to page 1.
    Saved(S),
}

/// Draft-holding controller behind every add/edit form.
///
/// Owns the draft, runs it through the entity schema on submit, maps
/// failures to per-field messages, and only then calls the resource client.
/// A failed network call leaves the draft untouched so the form can be
/// resubmitted.
pub struct FormController<B: FormBackend> {
    backend: B,
    notifier: Arc<dyn Notifier>,
    mode: FormMode,
    draft: B::Draft,
    errors: FieldErrors,
    submitting: bool,
}

impl<B: FormBackend> FormController<B> {
    /// Add mode: start from an empty draft
    pub fn add(backend: B, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            mode: FormMode::Add,
            draft: B::Draft::default(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    /// Edit mode: seed the draft from the selected entity
    pub fn edit(backend: B, notifier: Arc<dyn Notifier>, id: Uuid, seed: B::Draft) -> Self {
        Self {
            backend,
            notifier,
            mode: FormMode::Edit(id),
            draft: seed,
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &B::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut B::Draft {
        &mut self.draft
    }

    /// Field-path-keyed messages from the last failed submit
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate then persist the draft.
    ///
    /// Validation failures populate the error map and never reach the
    /// network. Network failures are rethrown (already toasted by the
    /// transport) with the draft intact. On success in add mode the draft is
    /// cleared for the next entry; in edit mode the caller closes the form.
    pub async fn submit(&mut self) -> Result<SubmitOutcome<B::Saved>, ApiError> {
        if self.submitting {
            return Ok(SubmitOutcome::InFlight);
        }

        self.errors = self.draft.check();
        if !self.errors.is_empty() {
            return Ok(SubmitOutcome::Invalid);
        }

        self.submitting = true;
        let result = match self.mode {
            FormMode::Add => self.backend.create(&self.draft).await,
            FormMode::Edit(id) => self.backend.update(id, &self.draft).await,
        };
        self.submitting = false;

        let saved = result?;

        let verb = match self.mode {
            FormMode::Add => "added",
            FormMode::Edit(_) => "updated",
        };
        self.notifier.notify(
            &format!("{} {} successfully.", self.backend.entity(), verb),
            ToastLevel::Success,
        );

        if self.mode == FormMode::Add {
            self.draft = B::Draft::default();
        }
        Ok(SubmitOutcome::Saved(saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::QueueNotifier;
    use crate::validate::schemas::DepartmentDraft;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct RecordingBackend {
        creates: AtomicU64,
        updates: AtomicU64,
        fail_with: Option<u16>,
    }

    impl RecordingBackend {
        fn ok() -> Self {
            Self { creates: AtomicU64::new(0), updates: AtomicU64::new(0), fail_with: None }
        }

        fn failing(status: u16) -> Self {
            Self {
                creates: AtomicU64::new(0),
                updates: AtomicU64::new(0),
                fail_with: Some(status),
            }
        }
    }

    #[async_trait]
    impl FormBackend for RecordingBackend {
        type Draft = DepartmentDraft;
        type Saved = ();

        fn entity(&self) -> &'static str {
            "Department"
        }

        async fn create(&self, _draft: &DepartmentDraft) -> Result<(), ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(status) => Err(ApiError::from_status(status, None, "adding departments")),
                None => Ok(()),
            }
        }

        async fn update(&self, _id: Uuid, _draft: &DepartmentDraft) -> Result<(), ApiError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_makes_no_network_call() {
        let notifier = Arc::new(QueueNotifier::new());
        let mut form = FormController::add(RecordingBackend::ok(), notifier.clone());
        form.draft_mut().dept_name = "Mechanical Studies".to_string();
        form.draft_mut().dept_code = "MEE".to_string();

        let outcome = form.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Invalid));
        assert_eq!(form.backend.creates.load(Ordering::SeqCst), 0);
        assert_eq!(
            form.errors()["dept_name"],
            "Department name must end with engineering."
        );
        // Validation failures render inline, never as a toast
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_add_submits_clears_draft_and_toasts() {
        let notifier = Arc::new(QueueNotifier::new());
        let mut form = FormController::add(RecordingBackend::ok(), notifier.clone());
        form.draft_mut().dept_name = "Mechanical Engineering".to_string();
        form.draft_mut().dept_code = "MEE".to_string();

        let outcome = form.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Saved(())));
        assert_eq!(form.backend.creates.load(Ordering::SeqCst), 1);
        assert_eq!(form.draft().dept_name, "");

        let toasts = notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].0, "Department added successfully.");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let notifier = Arc::new(QueueNotifier::new());
        let mut form = FormController::add(RecordingBackend::failing(409), notifier);
        form.draft_mut().dept_name = "Mechanical Engineering".to_string();
        form.draft_mut().dept_code = "MEE".to_string();

        let err = form.submit().await.unwrap_err();
        assert_eq!(err.status_code(), Some(409));
        // Draft survives so the user can correct and resubmit
        assert_eq!(form.draft().dept_code, "MEE");
    }

    #[tokio::test]
    async fn test_edit_mode_calls_update() {
        let notifier = Arc::new(QueueNotifier::new());
        let seed = DepartmentDraft {
            dept_name: "Civil Engineering".to_string(),
            dept_code: "CVE".to_string(),
        };
        let mut form =
            FormController::edit(RecordingBackend::ok(), notifier, Uuid::new_v4(), seed);

        let outcome = form.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Saved(())));
        assert_eq!(form.backend.updates.load(Ordering::SeqCst), 1);
        assert_eq!(form.backend.creates.load(Ordering::SeqCst), 0);
        // Edit mode keeps the draft; the view closes instead
        assert_eq!(form.draft().dept_code, "CVE");
    }
}
