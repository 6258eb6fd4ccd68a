mod common;

use std::sync::Arc;

use anyhow::Result;

use vault_admin::forms::{FormController, SubmitOutcome};
use vault_admin::http::Http;
use vault_admin::list::fetchers::DepartmentFetcher;
use vault_admin::list::{FilterState, ListController, LoadState};
use vault_admin::notify::{QueueNotifier, ToastLevel};
use vault_admin::resources::{DepartmentsClient, StatsClient};
use vault_admin::session::SessionStore;

async fn admin_client(server: &common::MockVault) -> (Arc<Http>, Arc<QueueNotifier>) {
    let notifier = Arc::new(QueueNotifier::new());
    let http = Arc::new(Http::new(&server.base_url, notifier.clone()).expect("http client"));
    let store = SessionStore::new(Arc::clone(&http));
    store
        .login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD)
        .await
        .expect("admin login");
    (http, notifier)
}

#[tokio::test]
async fn add_department_then_list_shows_new_row() -> Result<()> {
    let server = common::spawn().await;
    server.state.seed_departments(3);
    let (http, notifier) = admin_client(&server).await;

    let list = ListController::new(DepartmentFetcher {
        client: DepartmentsClient::new(Arc::clone(&http)),
    });
    list.refetch().await;
    assert_eq!(list.snapshot().total, 3);
    notifier.drain();

    let mut form = FormController::add(
        DepartmentsClient::new(Arc::clone(&http)),
        notifier.clone() as Arc<dyn vault_admin::notify::Notifier>,
    );
    form.draft_mut().dept_name = "Mechanical Engineering".to_string();
    form.draft_mut().dept_code = "MEE".to_string();

    let outcome = form.submit().await?;
    assert!(matches!(outcome, SubmitOutcome::Saved(_)));

    let toasts = notifier.drain();
    assert!(toasts
        .iter()
        .any(|(m, l)| m == "Department added successfully." && *l == ToastLevel::Success));

    // The form success signal refetches from page 1
    list.refresh_from_start().await;
    let snapshot = list.snapshot();
    assert_eq!(snapshot.total, 4);
    assert!(snapshot.items.iter().any(|d| d.dept_code == "MEE"));
    Ok(())
}

#[tokio::test]
async fn invalid_department_never_reaches_network() -> Result<()> {
    let server = common::spawn().await;
    let (http, notifier) = admin_client(&server).await;

    let requests_before = server.state.request_count();

    let mut form = FormController::add(
        DepartmentsClient::new(Arc::clone(&http)),
        notifier.clone() as Arc<dyn vault_admin::notify::Notifier>,
    );
    form.draft_mut().dept_name = "Mechanical Studies".to_string();
    form.draft_mut().dept_code = "MEE".to_string();

    let outcome = form.submit().await?;
    assert!(matches!(outcome, SubmitOutcome::Invalid));
    assert_eq!(
        form.errors()["dept_name"],
        "Department name must end with engineering."
    );

    // Zero network calls were made for the rejected submission
    assert_eq!(server.state.request_count(), requests_before);
    assert!(notifier.is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_code_conflict_surfaces_server_message() -> Result<()> {
    let server = common::spawn().await;
    let (http, notifier) = admin_client(&server).await;

    let departments = DepartmentsClient::new(Arc::clone(&http));
    let mut form = FormController::add(
        departments.clone(),
        notifier.clone() as Arc<dyn vault_admin::notify::Notifier>,
    );
    form.draft_mut().dept_name = "Mechanical Engineering".to_string();
    form.draft_mut().dept_code = "MEE".to_string();
    form.submit().await?;
    notifier.drain();

    let mut duplicate = FormController::add(
        departments,
        notifier.clone() as Arc<dyn vault_admin::notify::Notifier>,
    );
    duplicate.draft_mut().dept_name = "Marine Engineering".to_string();
    duplicate.draft_mut().dept_code = "MEE".to_string();

    let err = duplicate.submit().await.unwrap_err();
    assert_eq!(err.status_code(), Some(409));
    assert_eq!(err.message(), "department code already exists");

    let toasts = notifier.drain();
    assert!(toasts
        .iter()
        .any(|(m, l)| m == "department code already exists" && *l == ToastLevel::Error));
    Ok(())
}

#[tokio::test]
async fn deleting_last_row_of_deep_page_refetches_previous_page() -> Result<()> {
    let server = common::spawn().await;
    // 11 departments, page size 5: page 3 holds exactly one row
    server.state.seed_departments(11);
    let (http, _notifier) = admin_client(&server).await;

    let list = ListController::with_filter(
        DepartmentFetcher { client: DepartmentsClient::new(Arc::clone(&http)) },
        FilterState { page_num: 3, page_size: 5, ..FilterState::default() },
    );
    list.refetch().await;
    let snapshot = list.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.total, 11);

    let last_id = snapshot.items[0].id;
    list.delete_item(last_id).await?;

    let snapshot = list.snapshot();
    assert_eq!(snapshot.state, LoadState::Loaded);
    assert_eq!(snapshot.page_num, 2);
    assert_eq!(snapshot.total, 10);
    assert_eq!(snapshot.items.len(), 5);
    Ok(())
}

#[tokio::test]
async fn stats_reports_entity_counts() -> Result<()> {
    let server = common::spawn().await;
    server.state.seed_departments(4);
    let (http, _notifier) = admin_client(&server).await;

    let stats = StatsClient::new(Arc::clone(&http)).fetch().await?;
    assert_eq!(stats.count("departments"), 4);
    Ok(())
}
