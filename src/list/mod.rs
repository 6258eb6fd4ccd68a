pub mod fetchers;

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable};
use uuid::Uuid;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::models::{FileStatus, PageResult, Semester};

/// Filter criteria owned by one list screen.
///
/// Invariant: any change to a filter field resets `page_num` to 1. The
/// setters on `ListController` are the only mutation path, so the invariant
/// holds uniformly across every screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub page_num: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub created_at: Option<String>,
    pub department_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub semester: Option<Semester>,
    pub status: Option<FileStatus>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: CONFIG.list.default_page_size,
            search: None,
            created_at: None,
            department_id: None,
            level_id: None,
            semester: None,
            status: None,
        }
    }
}

impl FilterState {
    /// Canonical query parameters for these criteria, in a fixed order.
    /// Calling this twice with equal state yields equal parameters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page_size", self.page_size.to_string()),
            ("page_num", self.page_num.to_string()),
        ];
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(created_at) = &self.created_at {
            query.push(("date_time", created_at.clone()));
        }
        if let Some(department_id) = &self.department_id {
            query.push(("department_id", department_id.to_string()));
        }
        if let Some(level_id) = &self.level_id {
            query.push(("level_id", level_id.to_string()));
        }
        if let Some(semester) = self.semester {
            query.push(("semester", semester.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("file_status", status.as_str().to_string()));
        }
        query
    }
}

/// Fetch lifecycle of a list screen. `Error` keeps the last-good rows so the
/// table never blanks out under a failed refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// The data-access seam a list controller drives.
///
/// Production impls (see `fetchers`) bind a resource client to the filter
/// criteria; tests script responses to exercise ordering and failure paths.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Clone + Send;

    async fn fetch(&self, filter: &FilterState) -> Result<PageResult<Self::Item>, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Read-only view of the controller for rendering
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub state: LoadState,
    pub items: Vec<T>,
    pub total: u64,
    pub page_num: u32,
    pub page_size: u32,
}

impl<T> ListSnapshot<T> {
    pub fn has_next(&self) -> bool {
        (self.page_num as u64) * (self.page_size as u64) < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.page_num > 1
    }
}

struct Inner<T> {
    filter: FilterState,
    state: LoadState,
    items: Vec<T>,
    total: u64,
    // Stale-response guard: only the fetch holding the latest generation may
    // apply its result
    generation: u64,
    // Debounce guard for free-text inputs: a keystroke bumps the epoch and
    // only the latest sleeper refetches
    debounce_epoch: u64,
    abort: Option<AbortHandle>,
}

/// The recurring paginated-list pattern, deduplicated.
///
/// Owns page position, filter criteria and the fetch lifecycle for one list
/// view. Free-text criteria (search, date) are debounced; discrete criteria
/// (department, level, semester, status) refetch immediately. Results of
/// superseded requests are aborted and, if they resolve anyway, discarded.
pub struct ListController<F: PageFetcher> {
    fetcher: F,
    inner: Mutex<Inner<F::Item>>,
}

impl<F: PageFetcher> ListController<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_filter(fetcher, FilterState::default())
    }

    pub fn with_filter(fetcher: F, filter: FilterState) -> Self {
        Self {
            fetcher,
            inner: Mutex::new(Inner {
                filter,
                state: LoadState::Idle,
                items: Vec::new(),
                total: 0,
                generation: 0,
                debounce_epoch: 0,
                abort: None,
            }),
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<F::Item> {
        let inner = self.inner.lock().unwrap();
        ListSnapshot {
            state: inner.state,
            items: inner.items.clone(),
            total: inner.total,
            page_num: inner.filter.page_num,
            page_size: inner.filter.page_size,
        }
    }

    pub fn filter(&self) -> FilterState {
        self.inner.lock().unwrap().filter.clone()
    }

    /// Run the fetch for the current criteria.
    ///
    /// Bumps the request generation, aborts any in-flight predecessor, and
    /// applies the result only if no newer request started meanwhile.
    pub async fn refetch(&self) {
        let (generation, filter, abort_registration) = {
            let mut inner = self.inner.lock().unwrap();
            inner.generation += 1;
            if let Some(stale) = inner.abort.take() {
                stale.abort();
            }
            inner.state = LoadState::Loading;
            let (handle, registration) = AbortHandle::new_pair();
            inner.abort = Some(handle);
            (inner.generation, inner.filter.clone(), registration)
        };

        let result = Abortable::new(self.fetcher.fetch(&filter), abort_registration).await;

        let mut inner = self.inner.lock().unwrap();
        if inner.generation != generation {
            // A newer request owns the state now
            return;
        }
        inner.abort = None;

        match result {
            Err(_aborted) => {}
            Ok(Ok(page)) => {
                inner.items = page.items;
                inner.total = page.total;
                inner.state = LoadState::Loaded;
            }
            Ok(Err(_)) => {
                // Error was already surfaced by the transport; keep the
                // last-good rows on screen
                inner.state = LoadState::Error;
            }
        }
    }

    /// Form-success signal: back to page 1 with current criteria
    pub async fn refresh_from_start(&self) {
        self.inner.lock().unwrap().filter.page_num = 1;
        self.refetch().await;
    }

    // Discrete filters: immediate refetch

    pub async fn set_department(&self, department_id: Option<Uuid>) {
        self.apply_filter(|f| f.department_id = department_id);
        self.refetch().await;
    }

    pub async fn set_level(&self, level_id: Option<Uuid>) {
        self.apply_filter(|f| f.level_id = level_id);
        self.refetch().await;
    }

    pub async fn set_semester(&self, semester: Option<Semester>) {
        self.apply_filter(|f| f.semester = semester);
        self.refetch().await;
    }

    pub async fn set_status(&self, status: Option<FileStatus>) {
        self.apply_filter(|f| f.status = status);
        self.refetch().await;
    }

    pub async fn set_page_size(&self, page_size: u32) {
        let capped = page_size.clamp(1, CONFIG.list.max_page_size);
        self.apply_filter(|f| f.page_size = capped);
        self.refetch().await;
    }

    pub async fn clear_filters(&self) {
        self.apply_filter(|f| {
            f.search = None;
            f.created_at = None;
            f.department_id = None;
            f.level_id = None;
            f.semester = None;
        });
        self.refetch().await;
    }

    // Free-text filters: debounced refetch

    /// Record a search keystroke; fetches only after the input has been
    /// quiet for the debounce interval
    pub async fn set_search(&self, search: Option<String>) {
        let epoch = self.apply_debounced(|f| f.search = search);
        self.debounce_then_refetch(epoch).await;
    }

    /// Record a date-filter edit; debounced like search
    pub async fn set_created_at(&self, created_at: Option<String>) {
        let epoch = self.apply_debounced(|f| f.created_at = created_at);
        self.debounce_then_refetch(epoch).await;
    }

    // Pagination: page moves keep criteria, only the position changes

    pub async fn next_page(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            let reached_end =
                (inner.filter.page_num as u64) * (inner.filter.page_size as u64) >= inner.total;
            if reached_end {
                return;
            }
            inner.filter.page_num += 1;
        }
        self.refetch().await;
    }

    pub async fn prev_page(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.filter.page_num <= 1 {
                return;
            }
            inner.filter.page_num -= 1;
        }
        self.refetch().await;
    }

    /// Delete a row, then re-run the current fetch.
    ///
    /// Deleting the last row of a page beyond the first steps the page back
    /// so the refetch cannot land on an empty page.
    pub async fn delete_item(&self, id: Uuid) -> Result<(), ApiError> {
        self.fetcher.delete(id).await?;

        {
            let mut inner = self.inner.lock().unwrap();
            if inner.items.len() == 1 && inner.filter.page_num > 1 {
                inner.filter.page_num -= 1;
            }
        }
        self.refetch().await;
        Ok(())
    }

    fn apply_filter(&self, mutate: impl FnOnce(&mut FilterState)) {
        let mut inner = self.inner.lock().unwrap();
        mutate(&mut inner.filter);
        inner.filter.page_num = 1;
    }

    fn apply_debounced(&self, mutate: impl FnOnce(&mut FilterState)) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        mutate(&mut inner.filter);
        inner.filter.page_num = 1;
        inner.debounce_epoch += 1;
        inner.debounce_epoch
    }

    async fn debounce_then_refetch(&self, epoch: u64) {
        tokio::time::sleep(Duration::from_millis(CONFIG.list.debounce_ms)).await;
        if self.inner.lock().unwrap().debounce_epoch != epoch {
            // A newer keystroke superseded this one
            return;
        }
        self.refetch().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;

    /// Scripted fetcher: echoes rows derived from the requested filter and
    /// counts calls, with an optional per-call delay schedule
    struct ScriptedFetcher {
        calls: AtomicU64,
        total: u64,
        delays_ms: Vec<u64>,
    }

    impl ScriptedFetcher {
        fn new(total: u64) -> Self {
            Self { calls: AtomicU64::new(0), total, delays_ms: Vec::new() }
        }

        fn with_delays(total: u64, delays_ms: Vec<u64>) -> Self {
            Self { calls: AtomicU64::new(0), total, delays_ms }
        }

        fn call_count(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        type Item = String;

        async fn fetch(&self, filter: &FilterState) -> Result<PageResult<String>, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            if let Some(delay) = self.delays_ms.get(call) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            let remaining = self.total.saturating_sub(
                (filter.page_num as u64 - 1) * filter.page_size as u64,
            );
            let count = remaining.min(filter.page_size as u64);
            let items = (0..count)
                .map(|i| {
                    format!(
                        "page{}-row{}-search:{}",
                        filter.page_num,
                        i,
                        filter.search.as_deref().unwrap_or("")
                    )
                })
                .collect();
            Ok(PageResult { items, total: self.total })
        }

        async fn delete(&self, _id: Uuid) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_refetch_loads_page() {
        let controller = ListController::new(ScriptedFetcher::new(5));
        controller.refetch().await;
        let snap = controller.snapshot();
        assert_eq!(snap.state, LoadState::Loaded);
        assert_eq!(snap.items.len(), 5);
        assert_eq!(snap.total, 5);
        assert!(!snap.has_next());
    }

    #[tokio::test]
    async fn test_discrete_filter_resets_page_and_refetches() {
        let controller = ListController::new(ScriptedFetcher::new(50));
        controller.refetch().await;
        controller.next_page().await;
        assert_eq!(controller.snapshot().page_num, 2);

        controller.set_department(Some(Uuid::new_v4())).await;
        let snap = controller.snapshot();
        assert_eq!(snap.page_num, 1);
        assert_eq!(snap.state, LoadState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced_to_one_fetch() {
        let controller = Arc::new(ListController::new(ScriptedFetcher::new(5)));

        // Three keystrokes in quick succession: only the last may fetch
        let c1 = Arc::clone(&controller);
        let t1 = tokio::spawn(async move { c1.set_search(Some("m".to_string())).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let c2 = Arc::clone(&controller);
        let t2 = tokio::spawn(async move { c2.set_search(Some("me".to_string())).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let c3 = Arc::clone(&controller);
        let t3 = tokio::spawn(async move { c3.set_search(Some("mee".to_string())).await });

        // No fetch fires before the quiet interval elapses
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(controller.fetcher.call_count(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = tokio::join!(t1, t2, t3);

        assert_eq!(controller.fetcher.call_count(), 1);
        let snap = controller.snapshot();
        assert!(snap.items[0].ends_with("search:mee"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        // First request resolves long after the second; the displayed data
        // must reflect the second
        let controller = Arc::new(ListController::with_filter(
            ScriptedFetcher::with_delays(30, vec![500, 10]),
            FilterState { page_size: 5, ..FilterState::default() },
        ));

        let slow = {
            let c = Arc::clone(&controller);
            tokio::spawn(async move { c.refetch().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = {
            let c = Arc::clone(&controller);
            tokio::spawn(async move { c.set_department(Some(Uuid::new_v4())).await })
        };

        let _ = tokio::join!(slow, fast);

        let snap = controller.snapshot();
        assert_eq!(snap.state, LoadState::Loaded);
        // The slow first request was for page 1 pre-change; the winner reset
        // to page 1 with the new filter, and its rows are what's displayed
        assert_eq!(snap.page_num, 1);
        assert!(snap.items[0].starts_with("page1"));
        assert_eq!(controller.fetcher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_last_row_on_deep_page_steps_back() {
        // 11 rows, page size 5: page 3 holds a single row
        let controller = ListController::with_filter(
            ScriptedFetcher::new(11),
            FilterState { page_size: 5, ..FilterState::default() },
        );
        controller.refetch().await;
        controller.next_page().await;
        controller.next_page().await;
        let snap = controller.snapshot();
        assert_eq!(snap.page_num, 3);
        assert_eq!(snap.items.len(), 1);

        controller.delete_item(Uuid::new_v4()).await.unwrap();
        assert_eq!(controller.snapshot().page_num, 2);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_last_good_rows() {
        struct FailingFetcher {
            fail: std::sync::atomic::AtomicBool,
        }

        #[async_trait]
        impl PageFetcher for FailingFetcher {
            type Item = String;

            async fn fetch(&self, _filter: &FilterState) -> Result<PageResult<String>, ApiError> {
                if self.fail.load(Ordering::SeqCst) {
                    Err(ApiError::from_status(500, None, "fetching rows"))
                } else {
                    Ok(PageResult { items: vec!["row".to_string()], total: 1 })
                }
            }

            async fn delete(&self, _id: Uuid) -> Result<(), ApiError> {
                Ok(())
            }
        }

        let controller = ListController::new(FailingFetcher { fail: AtomicBool::new(false) });
        controller.refetch().await;
        assert_eq!(controller.snapshot().state, LoadState::Loaded);

        controller.fetcher.fail.store(true, Ordering::SeqCst);
        controller.refetch().await;
        let snap = controller.snapshot();
        assert_eq!(snap.state, LoadState::Error);
        assert_eq!(snap.items, vec!["row".to_string()]);
    }

    #[tokio::test]
    async fn test_page_moves_respect_bounds() {
        let controller = ListController::with_filter(
            ScriptedFetcher::new(8),
            FilterState { page_size: 5, ..FilterState::default() },
        );
        controller.refetch().await;

        // Floor at page 1
        controller.prev_page().await;
        assert_eq!(controller.snapshot().page_num, 1);

        controller.next_page().await;
        assert_eq!(controller.snapshot().page_num, 2);

        // 8 rows / page size 5: page 2 is the end
        controller.next_page().await;
        assert_eq!(controller.snapshot().page_num, 2);
    }

    #[tokio::test]
    async fn test_clear_filters_resets_criteria_and_page() {
        let controller = ListController::new(ScriptedFetcher::new(50));
        controller.set_department(Some(Uuid::new_v4())).await;
        controller.next_page().await;

        controller.clear_filters().await;
        let filter = controller.filter();
        assert_eq!(filter.page_num, 1);
        assert!(filter.department_id.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_filter_query_idempotent() {
        let filter = FilterState {
            search: Some("mee".to_string()),
            created_at: Some("2025-02-01".to_string()),
            ..FilterState::default()
        };
        assert_eq!(filter.to_query(), filter.to_query());
    }
}
