use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;
use crate::hooks::use_session::expire_session;

/// Errors a hook can surface. Expired sessions are routed to the session
/// store in addition to being shown.
pub trait HookError: std::fmt::Display + 'static {
    fn is_auth_expired(&self) -> bool {
        false
    }
}

impl HookError for payloads::ClientError {
    fn is_auth_expired(&self) -> bool {
        matches!(self, payloads::ClientError::AuthExpired)
    }
}

impl HookError for crate::session::SessionError {
    fn is_auth_expired(&self) -> bool {
        crate::session::SessionError::is_auth_expired(self)
    }
}

/// Loading, error and last successful data of one fetch hook.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> FetchState<T> {
    pub fn new(loading: bool) -> Self {
        Self {
            data: None,
            loading,
            error: None,
        }
    }
}

pub enum FetchAction<T> {
    Start,
    Success(T),
    Failure(String),
}

impl<T: Clone> Reducible for FetchState<T> {
    type Action = FetchAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            FetchAction::Start => Self {
                data: self.data.clone(),
                loading: true,
                error: None,
            },
            FetchAction::Success(data) => Self {
                data: Some(data),
                loading: false,
                error: None,
            },
            // keep whatever was loaded before
            FetchAction::Failure(error) => Self {
                data: self.data.clone(),
                loading: false,
                error: Some(error),
            },
        };
        Rc::new(next)
    }
}

/// Hands out a ticket per run. Only the newest ticket may commit, and none
/// may once the owning component is gone.
#[derive(Debug)]
pub struct RequestTracker {
    generation: Cell<u64>,
    mounted: Cell<bool>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self {
            generation: Cell::new(0),
            mounted: Cell::new(true),
        }
    }
}

impl RequestTracker {
    pub fn begin(&self) -> u64 {
        let ticket = self.generation.get() + 1;
        self.generation.set(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.mounted.get() && self.generation.get() == ticket
    }

    pub fn unmount(&self) {
        self.mounted.set(false);
    }
}

/// Options for [`use_api`].
pub struct ApiOptions<T> {
    /// Run on mount and whenever the dependencies change. Without it the
    /// hook only runs through `refetch`.
    pub auto_run: bool,
    pub on_success: Option<Callback<T>>,
    pub on_error: Option<Callback<String>>,
}

impl<T> Default for ApiOptions<T> {
    fn default() -> Self {
        Self {
            auto_run: true,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for ApiOptions<T> {
    fn clone(&self) -> Self {
        Self {
            auto_run: self.auto_run,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> ApiOptions<T> {
    /// Auto-run only while `condition` holds, e.g. once an id is chosen.
    pub fn when(condition: bool) -> Self {
        Self {
            auto_run: condition,
            ..Self::default()
        }
    }

    pub fn on_success(mut self, callback: Callback<T>) -> Self {
        self.on_success = Some(callback);
        self
    }

    pub fn on_error(mut self, callback: Callback<String>) -> Self {
        self.on_error = Some(callback);
        self
    }
}

pub struct ApiHandle<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub refetch: Callback<()>,
}

impl<T> ApiHandle<T> {
    /// Loading with nothing to show yet.
    pub fn is_initial_loading(&self) -> bool {
        self.loading && self.data.is_none() && self.error.is_none()
    }

    /// Render the data when there is some, otherwise a loading message or
    /// the error with a retry button. `render_fn` also receives whether a
    /// reload is in flight.
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool) -> Html,
    {
        match (&self.data, &self.error) {
            (Some(data), error) => html! {
                <>
                    if let Some(error) = error {
                        <ErrorBanner message={error.clone()} on_retry={self.refetch.clone()} />
                    }
                    {render_fn(data, self.loading)}
                </>
            },
            (None, Some(error)) => html! {
                <ErrorBanner
                    message={format!("Error loading {context}: {error}")}
                    on_retry={self.refetch.clone()}
                />
            },
            (None, None) if self.loading => html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("Loading {context}...")}
                    </p>
                </div>
            },
            (None, None) => html! {},
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: AttrValue,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component]
pub fn ErrorBanner(props: &ErrorBannerProps) -> Html {
    html! {
        <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800 flex items-center justify-between gap-4">
            <p class="text-sm text-red-700 dark:text-red-400">{&props.message}</p>
            if let Some(on_retry) = &props.on_retry {
                <button
                    onclick={on_retry.reform(|_: MouseEvent| ())}
                    class="text-sm font-medium text-red-700 dark:text-red-300 underline hover:no-underline"
                >
                    {"Retry"}
                </button>
            }
        </div>
    }
}

/// Loading/error/data envelope around an async read.
///
/// `fetch_fn` receives the current dependencies. A run starts on mount and
/// on every change of `deps` (when `options.auto_run`), or through
/// `refetch`. Overlapping runs are not cancelled; the most recently started
/// run is the only one allowed to commit, so the state always reflects the
/// latest dependencies. Nothing is committed after unmount.
///
/// ```rust,ignore
/// #[hook]
/// pub fn use_appointment(id: AppointmentId) -> ApiHandle<Appointment> {
///     use_api(id, ApiOptions::default(), |id| async move {
///         get_api_client().get_appointment(&id).await
///     })
/// }
/// ```
#[hook]
pub fn use_api<T, E, D, F, Fut>(
    deps: D,
    options: ApiOptions<T>,
    fetch_fn: F,
) -> ApiHandle<T>
where
    T: Clone + 'static,
    E: HookError,
    D: PartialEq + Clone + 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let auto_run = options.auto_run;
    let state = use_reducer(move || FetchState::<T>::new(auto_run));
    let tracker = use_memo((), |_| RequestTracker::default());
    let (_, dispatch) = use_store::<State>();

    // callbacks may change between renders without re-running
    let options_ref = use_mut_ref(|| options.clone());
    *options_ref.borrow_mut() = options;

    {
        let tracker = tracker.clone();
        use_effect_with((), move |_| move || tracker.unmount());
    }

    let run = {
        let state = state.clone();
        let tracker = tracker.clone();
        let fetch_fn = Rc::new(fetch_fn);

        use_callback(deps.clone(), move |_: (), deps| {
            let state = state.clone();
            let tracker = tracker.clone();
            let options_ref: Rc<RefCell<ApiOptions<T>>> = options_ref.clone();
            let dispatch = dispatch.clone();
            let ticket = tracker.begin();
            let future = fetch_fn(deps.clone());

            state.dispatch(FetchAction::Start);
            yew::platform::spawn_local(async move {
                let result = future.await;
                if !tracker.is_current(ticket) {
                    tracing::debug!(ticket, "dropping superseded response");
                    return;
                }
                let options = options_ref.borrow().clone();
                match result {
                    Ok(data) => {
                        tracing::debug!(ticket, "fetch succeeded");
                        state.dispatch(FetchAction::Success(data.clone()));
                        if let Some(on_success) = options.on_success {
                            on_success.emit(data);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(ticket, "fetch failed: {e}");
                        if e.is_auth_expired() {
                            expire_session(&dispatch);
                        }
                        let message = e.to_string();
                        state.dispatch(FetchAction::Failure(message.clone()));
                        if let Some(on_error) = options.on_error {
                            on_error.emit(message);
                        }
                    }
                }
            });
        })
    };

    {
        let run = run.clone();
        use_effect_with(deps, move |_| {
            if auto_run {
                run.emit(());
            }
        });
    }

    ApiHandle {
        data: state.data.clone(),
        loading: state.loading,
        error: state.error.clone(),
        refetch: Callback::from(move |_| run.emit(())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_sets_data_and_clears_error() {
        let state = Rc::new(FetchState::<u32>::new(false));
        let state = state.reduce(FetchAction::Start);
        assert!(state.loading);
        let state = state.reduce(FetchAction::Success(7));
        assert_eq!(*state, FetchState {
            data: Some(7),
            loading: false,
            error: None,
        });
    }

    #[test]
    fn failure_keeps_previous_data() {
        let state = Rc::new(FetchState::<u32>::new(false))
            .reduce(FetchAction::Success(7))
            .reduce(FetchAction::Start)
            .reduce(FetchAction::Failure("offline".into()));
        assert_eq!(state.data, Some(7));
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert!(!state.loading);
    }

    #[test]
    fn failure_before_any_data_leaves_data_empty() {
        let state = Rc::new(FetchState::<u32>::new(true))
            .reduce(FetchAction::Failure("boom".into()));
        assert_eq!(state.data, None);
        assert!(!state.loading);
    }

    #[test]
    fn start_clears_previous_error() {
        let state = Rc::new(FetchState::<u32>::new(false))
            .reduce(FetchAction::Failure("boom".into()))
            .reduce(FetchAction::Start);
        assert_eq!(state.error, None);
    }

    #[test]
    fn only_the_latest_run_may_commit() {
        let tracker = RequestTracker::default();
        let today = tracker.begin();
        let upcoming = tracker.begin();
        // "upcoming" resolves first, then "today" arrives late
        assert!(tracker.is_current(upcoming));
        assert!(!tracker.is_current(today));
    }

    #[test]
    fn nothing_commits_after_unmount() {
        let tracker = RequestTracker::default();
        let ticket = tracker.begin();
        tracker.unmount();
        assert!(!tracker.is_current(ticket));
    }
}
