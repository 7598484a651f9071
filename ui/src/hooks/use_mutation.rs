use futures::future::LocalBoxFuture;
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;
use crate::hooks::use_api::{HookError, RequestTracker};
use crate::hooks::use_session::expire_session;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub loading: bool,
    pub error: Option<String>,
}

pub enum MutationAction {
    Start,
    Success,
    Failure(String),
    Reset,
}

impl Reducible for MutationState {
    type Action = MutationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(match action {
            MutationAction::Start => Self {
                loading: true,
                error: None,
            },
            MutationAction::Success | MutationAction::Reset => Self::default(),
            MutationAction::Failure(error) => Self {
                loading: false,
                error: Some(error),
            },
        })
    }
}

pub struct MutationHandle<P, T, E> {
    pub loading: bool,
    pub error: Option<String>,
    mutate: Callback<P, LocalBoxFuture<'static, Result<T, E>>>,
    reset: Callback<()>,
}

impl<P, T, E> Clone for MutationHandle<P, T, E> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading,
            error: self.error.clone(),
            mutate: self.mutate.clone(),
            reset: self.reset.clone(),
        }
    }
}

impl<P, T, E> MutationHandle<P, T, E> {
    /// Run the write. The error is recorded on the handle and also returned,
    /// so callers can keep a dialog open or show a notification.
    pub fn mutate(&self, params: P) -> LocalBoxFuture<'static, Result<T, E>> {
        self.mutate.emit(params)
    }

    /// Forget a recorded error.
    pub fn reset(&self) {
        self.reset.emit(());
    }
}

/// Loading/error envelope around a single-argument async write.
///
/// Nothing is refetched afterwards; callers refetch whichever reads the
/// write affects.
#[hook]
pub fn use_mutation<P, T, E, F, Fut>(write_fn: F) -> MutationHandle<P, T, E>
where
    P: 'static,
    T: 'static,
    E: HookError,
    F: Fn(P) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let state = use_reducer(MutationState::default);
    let tracker = use_memo((), |_| RequestTracker::default());
    let (_, dispatch) = use_store::<State>();

    {
        let tracker = tracker.clone();
        use_effect_with((), move |_| move || tracker.unmount());
    }

    let mutate = {
        let state = state.clone();
        use_callback((), move |params: P, _| {
            let state = state.clone();
            let tracker = tracker.clone();
            let dispatch = dispatch.clone();
            let ticket = tracker.begin();
            let future = write_fn(params);

            state.dispatch(MutationAction::Start);
            Box::pin(async move {
                let result = future.await;
                if let Err(e) = &result {
                    tracing::warn!("mutation failed: {e}");
                    if e.is_auth_expired() {
                        expire_session(&dispatch);
                    }
                }
                if tracker.is_current(ticket) {
                    state.dispatch(match &result {
                        Ok(_) => MutationAction::Success,
                        Err(e) => MutationAction::Failure(e.to_string()),
                    });
                }
                result
            }) as LocalBoxFuture<'static, Result<T, E>>
        })
    };

    let reset = {
        let state = state.clone();
        use_callback((), move |_: (), _| state.dispatch(MutationAction::Reset))
    };

    MutationHandle {
        loading: state.loading,
        error: state.error.clone(),
        mutate,
        reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_recorded_and_cleared_by_the_next_start() {
        let state = Rc::new(MutationState::default())
            .reduce(MutationAction::Start)
            .reduce(MutationAction::Failure("Not found.".into()));
        assert_eq!(state.error.as_deref(), Some("Not found."));
        assert!(!state.loading);

        let state = state.reduce(MutationAction::Start);
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn success_clears_loading() {
        let state = Rc::new(MutationState::default())
            .reduce(MutationAction::Start)
            .reduce(MutationAction::Success);
        assert_eq!(*state, MutationState::default());
    }

    #[test]
    fn reset_forgets_the_error() {
        let state = Rc::new(MutationState::default())
            .reduce(MutationAction::Failure("boom".into()))
            .reduce(MutationAction::Reset);
        assert_eq!(state.error, None);
    }
}
