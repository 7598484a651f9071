use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use yew::prelude::*;

/// Holds the callback from the most recent render. A timer started in an
/// earlier render emits through it, so it never fires a stale callback.
#[derive(Clone)]
pub struct LatestCallback<IN>(Rc<RefCell<Callback<IN>>>);

impl<IN> LatestCallback<IN> {
    pub fn new(callback: Callback<IN>) -> Self {
        Self(Rc::new(RefCell::new(callback)))
    }

    pub fn update(&self, callback: Callback<IN>) {
        *self.0.borrow_mut() = callback;
    }

    pub fn emit(&self, value: IN) {
        let callback = self.0.borrow().clone();
        callback.emit(value);
    }
}

/// Emit `refetch` every `interval_ms` while `enabled`. The interval is
/// dropped, and so cancelled, on unmount or when either input changes.
/// Each tick emits the `refetch` passed in the latest render.
#[hook]
pub fn use_polling(refetch: Callback<()>, interval_ms: u32, enabled: bool) {
    let latest = use_memo((), {
        let refetch = refetch.clone();
        move |_| LatestCallback::new(refetch)
    });
    latest.update(refetch);

    use_effect_with((interval_ms, enabled), move |(interval_ms, enabled)| {
        let latest = (*latest).clone();
        let interval = enabled.then(|| {
            tracing::debug!(interval_ms, "polling started");
            Interval::new(*interval_ms, move || latest.emit(()))
        });
        move || drop(interval)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_the_most_recent_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = |tag: &'static str| {
            let seen = seen.clone();
            Callback::from(move |()| seen.borrow_mut().push(tag))
        };

        let latest = LatestCallback::new(record("first"));
        let timer_copy = latest.clone();
        timer_copy.emit(());

        latest.update(record("second"));
        timer_copy.emit(());
        timer_copy.emit(());

        assert_eq!(*seen.borrow(), vec!["first", "second", "second"]);
    }
}
