//! Transient in-app notifications (toasts).
//!
//! Entries are kept in insertion order and removed either by the user or by
//! a timer after their duration. Nothing is persisted.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use yew::prelude::*;

use crate::config::config;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationButton {
    pub label: AttrValue,
    pub on_click: Callback<()>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: Option<AttrValue>,
    pub message: AttrValue,
    pub duration_ms: u32,
    pub auto_close: bool,
    pub action: Option<NotificationButton>,
}

impl Notification {
    /// A notification with a fresh id and the configured default duration.
    pub fn new(kind: NotificationKind, message: impl Into<AttrValue>) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            title: None,
            message: message.into(),
            duration_ms: config().ui.notification_timeout_ms,
            auto_close: true,
            action: None,
        }
    }

    pub fn success(message: impl Into<AttrValue>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<AttrValue>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<AttrValue>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn warning(message: impl Into<AttrValue>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn title(mut self, title: impl Into<AttrValue>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Stay until dismissed.
    pub fn sticky(mut self) -> Self {
        self.auto_close = false;
        self
    }

    pub fn action(
        mut self,
        label: impl Into<AttrValue>,
        on_click: Callback<()>,
    ) -> Self {
        self.action = Some(NotificationButton {
            label: label.into(),
            on_click,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    /// Oldest entries are dropped beyond this many.
    pub capacity: usize,
}

impl Default for NotificationList {
    fn default() -> Self {
        Self::with_capacity(config().ui.max_notifications)
    }
}

impl NotificationList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.max(1),
        }
    }
}

pub enum NotificationAction {
    Add(Notification),
    Remove(u64),
    Clear,
}

impl Reducible for NotificationList {
    type Action = NotificationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();

        match action {
            NotificationAction::Add(notification) => {
                items.push(notification);
                if items.len() > self.capacity {
                    let excess = items.len() - self.capacity;
                    items.drain(..excess);
                }
            }
            NotificationAction::Remove(id) => {
                if !items.iter().any(|n| n.id == id) {
                    return self;
                }
                items.retain(|n| n.id != id);
            }
            NotificationAction::Clear => items.clear(),
        }

        Rc::new(Self {
            items,
            capacity: self.capacity,
        })
    }
}

/// How long a notification stays before removing itself, or `None` when it
/// stays until dismissed.
pub fn removal_delay(notification: &Notification) -> Option<u32> {
    notification
        .auto_close
        .then_some(notification.duration_ms)
}

pub type NotificationContext = UseReducerHandle<NotificationList>;

#[derive(Properties, PartialEq)]
pub struct NotificationProviderProps {
    pub children: Children,
}

#[function_component]
pub fn NotificationProvider(props: &NotificationProviderProps) -> Html {
    let list = use_reducer(NotificationList::default);

    html! {
        <ContextProvider<NotificationContext> context={list}>
            {props.children.clone()}
        </ContextProvider<NotificationContext>>
    }
}

#[derive(Clone)]
pub struct NotificationHandle {
    context: NotificationContext,
}

impl NotificationHandle {
    pub fn new(context: NotificationContext) -> Self {
        Self { context }
    }

    /// Show a notification and schedule its removal. Returns its id.
    pub fn add(&self, notification: Notification) -> u64 {
        let id = notification.id;
        let delay = removal_delay(&notification);

        self.context.dispatch(NotificationAction::Add(notification));

        if let Some(duration_ms) = delay {
            let context = self.context.clone();
            yew::platform::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(duration_ms).await;
                context.dispatch(NotificationAction::Remove(id));
            });
        }
        id
    }

    pub fn success(&self, message: impl Into<AttrValue>) -> u64 {
        self.add(Notification::success(message))
    }

    pub fn error(&self, message: impl Into<AttrValue>) -> u64 {
        self.add(Notification::error(message))
    }

    pub fn info(&self, message: impl Into<AttrValue>) -> u64 {
        self.add(Notification::info(message))
    }

    pub fn warning(&self, message: impl Into<AttrValue>) -> u64 {
        self.add(Notification::warning(message))
    }

    pub fn remove(&self, id: u64) {
        self.context.dispatch(NotificationAction::Remove(id));
    }

    pub fn clear(&self) {
        self.context.dispatch(NotificationAction::Clear);
    }

    pub fn items(&self) -> &[Notification] {
        &self.context.items
    }
}

#[hook]
pub fn use_notifications() -> NotificationHandle {
    let context = use_context::<NotificationContext>()
        .expect("use_notifications must be used within a NotificationProvider");
    NotificationHandle::new(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(list: Rc<NotificationList>, n: Notification) -> Rc<NotificationList> {
        list.reduce(NotificationAction::Add(n))
    }

    fn ids(list: &NotificationList) -> Vec<u64> {
        list.items.iter().map(|n| n.id).collect()
    }

    #[test]
    fn ids_are_unique() {
        let a = Notification::info("a");
        let b = Notification::info("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn keeps_insertion_order_across_removals() {
        let (a, b, c) = (
            Notification::success("saved"),
            Notification::error("failed"),
            Notification::warning("careful"),
        );
        let (ida, idb, idc) = (a.id, b.id, c.id);

        let list = Rc::new(NotificationList::with_capacity(10));
        let list = add(add(add(list, a), b), c);
        assert_eq!(ids(&list), vec![ida, idb, idc]);

        let list = list.reduce(NotificationAction::Remove(idb));
        assert_eq!(ids(&list), vec![ida, idc]);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let list = add(
            Rc::new(NotificationList::with_capacity(10)),
            Notification::info("hello"),
        );
        let after = list.clone().reduce(NotificationAction::Remove(u64::MAX));
        assert!(Rc::ptr_eq(&list, &after));
    }

    #[test]
    fn oldest_entries_drop_beyond_capacity() {
        let first = Notification::info("1");
        let second = Notification::info("2");
        let third = Notification::info("3");
        let (id2, id3) = (second.id, third.id);

        let list = Rc::new(NotificationList::with_capacity(2));
        let list = add(add(add(list, first), second), third);
        assert_eq!(ids(&list), vec![id2, id3]);
    }

    #[test]
    fn clear_empties_the_list() {
        let list = add(
            Rc::new(NotificationList::with_capacity(10)),
            Notification::info("hello"),
        );
        let list = list.reduce(NotificationAction::Clear);
        assert!(list.items.is_empty());
    }

    #[test]
    fn builder_options() {
        let n = Notification::warning("Low battery")
            .title("Device")
            .duration(1000)
            .sticky();
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.title.as_deref(), Some("Device"));
        assert_eq!(n.duration_ms, 1000);
        assert!(!n.auto_close);
    }

    #[test]
    fn auto_closing_notifications_are_removed_after_their_duration() {
        let n = Notification::success("Saved").duration(2500);
        assert_eq!(removal_delay(&n), Some(2500));

        let default = Notification::info("hello");
        assert_eq!(
            removal_delay(&default),
            Some(config().ui.notification_timeout_ms)
        );
    }

    #[test]
    fn sticky_notifications_never_remove_themselves() {
        let n = Notification::error("Connection lost").duration(2500).sticky();
        assert_eq!(removal_delay(&n), None);
    }
}
