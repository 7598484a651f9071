use yew::prelude::*;

use crate::config::config;

/// Sets the document title to "<page> | <app name>". Pages set their own
/// title on mount, so nothing is restored on unmount.
#[hook]
pub fn use_title(page: &str) {
    let title = format!("{page} | {}", config().app.name);
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}
