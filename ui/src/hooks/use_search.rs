use payloads::{requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, ApiOptions, use_api};

/// Queries of this many characters or fewer are not sent.
pub const MIN_QUERY_LEN: usize = 2;

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() > MIN_QUERY_LEN
}

/// Search users, appointments and exercises. Runs whenever the trimmed
/// query becomes long enough; shorter queries keep the previous results.
#[hook]
pub fn use_search(query: String) -> ApiHandle<responses::SearchResults> {
    let query = query.trim().to_string();
    let options = ApiOptions::when(is_searchable(&query));
    use_api(query, options, |q| async move {
        get_api_client().search(&requests::SearchQuery { q }).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_are_not_searched() {
        assert!(!is_searchable("kn"));
        assert!(!is_searchable("  kn  "));
        assert!(is_searchable("kne"));
    }
}
