use contracts::system::users::{UserListQuery, UserRecord, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

use crate::shared::url_query::{self, Params};

#[derive(Clone, Debug)]
pub struct UsersListState {
    pub query: UserListQuery,
    pub items: Vec<UserRecord>,
    pub total_count: usize,
    pub is_loaded: bool,
}

impl UsersListState {
    pub fn page_size(&self) -> usize {
        self.query.effective_page_size() as usize
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size()).max(1)
    }
}

impl Default for UsersListState {
    fn default() -> Self {
        Self {
            query: query_from_params(&url_query::read_params()),
            items: Vec::new(),
            total_count: 0,
            is_loaded: false,
        }
    }
}

/// List query carried by the URL; missing or malformed values fall back to
/// the defaults.
pub fn query_from_params(params: &Params) -> UserListQuery {
    let number = |key: &str| params.get(key).and_then(|v| v.parse::<u64>().ok());
    UserListQuery {
        page_number: number("pageNumber").unwrap_or(0),
        page_size: number("pageSize").unwrap_or(DEFAULT_PAGE_SIZE),
        username: params.get("username").cloned().unwrap_or_default(),
    }
}

pub fn query_to_url(query: &UserListQuery) {
    url_query::write_params(&[
        ("pageNumber", query.page_number.to_string()),
        ("pageSize", query.effective_page_size().to_string()),
        ("username", query.username.clone()),
    ]);
}

pub fn create_state() -> RwSignal<UsersListState> {
    RwSignal::new(UsersListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_params() {
        let params = url_query::parse_search("?pageNumber=3&pageSize=50&username=a00");
        let query = query_from_params(&params);
        assert_eq!(query.page_number, 3);
        assert_eq!(query.page_size, 50);
        assert_eq!(query.username, "a00");
    }

    #[test]
    fn test_query_defaults() {
        let params = url_query::parse_search("?pageNumber=x&active=sys_users");
        assert_eq!(query_from_params(&params), UserListQuery::default());
    }

    #[test]
    fn test_total_pages() {
        let mut state = UsersListState {
            query: UserListQuery::default(),
            items: Vec::new(),
            total_count: 0,
            is_loaded: false,
        };
        assert_eq!(state.total_pages(), 1);
        state.total_count = 31;
        assert_eq!(state.total_pages(), 3);
    }
}
