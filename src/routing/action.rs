//! Resource operations and their HTTP method bindings.

use axum::http::Method;
use std::fmt;

/// An operation on a registered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `GET /{name}/`
    List,
    /// `POST /{name}/`
    Create,
    /// `GET /{name}/{id}/`
    Retrieve,
    /// `PUT /{name}/{id}/`
    Update,
    /// `PATCH /{name}/{id}/`
    PartialUpdate,
    /// `DELETE /{name}/{id}/`
    Delete,
}

impl Action {
    /// Stable lowercase name, used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Retrieve => "retrieve",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Delete => "delete",
        }
    }

    /// Whether the operation reads a request body.
    pub fn takes_body(&self) -> bool {
        matches!(
            self,
            Action::Create | Action::Update | Action::PartialUpdate
        )
    }

    /// Operation for a collection route. HEAD is answered like GET.
    pub fn for_collection(method: &Method) -> Option<Action> {
        match *method {
            Method::GET | Method::HEAD => Some(Action::List),
            Method::POST => Some(Action::Create),
            _ => None,
        }
    }

    /// Operation for a member route.
    pub fn for_member(method: &Method) -> Option<Action> {
        match *method {
            Method::GET | Method::HEAD => Some(Action::Retrieve),
            Method::PUT => Some(Action::Update),
            Method::PATCH => Some(Action::PartialUpdate),
            Method::DELETE => Some(Action::Delete),
            _ => None,
        }
    }

    /// Methods accepted on a collection route, in `Allow` header order.
    pub fn collection_methods() -> Vec<Method> {
        vec![Method::GET, Method::POST, Method::HEAD]
    }

    /// Methods accepted on a member route, in `Allow` header order.
    pub fn member_methods() -> Vec<Method> {
        vec![
            Method::GET,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_methods() {
        assert_eq!(Action::for_collection(&Method::GET), Some(Action::List));
        assert_eq!(Action::for_collection(&Method::HEAD), Some(Action::List));
        assert_eq!(Action::for_collection(&Method::POST), Some(Action::Create));
        assert_eq!(Action::for_collection(&Method::PUT), None);
        assert_eq!(Action::for_collection(&Method::DELETE), None);
    }

    #[test]
    fn test_member_methods() {
        assert_eq!(Action::for_member(&Method::GET), Some(Action::Retrieve));
        assert_eq!(Action::for_member(&Method::PUT), Some(Action::Update));
        assert_eq!(Action::for_member(&Method::PATCH), Some(Action::PartialUpdate));
        assert_eq!(Action::for_member(&Method::DELETE), Some(Action::Delete));
        assert_eq!(Action::for_member(&Method::POST), None);
    }

    #[test]
    fn test_allowed_lists_agree_with_mapping() {
        for m in Action::collection_methods() {
            assert!(Action::for_collection(&m).is_some());
        }
        for m in Action::member_methods() {
            assert!(Action::for_member(&m).is_some());
        }
    }
}
