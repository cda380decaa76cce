//! Routing module
//!
//! The fixed route table of the gateway:
//! - Each `Operation` owns one (verb, path pattern) pair
//! - `:name` segments capture a single path segment as a parameter
//! - Resolution distinguishes unknown paths from known paths with the wrong verb

mod matcher;

pub use matcher::{match_pattern, resolve, Resolution, RouteMatch};

use hyper::Method;
use std::fmt;

/// Operations exposed by the asset handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetById,
    AddItem,
    ListAll,
    ChangeHolder,
    UpdateLocation,
}

impl Operation {
    /// Route table, in registration order
    pub const ALL: [Self; 5] = [
        Self::GetById,
        Self::AddItem,
        Self::ListAll,
        Self::ChangeHolder,
        Self::UpdateLocation,
    ];

    pub fn method(self) -> Method {
        match self {
            Self::AddItem => Method::POST,
            Self::GetById | Self::ListAll | Self::ChangeHolder | Self::UpdateLocation => {
                Method::GET
            }
        }
    }

    pub const fn pattern(self) -> &'static str {
        match self {
            Self::GetById => "/get_tuna/:id",
            Self::AddItem => "/add_tuna",
            Self::ListAll => "/get_all_tuna",
            Self::ChangeHolder => "/change_holder/:holder",
            Self::UpdateLocation => "/update_location/:location",
        }
    }

    /// Handler method name, used in logs and error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetById => "get_by_id",
            Self::AddItem => "add_item",
            Self::ListAll => "list_all",
            Self::ChangeHolder => "change_holder",
            Self::UpdateLocation => "update_location",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// (method, pattern) pairs for startup logging
pub fn route_table() -> Vec<(String, &'static str)> {
    Operation::ALL
        .iter()
        .map(|op| (op.method().to_string(), op.pattern()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_matches_registration() {
        let table = route_table();
        assert_eq!(
            table,
            vec![
                ("GET".to_string(), "/get_tuna/:id"),
                ("POST".to_string(), "/add_tuna"),
                ("GET".to_string(), "/get_all_tuna"),
                ("GET".to_string(), "/change_holder/:holder"),
                ("GET".to_string(), "/update_location/:location"),
            ]
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::ChangeHolder.to_string(), "change_holder");
        assert_eq!(Operation::AddItem.method(), Method::POST);
    }
}
