//! Route matching module
//!
//! Implements `:param` path patterns and verb resolution over the route table.

use hyper::Method;

use super::Operation;

/// A resolved route with its decoded path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub operation: Operation,
    pub params: Vec<(&'static str, String)>,
}

impl RouteMatch {
    /// Decoded value of a named parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of resolving a request against the route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(RouteMatch),
    /// No route has this (verb, path) pair
    NotFound,
    /// A path parameter is not valid percent-encoded UTF-8
    InvalidParam(String),
}

/// Find the operation for a method and path
///
/// A route is the (verb, pattern) pair, so a known path requested with
/// another verb is not found. `HEAD` resolves like `GET`.
pub fn resolve(method: &Method, path: &str) -> Resolution {
    let effective = if *method == Method::HEAD {
        Method::GET
    } else {
        method.clone()
    };

    let found = Operation::ALL.into_iter().find_map(|operation| {
        if operation.method() != effective {
            return None;
        }
        match_pattern(operation.pattern(), path).map(|raw_params| (operation, raw_params))
    });
    let Some((operation, raw_params)) = found else {
        return Resolution::NotFound;
    };

    let mut params = Vec::with_capacity(raw_params.len());
    for (name, raw) in raw_params {
        match urlencoding::decode(raw) {
            Ok(value) => params.push((name, value.into_owned())),
            Err(e) => return Resolution::InvalidParam(format!("{name}: {e}")),
        }
    }
    Resolution::Matched(RouteMatch { operation, params })
}

/// Match a path against a pattern, returning raw (still encoded) parameters
///
/// Literal segments compare ASCII case-insensitively; parameter values are
/// captured as sent. A single trailing slash on the path is tolerated.
pub fn match_pattern<'p>(pattern: &'static str, path: &'p str) -> Option<Vec<(&'static str, &'p str)>> {
    let path = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };

    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = Vec::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    if actual.is_empty() {
                        return None;
                    }
                    params.push((name, actual));
                } else if !expected.eq_ignore_ascii_case(actual) {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_pattern_literal() {
        assert_eq!(match_pattern("/get_all_tuna", "/get_all_tuna"), Some(vec![]));
        assert_eq!(match_pattern("/get_all_tuna", "/get_all_tuna/"), Some(vec![]));
        assert_eq!(match_pattern("/get_all_tuna", "/get_all_tuna//"), None);
        assert_eq!(match_pattern("/get_all_tuna", "/get_all_tuna/x"), None);
        assert_eq!(match_pattern("/get_all_tuna", "/"), None);
    }

    #[test]
    fn test_match_pattern_ignores_literal_case() {
        assert_eq!(match_pattern("/get_all_tuna", "/GET_ALL_TUNA"), Some(vec![]));
        assert_eq!(
            match_pattern("/get_tuna/:id", "/Get_Tuna/AbC"),
            Some(vec![("id", "AbC")])
        );
        assert_eq!(match_pattern("/get_all_tuna", "/get_all_tun\u{e1}"), None);
    }

    #[test]
    fn test_match_pattern_param() {
        assert_eq!(
            match_pattern("/get_tuna/:id", "/get_tuna/42"),
            Some(vec![("id", "42")])
        );
        assert_eq!(
            match_pattern("/get_tuna/:id", "/get_tuna/42/"),
            Some(vec![("id", "42")])
        );
        assert_eq!(match_pattern("/get_tuna/:id", "/get_tuna/"), None);
        assert_eq!(match_pattern("/get_tuna/:id", "/get_tuna"), None);
        assert_eq!(match_pattern("/get_tuna/:id", "/get_tuna/1/2"), None);
    }

    #[test]
    fn test_resolve_each_route() {
        let cases = [
            (Method::GET, "/get_tuna/1", Operation::GetById, Some(("id", "1"))),
            (Method::POST, "/add_tuna", Operation::AddItem, None),
            (Method::GET, "/get_all_tuna", Operation::ListAll, None),
            (
                Method::GET,
                "/change_holder/1-Akash",
                Operation::ChangeHolder,
                Some(("holder", "1-Akash")),
            ),
            (
                Method::GET,
                "/update_location/2-18.45-73.565",
                Operation::UpdateLocation,
                Some(("location", "2-18.45-73.565")),
            ),
        ];

        for (method, path, operation, param) in cases {
            let Resolution::Matched(found) = resolve(&method, path) else {
                panic!("{method} {path} did not resolve");
            };
            assert_eq!(found.operation, operation);
            match param {
                Some((name, value)) => assert_eq!(found.param(name), Some(value)),
                None => assert!(found.params.is_empty()),
            }
        }
    }

    #[test]
    fn test_resolve_decodes_params() {
        let Resolution::Matched(found) = resolve(&Method::GET, "/change_holder/Blue%20Fin%2FCo")
        else {
            panic!("expected match");
        };
        assert_eq!(found.param("holder"), Some("Blue Fin/Co"));
    }

    #[test]
    fn test_resolve_rejects_invalid_utf8_param() {
        assert!(matches!(
            resolve(&Method::GET, "/get_tuna/%FF"),
            Resolution::InvalidParam(_)
        ));
    }

    #[test]
    fn test_resolve_head_as_get() {
        let Resolution::Matched(found) = resolve(&Method::HEAD, "/get_all_tuna") else {
            panic!("expected match");
        };
        assert_eq!(found.operation, Operation::ListAll);
    }

    #[test]
    fn test_resolve_wrong_method_is_not_found() {
        assert_eq!(resolve(&Method::POST, "/get_tuna/1"), Resolution::NotFound);
        assert_eq!(resolve(&Method::GET, "/add_tuna"), Resolution::NotFound);
        assert_eq!(resolve(&Method::HEAD, "/add_tuna"), Resolution::NotFound);
        assert_eq!(resolve(&Method::DELETE, "/get_all_tuna"), Resolution::NotFound);
    }

    #[test]
    fn test_resolve_uppercase_path() {
        let Resolution::Matched(found) = resolve(&Method::GET, "/GET_TUNA/1") else {
            panic!("expected match");
        };
        assert_eq!(found.operation, Operation::GetById);
        assert_eq!(found.param("id"), Some("1"));
    }

    #[test]
    fn test_resolve_unknown_path() {
        assert_eq!(resolve(&Method::GET, "/"), Resolution::NotFound);
        assert_eq!(resolve(&Method::GET, "/query_tuna_history/1"), Resolution::NotFound);
        assert_eq!(resolve(&Method::POST, "/add_tuna/extra"), Resolution::NotFound);
    }
}
