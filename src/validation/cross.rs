//! Cross-request checks over one spec's validated batch

use std::collections::HashMap;

use crate::descriptors::{FALLBACK_GROUP, Grouping, RequestDescriptor, SpecDescriptor};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::idents;
use crate::symbols::SourceRef;

/// Runs the whole-batch checks: function-name collisions in their grouping
/// scope, and grouping sanity under ByPrefix.
pub fn validate_batch(spec: &SpecDescriptor, requests: &[RequestDescriptor]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    check_name_collisions(spec, requests, &mut diagnostics);
    if spec.grouping == Grouping::ByPrefix {
        check_grouping_sanity(spec, requests, &mut diagnostics);
    }

    diagnostics
}

/// A repeated function name within its scope (whole API under SingleClient,
/// per group under ByPrefix) is an error naming both declarations.
fn check_name_collisions(
    spec: &SpecDescriptor,
    requests: &[RequestDescriptor],
    diagnostics: &mut Diagnostics,
) {
    let mut seen: HashMap<(String, String), &RequestDescriptor> = HashMap::new();
    for request in requests {
        let scope = match spec.grouping {
            Grouping::SingleClient => String::new(),
            Grouping::ByPrefix => request.group_key(),
        };
        let key = (scope, request.fn_name.clone());
        match seen.get(&key) {
            Some(previous) => diagnostics.push(
                Diagnostic::error(format!(
                    "function name '{}' derived from '{}' collides with the one derived from '{}'",
                    request.fn_name, request.declaration, previous.declaration
                ))
                .at(SourceRef::declaration(request.declaration.clone())),
            ),
            None => {
                seen.insert(key, request);
            }
        }
    }
}

fn check_grouping_sanity(
    spec: &SpecDescriptor,
    requests: &[RequestDescriptor],
    diagnostics: &mut Diagnostics,
) {
    if requests.is_empty() {
        return;
    }
    let origin = SourceRef::declaration(spec.declaration.clone());
    let groups: Vec<String> = requests.iter().map(|r| r.group_key()).collect();
    let fallback_count = groups.iter().filter(|g| *g == FALLBACK_GROUP).count();
    let has_literal_fallback = requests.iter().any(|r| {
        idents::first_literal_segment(&r.path) == Some(FALLBACK_GROUP)
    });

    if fallback_count == requests.len() && !has_literal_fallback {
        diagnostics.push(
            Diagnostic::warning(format!(
                "all endpoints of '{}' fall into the '{FALLBACK_GROUP}' fallback group; ByPrefix grouping has no effect",
                spec.display_name
            ))
            .at(origin.clone()),
        );
    } else if fallback_count * 2 > requests.len() {
        diagnostics.push(
            Diagnostic::warning(format!(
                "most endpoints of '{}' fall into the '{FALLBACK_GROUP}' fallback group",
                spec.display_name
            ))
            .at(origin.clone()),
        );
    }

    // A literal /root/... prefix merges with the fallback bucket.
    let fallback_bucket_used = requests
        .iter()
        .any(|r| idents::first_literal_segment(&r.path).is_none());
    if has_literal_fallback && fallback_bucket_used {
        diagnostics.push(
            Diagnostic::warning(format!(
                "a literal '/{FALLBACK_GROUP}/...' path in '{}' coexists with endpoints that fall back to the '{FALLBACK_GROUP}' group; their clients merge",
                spec.display_name
            ))
            .at(origin.clone()),
        );
    }

    // Every literal group becomes part of a class name.
    let mut reported: Vec<&str> = Vec::new();
    for group in &groups {
        if group != FALLBACK_GROUP
            && !idents::is_valid_identifier(group)
            && !reported.contains(&group.as_str())
        {
            reported.push(group);
            diagnostics.push(
                Diagnostic::error(format!(
                    "group name '{group}' derived from the first path segment is not a valid identifier"
                ))
                .at(origin.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{AuthMode, HttpMethod, RequestForm, SuccessType};

    fn spec(grouping: Grouping) -> SpecDescriptor {
        SpecDescriptor {
            declaration: "com.example.PetApiSpec".to_string(),
            package: "com.example".to_string(),
            client_prefix: "Pet".to_string(),
            display_name: "Pet".to_string(),
            scan_packages: vec!["com.example.models".to_string()],
            grouping,
            generate_harness: true,
            generate_docs: true,
        }
    }

    fn request(simple_name: &str, fn_name: &str, path: &str) -> RequestDescriptor {
        RequestDescriptor {
            declaration: format!("com.example.models.{simple_name}"),
            simple_name: simple_name.to_string(),
            package: "com.example.models".to_string(),
            method: HttpMethod::Get,
            path: path.to_string(),
            fn_name: fn_name.to_string(),
            form: RequestForm::Marker,
            success: SuccessType::Named("com.example.models.UserDto".to_string()),
            error: None,
            auth: AuthMode::None,
            path_params: vec![],
            query_params: vec![],
            header_params: vec![],
            body_params: vec![],
        }
    }

    #[test]
    fn test_collision_under_single_client() {
        let requests = vec![
            request("GetUserRequest", "getUser", "/users/{id}"),
            request("GetUserRequest2", "getUser", "/accounts/{id}"),
        ];
        let diagnostics = validate_batch(&spec(Grouping::SingleClient), &requests);

        assert!(diagnostics.has_errors());
        let message = &diagnostics.errors[0].message;
        assert!(message.contains("com.example.models.GetUserRequest2"));
        assert!(message.contains("com.example.models.GetUserRequest"));
    }

    #[test]
    fn test_same_name_in_different_groups_is_fine_by_prefix() {
        let requests = vec![
            request("GetUserRequest", "get", "/users"),
            request("GetAccountRequest", "get", "/accounts"),
        ];
        assert!(!validate_batch(&spec(Grouping::ByPrefix), &requests).has_errors());
        // But SingleClient scope still collides.
        assert!(validate_batch(&spec(Grouping::SingleClient), &requests).has_errors());
    }

    #[test]
    fn test_all_fallback_warning() {
        let requests = vec![
            request("GetRootRequest", "getRoot", "/"),
            request("GetByIdRequest", "getById", "/{id}"),
        ];
        let diagnostics = validate_batch(&spec(Grouping::ByPrefix), &requests);

        assert!(!diagnostics.has_errors());
        assert!(diagnostics.warnings.iter().any(|w| w.message.contains("no effect")));
    }

    #[test]
    fn test_majority_fallback_warning() {
        let requests = vec![
            request("ARequest", "a", "/{id}"),
            request("BRequest", "b", "/{key}"),
            request("CRequest", "c", "/users"),
        ];
        let diagnostics = validate_batch(&spec(Grouping::ByPrefix), &requests);
        assert!(diagnostics.warnings.iter().any(|w| w.message.contains("most endpoints")));
    }

    #[test]
    fn test_literal_root_merge_warning() {
        let requests = vec![
            request("ARequest", "a", "/root/status"),
            request("BRequest", "b", "/{id}"),
        ];
        let diagnostics = validate_batch(&spec(Grouping::ByPrefix), &requests);
        assert!(diagnostics.warnings.iter().any(|w| w.message.contains("merge")));
    }

    #[test]
    fn test_invalid_group_name_is_error() {
        let requests = vec![request("ARequest", "a", "/user-profiles/{id}")];
        let diagnostics = validate_batch(&spec(Grouping::ByPrefix), &requests);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.errors[0].message.contains("user-profiles"));
    }

    #[test]
    fn test_no_grouping_checks_under_single_client() {
        let requests = vec![request("ARequest", "a", "/{id}")];
        let diagnostics = validate_batch(&spec(Grouping::SingleClient), &requests);
        assert!(diagnostics.is_empty());
    }
}
