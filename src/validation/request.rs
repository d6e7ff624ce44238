//! End-to-end validation of one request declaration
//!
//! Structural checks run fail-fast because downstream fields would otherwise
//! be undefined (an unresolvable HTTP method makes path and parameter
//! analysis meaningless). Once the structure holds, parameter and return-type
//! checks all run and merge their findings.

use crate::descriptors::{AuthMode, HttpMethod, RequestDescriptor, RequestForm, SuccessType};
use crate::diagnostics::{Diagnostic, Diagnostics, ValidationResult};
use crate::idents;
use crate::symbols::markers;
use crate::symbols::{ClassDecl, ClassKind, SourceRef, SymbolUniverse};
use crate::validation::params::classify_properties;
use crate::validation::path::{extract_placeholders, normalize_path, validate_path_template};

/// Validates a request declaration into a [`RequestDescriptor`].
pub fn validate_request(
    decl: &ClassDecl,
    universe: &dyn SymbolUniverse,
) -> ValidationResult<RequestDescriptor> {
    let origin = decl.source_ref();
    let mut warnings: Vec<Diagnostic> = Vec::new();
    let fail = |message: String, warnings: Vec<Diagnostic>| {
        ValidationResult::invalid_with(vec![Diagnostic::error(message).at(origin.clone())], warnings)
    };

    // 1. Name shape.
    let simple_name = decl.simple_name();
    if simple_name == markers::REQUEST_SUFFIX {
        return fail(
            format!("'{simple_name}' alone is not a valid request class name"),
            warnings,
        );
    }
    if !simple_name.ends_with(markers::REQUEST_SUFFIX) {
        return fail(
            format!("request class '{simple_name}' must end with '{}'", markers::REQUEST_SUFFIX),
            warnings,
        );
    }

    // 2. Derived function name.
    let fn_name = match idents::endpoint_name(simple_name) {
        Some(name) if idents::is_valid_identifier(&name) => name,
        Some(name) => {
            return fail(
                format!("derived function name '{name}' is not a valid identifier"),
                warnings,
            );
        }
        None => {
            return fail(
                format!("request class '{simple_name}' derives an empty function name"),
                warnings,
            );
        }
    };

    // 3. Modifiers.
    if decl.modifiers.is_abstract {
        return fail(
            format!("request class '{simple_name}' must not be abstract"),
            warnings,
        );
    }
    if decl.modifiers.is_sealed {
        return fail(
            format!("request class '{simple_name}' must not be sealed"),
            warnings,
        );
    }
    if decl.modifiers.is_inner {
        return fail(
            format!("request class '{simple_name}' must not be an inner class"),
            warnings,
        );
    }

    // 4. Exactly one HTTP method marker.
    let method_markers = decl.annotations_among(&markers::HTTP_METHOD_MARKERS);
    let method_annotation = match method_markers.as_slice() {
        [] => {
            return fail(
                format!("request class '{simple_name}' must carry exactly one HTTP method annotation"),
                warnings,
            );
        }
        [single] => *single,
        _ => {
            return fail(
                format!("request class '{simple_name}' carries multiple HTTP method annotations"),
                warnings,
            );
        }
    };
    let method = HttpMethod::from_marker(&method_annotation.name)
        .unwrap_or_else(|| unreachable!("filtered to known markers"));

    // 5. Path argument present and non-blank.
    let raw_path = method_annotation
        .arg("path")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if raw_path.trim().is_empty() {
        return fail(
            format!("@{method} on '{simple_name}' is missing a non-blank path"),
            warnings,
        );
    }

    // 6. Path grammar, then normalization.
    let path_errors = validate_path_template(raw_path, &origin);
    if !path_errors.is_empty() {
        return ValidationResult::invalid_with(path_errors, warnings);
    }
    let (path, slash_warning) = normalize_path(raw_path, &origin);
    warnings.extend(slash_warning);

    // 7. Return types.
    let Some(returns) = decl.annotation(markers::RETURNS) else {
        return fail(
            format!("request class '{simple_name}' must declare @Returns"),
            warnings,
        );
    };
    let success = match returns.arg("success").and_then(|v| v.as_type()) {
        None => {
            return fail(
                format!("@Returns on '{simple_name}' is missing a success type"),
                warnings,
            );
        }
        Some(markers::NOTHING) => {
            return fail(
                format!(
                    "Nothing is not a valid success type on '{simple_name}'; use NoContent for empty responses"
                ),
                warnings,
            );
        }
        Some(markers::NO_CONTENT) => SuccessType::Empty,
        Some(qualified) => SuccessType::Named(qualified.to_string()),
    };
    let error = match returns.arg("error").and_then(|v| v.as_type()) {
        None | Some(markers::NOTHING) => None,
        Some(markers::UNIT) => {
            return fail(
                format!(
                    "Unit is not a valid error type on '{simple_name}'; omit the error type instead"
                ),
                warnings,
            );
        }
        Some(qualified) => Some(qualified.to_string()),
    };

    // 8. Marker form vs data aggregate.
    let form = if decl.properties.is_empty() {
        if decl.kind != ClassKind::Object {
            return fail(
                format!("parameterless request '{simple_name}' must be declared as an object"),
                warnings,
            );
        }
        RequestForm::Marker
    } else {
        if decl.kind != ClassKind::DataClass {
            return fail(
                format!("request '{simple_name}' declares properties and must be a data class"),
                warnings,
            );
        }
        RequestForm::Data
    };

    // 9. Auth resolution.
    let auth = match resolve_auth(decl, &origin) {
        Ok(auth) => auth,
        Err(error) => return ValidationResult::invalid_with(vec![error], warnings),
    };

    // Structure holds; the remaining stages merge all findings.
    let mut diagnostics = Diagnostics::new();
    diagnostics.warnings.extend(warnings);

    let placeholders = extract_placeholders(&path);
    for name in &placeholders.duplicates {
        diagnostics.push(
            Diagnostic::error(format!("duplicate placeholder '{{{name}}}' in path '{path}'"))
                .at(origin.clone()),
        );
    }
    for name in &placeholders.invalid {
        diagnostics.push(
            Diagnostic::error(format!(
                "placeholder '{{{name}}}' in path '{path}' is not a valid identifier"
            ))
            .at(origin.clone()),
        );
    }

    let params = classify_properties(decl, method, &placeholders)
        .collect_into(&mut diagnostics)
        .unwrap_or_default();

    validate_return_types(&success, error.as_deref(), universe, &origin, &mut diagnostics);

    // Self-referential decoding is almost certainly a mistake, but compiles.
    let self_referential = matches!(&success, SuccessType::Named(n) if n == &decl.qualified_name)
        || error.as_deref() == Some(decl.qualified_name.as_str());
    if self_referential {
        diagnostics.push(
            Diagnostic::warning(format!(
                "request '{simple_name}' declares itself as its own response type"
            ))
            .at(origin.clone()),
        );
    }

    let descriptor = RequestDescriptor {
        declaration: decl.qualified_name.clone(),
        simple_name: simple_name.to_string(),
        package: decl.package.clone(),
        method,
        path,
        fn_name,
        form,
        success,
        error,
        auth,
        path_params: params.path,
        query_params: params.query,
        header_params: params.header,
        body_params: params.body,
    };
    ValidationResult::from_diagnostics(descriptor, diagnostics)
}

fn resolve_auth(decl: &ClassDecl, origin: &SourceRef) -> Result<AuthMode, Diagnostic> {
    let Some(annotation) = decl.annotation(markers::AUTH) else {
        return Ok(AuthMode::None);
    };
    let mode = annotation
        .arg("type")
        .map(|value| value.as_enum().or_else(|| value.as_str()).unwrap_or(""))
        .unwrap_or("NONE");
    let header = annotation.arg("headerName").and_then(|v| v.as_str());

    let resolved = match mode {
        "NONE" => AuthMode::None,
        "BEARER" => AuthMode::Bearer,
        "BASIC" => AuthMode::Basic,
        "API_KEY" => AuthMode::ApiKey {
            header: header.unwrap_or(markers::DEFAULT_API_KEY_HEADER).to_string(),
        },
        "CUSTOM" => AuthMode::Custom,
        other => {
            return Err(Diagnostic::error(format!(
                "unrecognized auth type '{other}' on '{}'",
                decl.simple_name()
            ))
            .at(origin.clone()));
        }
    };

    // headerName is an API_KEY-only knob.
    if !matches!(resolved, AuthMode::ApiKey { .. }) {
        if let Some(name) = header {
            if name != markers::DEFAULT_API_KEY_HEADER {
                return Err(Diagnostic::error(format!(
                    "headerName '{name}' on '{}' is only valid with API_KEY auth",
                    decl.simple_name()
                ))
                .at(origin.clone()));
            }
        }
    }
    Ok(resolved)
}

/// Success and error types must resolve to concrete serializable classes.
/// Both checks are independent; both violations are reported when both occur.
fn validate_return_types(
    success: &SuccessType,
    error: Option<&str>,
    universe: &dyn SymbolUniverse,
    origin: &SourceRef,
    diagnostics: &mut Diagnostics,
) {
    if let SuccessType::Named(qualified) = success {
        check_response_type(qualified, "success", universe, origin, diagnostics);
    }
    if let Some(qualified) = error {
        check_response_type(qualified, "error", universe, origin, diagnostics);
    }
}

fn check_response_type(
    qualified: &str,
    role: &str,
    universe: &dyn SymbolUniverse,
    origin: &SourceRef,
    diagnostics: &mut Diagnostics,
) {
    let Some(resolved) = universe.resolve(qualified) else {
        diagnostics.push(
            Diagnostic::error(format!("{role} type '{qualified}' cannot be resolved"))
                .at(origin.clone()),
        );
        return;
    };
    let concrete = !resolved.modifiers.is_abstract
        && !matches!(resolved.kind, ClassKind::Interface);
    if !concrete {
        diagnostics.push(
            Diagnostic::error(format!("{role} type '{qualified}' must be a concrete class"))
                .at(origin.clone()),
        );
    }
    if !resolved.has_annotation(markers::SERIALIZABLE) {
        diagnostics.push(
            Diagnostic::error(format!("{role} type '{qualified}' is not marked @Serializable"))
                .at(origin.clone()),
        );
    }
}
