//! Spec-level validation of API root declarations

use std::collections::HashMap;

use crate::descriptors::{Grouping, SpecDescriptor};
use crate::diagnostics::{Diagnostic, Diagnostics, ValidationResult};
use crate::idents;
use crate::symbols::markers;
use crate::symbols::{ClassDecl, ClassKind};

/// Validates one `@ApiSpec` declaration into a [`SpecDescriptor`].
pub fn validate_spec(decl: &ClassDecl) -> ValidationResult<SpecDescriptor> {
    let mut diagnostics = Diagnostics::new();
    let origin = decl.source_ref();

    let Some(annotation) = decl.annotation(markers::API_SPEC) else {
        return ValidationResult::invalid(vec![
            Diagnostic::error(format!(
                "declaration '{}' is missing the @ApiSpec annotation",
                decl.qualified_name
            ))
            .at(origin),
        ]);
    };

    if !matches!(decl.kind, ClassKind::Object | ClassKind::Interface) {
        diagnostics.push(
            Diagnostic::error(format!(
                "API spec '{}' must be declared as an object or interface",
                decl.simple_name()
            ))
            .at(origin.clone()),
        );
    }
    if decl.modifiers.is_inner {
        diagnostics.push(
            Diagnostic::error(format!(
                "API spec '{}' must not be an inner declaration",
                decl.simple_name()
            ))
            .at(origin.clone()),
        );
    }
    // A spec declaration is a pure configuration holder.
    for supertype in &decl.supertypes {
        if supertype.name != "kotlin.Any" {
            diagnostics.push(
                Diagnostic::error(format!(
                    "API spec '{}' must not extend or implement '{}'",
                    decl.simple_name(),
                    supertype.name
                ))
                .at(origin.clone()),
            );
        }
    }

    let client_prefix = idents::client_prefix(decl.simple_name());
    if client_prefix.trim().is_empty() {
        diagnostics.push(
            Diagnostic::error(format!(
                "API spec '{}' derives a blank client name prefix",
                decl.simple_name()
            ))
            .at(origin.clone()),
        );
    } else if !idents::is_valid_identifier(&client_prefix) {
        diagnostics.push(
            Diagnostic::error(format!(
                "derived client name prefix '{client_prefix}' is not a valid identifier"
            ))
            .at(origin.clone()),
        );
    }

    let scan_packages = match annotation.arg("scanPackages").and_then(|v| v.as_str_list()) {
        Some(packages) if !packages.is_empty() => packages.to_vec(),
        _ => vec![format!("{}.models", decl.package)],
    };
    for package in &scan_packages {
        if !idents::is_valid_package_path(package) {
            diagnostics.push(
                Diagnostic::error(format!(
                    "scan package '{package}' is not a valid package path"
                ))
                .at(origin.clone()),
            );
        }
    }

    let grouping = match annotation.arg("grouping") {
        Some(value) => {
            let entry = value.as_enum().or_else(|| value.as_str());
            match entry.and_then(Grouping::parse) {
                Some(grouping) => grouping,
                None => {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "unrecognized grouping mode {value:?}; expected SINGLE_CLIENT or BY_PREFIX"
                        ))
                        .at(origin.clone()),
                    );
                    Grouping::default()
                }
            }
        }
        None => Grouping::default(),
    };

    let generate_harness = annotation
        .arg("generateTestHarness")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    let generate_docs = annotation
        .arg("generateKDoc")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);

    let display_name = annotation
        .arg("displayName")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| client_prefix.clone());

    let descriptor = SpecDescriptor {
        declaration: decl.qualified_name.clone(),
        package: decl.package.clone(),
        client_prefix,
        display_name,
        scan_packages,
        grouping,
        generate_harness,
        generate_docs,
    };
    ValidationResult::from_diagnostics(descriptor, diagnostics)
}

/// Validates a batch of spec declarations, including the cross-spec rule that
/// no two specs in one package may collide on the derived client class name
/// (case-insensitively). The first spec wins; later colliders are rejected.
pub fn validate_specs(decls: &[&ClassDecl]) -> (Vec<SpecDescriptor>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut specs: Vec<SpecDescriptor> = Vec::new();
    let mut claimed: HashMap<(String, String), String> = HashMap::new();

    for decl in decls {
        let Some(spec) = validate_spec(decl).collect_into(&mut diagnostics) else {
            continue;
        };
        let key = (
            spec.package.clone(),
            spec.client_class_name().to_ascii_lowercase(),
        );
        if let Some(previous) = claimed.get(&key) {
            diagnostics.push(
                Diagnostic::error(format!(
                    "client name '{}' collides with the one derived from '{previous}' in package '{}'",
                    spec.client_class_name(),
                    spec.package
                ))
                .at(decl.source_ref()),
            );
            continue;
        }
        claimed.insert(key, spec.declaration.clone());
        specs.push(spec);
    }

    (specs, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{AnnotationUse, AnnotationValue, Modifiers, TypeRef};
    use std::collections::BTreeMap;

    fn spec_decl(qualified: &str, package: &str, annotation: AnnotationUse) -> ClassDecl {
        ClassDecl {
            qualified_name: qualified.to_string(),
            package: package.to_string(),
            kind: ClassKind::Object,
            modifiers: Modifiers::default(),
            annotations: vec![annotation],
            properties: vec![],
            supertypes: vec![],
            constructor_defaults: BTreeMap::new(),
        }
    }

    fn plain_spec(qualified: &str, package: &str) -> ClassDecl {
        spec_decl(qualified, package, AnnotationUse::new(markers::API_SPEC))
    }

    #[test]
    fn test_defaults_table() {
        let decl = plain_spec("com.example.PetApiSpec", "com.example");
        let result = validate_spec(&decl);

        match result {
            ValidationResult::Valid { value, .. } => {
                assert_eq!(value.client_prefix, "Pet");
                assert_eq!(value.display_name, "Pet");
                assert_eq!(value.scan_packages, vec!["com.example.models".to_string()]);
                assert_eq!(value.grouping, Grouping::SingleClient);
                assert!(value.generate_harness);
                assert!(value.generate_docs);
            }
            ValidationResult::Invalid { errors, .. } => panic!("unexpected errors: {errors:?}"),
        }
    }

    #[test]
    fn test_explicit_configuration() {
        let annotation = AnnotationUse::new(markers::API_SPEC)
            .with_arg(
                "scanPackages",
                AnnotationValue::StrList(vec!["com.example.api".to_string()]),
            )
            .with_arg("grouping", AnnotationValue::Enum("BY_PREFIX".to_string()))
            .with_arg("generateTestHarness", AnnotationValue::Bool(false))
            .with_arg("displayName", AnnotationValue::Str("Pet Store".to_string()));
        let decl = spec_decl("com.example.PetApiSpec", "com.example", annotation);

        let result = validate_spec(&decl);
        match result {
            ValidationResult::Valid { value, .. } => {
                assert_eq!(value.scan_packages, vec!["com.example.api".to_string()]);
                assert_eq!(value.grouping, Grouping::ByPrefix);
                assert!(!value.generate_harness);
                assert_eq!(value.display_name, "Pet Store");
            }
            ValidationResult::Invalid { errors, .. } => panic!("unexpected errors: {errors:?}"),
        }
    }

    #[test]
    fn test_blank_prefix_rejected() {
        let decl = plain_spec("com.example.ApiSpec", "com.example");
        let result = validate_spec(&decl);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_invalid_scan_package_rejected() {
        let annotation = AnnotationUse::new(markers::API_SPEC).with_arg(
            "scanPackages",
            AnnotationValue::StrList(vec!["com..broken".to_string()]),
        );
        let decl = spec_decl("com.example.PetApiSpec", "com.example", annotation);

        match validate_spec(&decl) {
            ValidationResult::Invalid { errors, .. } => {
                assert!(errors[0].message.contains("not a valid package path"));
            }
            ValidationResult::Valid { .. } => panic!("expected invalid"),
        }
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let mut decl = plain_spec("com.example.PetApiSpec", "com.example");
        decl.kind = ClassKind::DataClass;
        assert!(!validate_spec(&decl).is_valid());
    }

    #[test]
    fn test_supertypes_rejected() {
        let mut decl = plain_spec("com.example.PetApiSpec", "com.example");
        decl.supertypes = vec![TypeRef::new("com.example.BaseSpec")];

        match validate_spec(&decl) {
            ValidationResult::Invalid { errors, .. } => {
                assert!(errors[0]
                    .message
                    .contains("must not extend or implement 'com.example.BaseSpec'"));
            }
            ValidationResult::Valid { .. } => panic!("expected invalid"),
        }

        // The implicit root supertype is always fine.
        let mut any_only = plain_spec("com.example.PetApiSpec", "com.example");
        any_only.supertypes = vec![TypeRef::new("kotlin.Any")];
        assert!(validate_spec(&any_only).is_valid());
    }

    #[test]
    fn test_client_name_collision_case_insensitive() {
        let first = plain_spec("com.example.PetApiSpec", "com.example");
        let second = plain_spec("com.example.PETSpec", "com.example");

        let (specs, diagnostics) = validate_specs(&[&first, &second]);
        assert_eq!(specs.len(), 1);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.errors[0].message.contains("collides"));
    }

    #[test]
    fn test_same_prefix_in_different_packages_is_fine() {
        let first = plain_spec("com.a.PetApiSpec", "com.a");
        let second = plain_spec("com.b.PetApiSpec", "com.b");

        let (specs, diagnostics) = validate_specs(&[&first, &second]);
        assert_eq!(specs.len(), 2);
        assert!(!diagnostics.has_errors());
    }
}
