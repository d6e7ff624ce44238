//! Pipeline driver - sequences discovery, validation and generation
//!
//! One synchronous pass per build round: discover `@ApiSpec` declarations,
//! validate them, validate the request declarations under each spec's scan
//! packages, cross-validate every batch, and generate only when the whole
//! invocation is error-free (all-or-nothing).

use std::collections::HashSet;

use crate::descriptors::{RequestDescriptor, SpecDescriptor};
use crate::diagnostics::Diagnostics;
use crate::generation::{self, Artifact};
use crate::symbols::markers;
use crate::symbols::{ClassDecl, SymbolUniverse};
use crate::validation::{validate_batch, validate_request, validate_specs};

/// Everything one pass produced: artifacts (empty when any error was raised)
/// and the full diagnostic record.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub artifacts: Vec<Artifact>,
    pub diagnostics: Diagnostics,
}

impl PipelineOutcome {
    pub fn generated(&self) -> bool {
        !self.artifacts.is_empty()
    }
}

/// Runs one full validate/generate pass over the universe.
pub fn run(universe: &dyn SymbolUniverse) -> PipelineOutcome {
    let mut diagnostics = Diagnostics::new();

    let spec_decls = universe.annotated_with(markers::API_SPEC);
    tracing::debug!("discovered {} API spec declarations", spec_decls.len());

    let (specs, spec_diagnostics) = validate_specs(&spec_decls);
    diagnostics.extend(spec_diagnostics);

    let mut validated: Vec<(SpecDescriptor, Vec<RequestDescriptor>)> = Vec::new();
    for spec in specs {
        let requests = validate_spec_requests(&spec, universe, &mut diagnostics);
        tracing::debug!(
            "spec '{}': {} valid request(s)",
            spec.display_name,
            requests.len()
        );
        diagnostics.extend(validate_batch(&spec, &requests));
        validated.push((spec, requests));
    }

    if diagnostics.has_errors() {
        tracing::debug!(
            "suppressing generation: {} error(s) in this round",
            diagnostics.errors.len()
        );
        return PipelineOutcome {
            artifacts: Vec::new(),
            diagnostics,
        };
    }

    let artifacts: Vec<Artifact> = validated
        .iter()
        .flat_map(|(spec, requests)| generation::generate_spec(spec, requests))
        .collect();
    tracing::debug!("generated {} artifact(s)", artifacts.len());

    PipelineOutcome {
        artifacts,
        diagnostics,
    }
}

/// Validates every request declaration under the spec's scan packages.
/// One request's errors never stop validation of its siblings.
fn validate_spec_requests(
    spec: &SpecDescriptor,
    universe: &dyn SymbolUniverse,
    diagnostics: &mut Diagnostics,
) -> Vec<RequestDescriptor> {
    let mut requests = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    for package in &spec.scan_packages {
        for decl in universe.classes_under(package) {
            if !looks_like_request(decl) || !visited.insert(decl.qualified_name.as_str()) {
                continue;
            }
            if let Some(request) =
                validate_request(decl, universe).collect_into(diagnostics)
            {
                requests.push(request);
            }
        }
    }
    requests
}

/// Discovery predicate: a declaration carrying any HTTP method marker is
/// treated as a request shape and validated.
fn looks_like_request(decl: &ClassDecl) -> bool {
    markers::HTTP_METHOD_MARKERS
        .iter()
        .any(|marker| decl.has_annotation(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{
        AnnotationUse, AnnotationValue, ClassKind, InMemoryUniverse, Modifiers,
    };
    use std::collections::BTreeMap;

    fn dto(qualified: &str) -> ClassDecl {
        ClassDecl {
            qualified_name: qualified.to_string(),
            package: qualified.rsplit_once('.').map(|(p, _)| p).unwrap_or("").to_string(),
            kind: ClassKind::DataClass,
            modifiers: Modifiers::default(),
            annotations: vec![AnnotationUse::new(markers::SERIALIZABLE)],
            properties: vec![],
            supertypes: vec![],
            constructor_defaults: BTreeMap::new(),
        }
    }

    fn spec_decl() -> ClassDecl {
        ClassDecl {
            qualified_name: "com.example.PetApiSpec".to_string(),
            package: "com.example".to_string(),
            kind: ClassKind::Object,
            modifiers: Modifiers::default(),
            annotations: vec![AnnotationUse::new(markers::API_SPEC)],
            properties: vec![],
            supertypes: vec![],
            constructor_defaults: BTreeMap::new(),
        }
    }

    fn request_decl(name: &str, path: &str) -> ClassDecl {
        ClassDecl {
            qualified_name: format!("com.example.models.{name}"),
            package: "com.example.models".to_string(),
            kind: ClassKind::Object,
            modifiers: Modifiers::default(),
            annotations: vec![
                AnnotationUse::new(markers::GET)
                    .with_arg("path", AnnotationValue::Str(path.to_string())),
                AnnotationUse::new(markers::RETURNS).with_arg(
                    "success",
                    AnnotationValue::Type("com.example.models.UserDto".to_string()),
                ),
            ],
            properties: vec![],
            supertypes: vec![],
            constructor_defaults: BTreeMap::new(),
        }
    }

    #[test]
    fn test_happy_path_generates() {
        let universe = InMemoryUniverse::from_classes(vec![
            spec_decl(),
            dto("com.example.models.UserDto"),
            request_decl("ListUsersRequest", "/users"),
        ]);

        let outcome = run(&universe);
        assert!(!outcome.diagnostics.has_errors());
        assert!(outcome.generated());
        // One client plus the harness.
        assert_eq!(outcome.artifacts.len(), 2);
    }

    #[test]
    fn test_one_bad_request_suppresses_everything() {
        let universe = InMemoryUniverse::from_classes(vec![
            spec_decl(),
            dto("com.example.models.UserDto"),
            request_decl("ListUsersRequest", "/users"),
            request_decl("Broken", "/users"),
        ]);

        let outcome = run(&universe);
        assert!(outcome.diagnostics.has_errors());
        assert!(outcome.artifacts.is_empty());
    }

    #[test]
    fn test_sibling_requests_still_validated() {
        let universe = InMemoryUniverse::from_classes(vec![
            spec_decl(),
            dto("com.example.models.UserDto"),
            request_decl("Broken", "/users"),
            request_decl("AlsoBroken", "/users"),
        ]);

        let outcome = run(&universe);
        // Both siblings are reported; neither stops the other.
        assert_eq!(outcome.diagnostics.errors.len(), 2);
    }

    #[test]
    fn test_unannotated_classes_ignored() {
        let universe = InMemoryUniverse::from_classes(vec![
            spec_decl(),
            dto("com.example.models.UserDto"),
            dto("com.example.models.StrayRequest"),
        ]);

        let outcome = run(&universe);
        assert!(!outcome.diagnostics.has_errors());
    }

    #[test]
    fn test_empty_universe() {
        let outcome = run(&InMemoryUniverse::new());
        assert!(outcome.diagnostics.is_empty());
        assert!(outcome.artifacts.is_empty());
    }
}
