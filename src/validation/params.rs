//! Parameter classification and per-role property rules
//!
//! Each declared property carries zero or one of the Path/Query/Header role
//! markers; a property with none is a body property. All per-property checks
//! run and merge before the pass/fail decision, so one request surfaces every
//! offending property at once.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::descriptors::{
    BodyParam, HeaderParam, HttpMethod, PathParam, PrimitiveType, QueryParam, QueryType,
};
use crate::diagnostics::{Diagnostic, Diagnostics, ValidationResult};
use crate::idents;
use crate::symbols::markers;
use crate::symbols::{ClassDecl, PropertyDecl, SourceRef, TypeRef};
use crate::validation::path::PlaceholderSet;

/// Reserved and hop-by-hop header names; shadowing one is advisory, not
/// fatal.
static RESERVED_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "host",
        "content-length",
        "transfer-encoding",
        "connection",
        "upgrade",
        "keep-alive",
        "te",
        "trailer",
        "proxy-authenticate",
        "proxy-authorization",
    ])
});

/// Properties classified into their path/query/header/body slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedParams {
    pub path: Vec<PathParam>,
    pub query: Vec<QueryParam>,
    pub header: Vec<HeaderParam>,
    pub body: Vec<BodyParam>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Role {
    Path,
    Query,
    Header,
    Body,
}

/// Classifies and validates every property of a request declaration against
/// its HTTP method and the extracted placeholder set.
pub fn classify_properties(
    decl: &ClassDecl,
    method: HttpMethod,
    placeholders: &PlaceholderSet,
) -> ValidationResult<ClassifiedParams> {
    let mut diagnostics = Diagnostics::new();
    let mut params = ClassifiedParams::default();

    // Path property names, tracked independently of successfully built
    // params so the symmetry check does not double-report type errors.
    let mut path_names: HashSet<String> = HashSet::new();
    // Resolved wire header name (lower-cased) -> first claiming property.
    let mut header_names: HashMap<String, String> = HashMap::new();

    for property in &decl.properties {
        let origin = SourceRef::property(decl.qualified_name.clone(), property.name.clone());
        let roles: Vec<Role> = [
            (markers::PATH, Role::Path),
            (markers::QUERY, Role::Query),
            (markers::HEADER, Role::Header),
        ]
        .iter()
        .filter(|(marker, _)| property.has_annotation(marker))
        .map(|(_, role)| *role)
        .collect();

        let role = match roles.as_slice() {
            [] => Role::Body,
            [single] => *single,
            _ => {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "property '{}' carries more than one parameter role annotation",
                        property.name
                    ))
                    .at(origin),
                );
                continue;
            }
        };

        match role {
            Role::Path => {
                path_names.insert(property.name.clone());
                check_wire_exclusion(property, &origin, &mut diagnostics);
                match scalar_type(&property.ty) {
                    Some(ty) => params.path.push(PathParam {
                        name: property.name.clone(),
                        ty,
                    }),
                    None => diagnostics.push(
                        Diagnostic::error(format!(
                            "@Path property '{}' has unsupported type '{}'; only primitive types are allowed",
                            property.name, property.ty.name
                        ))
                        .at(origin),
                    ),
                }
            }
            Role::Query => {
                if !method.allows_query() {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "@Query property '{}' is not allowed on {method} requests; query parameters require GET or DELETE",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                }
                check_nullable(property, "@Query", &origin, &mut diagnostics);
                check_default(decl, property, "@Query", &origin, &mut diagnostics);
                check_wire_exclusion(property, &origin, &mut diagnostics);
                if let Some(ty) = query_type(&property.ty, &property.name, &origin, &mut diagnostics)
                {
                    params.query.push(QueryParam {
                        name: property.name.clone(),
                        ty,
                    });
                }
            }
            Role::Header => {
                check_nullable(property, "@Header", &origin, &mut diagnostics);
                check_default(decl, property, "@Header", &origin, &mut diagnostics);
                check_wire_exclusion(property, &origin, &mut diagnostics);

                let header = property
                    .annotation(markers::HEADER)
                    .and_then(|a| a.arg("name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(&property.name)
                    .to_string();

                if !idents::is_valid_header_name(&header) {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "@Header property '{}' resolves to wire name '{header}', which is not a valid HTTP header name",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                }
                let lowered = header.to_ascii_lowercase();
                if let Some(previous) = header_names.get(&lowered) {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "@Header property '{}' resolves to wire name '{header}', which collides with property '{previous}'",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                } else {
                    header_names.insert(lowered.clone(), property.name.clone());
                }
                if RESERVED_HEADERS.contains(lowered.as_str()) {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "@Header property '{}' shadows the reserved header '{header}'",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                }

                match scalar_type(&property.ty) {
                    Some(ty) => params.header.push(HeaderParam {
                        name: property.name.clone(),
                        header,
                        ty,
                    }),
                    None => diagnostics.push(
                        Diagnostic::error(format!(
                            "@Header property '{}' has unsupported type '{}'; list-valued headers are not allowed",
                            property.name, property.ty.name
                        ))
                        .at(origin),
                    ),
                }
            }
            Role::Body => {
                if !method.allows_body() {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "body property '{}' is not allowed on {method} requests",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                }
                if !property.ty.nullable && !decl.has_default(&property.name) {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "body property '{}' must be nullable or declare a constructor default",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                }
                if !property.mutable {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "body property '{}' is declared 'val'; the request builder block expects 'var'",
                            property.name
                        ))
                        .at(origin.clone()),
                    );
                }
                params.body.push(BodyParam {
                    name: property.name.clone(),
                    mutable: property.mutable,
                });
            }
        }
    }

    // Symmetric placeholder check, both directions.
    for placeholder in &placeholders.usable {
        if !path_names.contains(placeholder) {
            diagnostics.push(
                Diagnostic::error(format!(
                    "placeholder '{{{placeholder}}}' has no matching @Path property"
                ))
                .at(decl.source_ref()),
            );
        }
    }
    for name in &path_names {
        if !placeholders.usable.contains(name) {
            diagnostics.push(
                Diagnostic::error(format!(
                    "@Path property '{name}' has no matching '{{{name}}}' placeholder in the path template"
                ))
                .at(SourceRef::property(decl.qualified_name.clone(), name.clone())),
            );
        }
    }

    ValidationResult::from_diagnostics(params, diagnostics)
}

fn check_nullable(
    property: &PropertyDecl,
    role: &str,
    origin: &SourceRef,
    diagnostics: &mut Diagnostics,
) {
    if !property.ty.nullable {
        diagnostics.push(
            Diagnostic::error(format!(
                "{role} property '{}' must be nullable",
                property.name
            ))
            .at(origin.clone()),
        );
    }
}

fn check_default(
    decl: &ClassDecl,
    property: &PropertyDecl,
    role: &str,
    origin: &SourceRef,
    diagnostics: &mut Diagnostics,
) {
    if !decl.has_default(&property.name) {
        diagnostics.push(
            Diagnostic::error(format!(
                "{role} property '{}' must declare a default value",
                property.name
            ))
            .at(origin.clone()),
        );
    }
}

/// Path/query/header properties must carry the serialization-level exclusion
/// marker; the JVM-level transient marker is a distinct, more specific error.
fn check_wire_exclusion(
    property: &PropertyDecl,
    origin: &SourceRef,
    diagnostics: &mut Diagnostics,
) {
    if property.has_annotation(markers::TRANSIENT) {
        return;
    }
    let message = if property.has_annotation(markers::JVM_TRANSIENT) {
        format!(
            "property '{}' uses the JVM-level @Transient marker, which does not affect serialization; use kotlinx.serialization.Transient",
            property.name
        )
    } else {
        format!(
            "property '{}' must be marked @Transient so it is excluded from the wire payload",
            property.name
        )
    };
    diagnostics.push(Diagnostic::error(message).at(origin.clone()));
}

fn scalar_type(ty: &TypeRef) -> Option<PrimitiveType> {
    if !ty.args.is_empty() {
        return None;
    }
    PrimitiveType::from_qualified(&ty.name)
}

fn query_type(
    ty: &TypeRef,
    property: &str,
    origin: &SourceRef,
    diagnostics: &mut Diagnostics,
) -> Option<QueryType> {
    if ty.name == markers::LIST {
        let element = match ty.args.as_slice() {
            [element] => element,
            _ => {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "@Query property '{property}' has a list type without exactly one element type"
                    ))
                    .at(origin.clone()),
                );
                return None;
            }
        };
        if element.name == markers::LIST {
            diagnostics.push(
                Diagnostic::error(format!(
                    "@Query property '{property}' is a list of lists; only one level of list-wrapping is supported"
                ))
                .at(origin.clone()),
            );
            return None;
        }
        return match scalar_type(element) {
            Some(primitive) => Some(QueryType::List(primitive)),
            None => {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "@Query property '{property}' is a list of unsupported type '{}'",
                        element.name
                    ))
                    .at(origin.clone()),
                );
                None
            }
        };
    }
    match scalar_type(ty) {
        Some(primitive) => Some(QueryType::Scalar(primitive)),
        None => {
            diagnostics.push(
                Diagnostic::error(format!(
                    "@Query property '{property}' has unsupported type '{}'",
                    ty.name
                ))
                .at(origin.clone()),
            );
            None
        }
    }
}
