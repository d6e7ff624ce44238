//! Shared fixture builders for integration tests

use std::collections::BTreeMap;

use clientsmith::symbols::markers;
use clientsmith::symbols::{
    AnnotationUse, AnnotationValue, ClassDecl, ClassKind, Modifiers, PropertyDecl, TypeRef,
};

/// A plain `@ApiSpec object <name>Spec` declaration in `com.example`.
pub fn api_spec(name: &str) -> ClassDecl {
    api_spec_with(name, AnnotationUse::new(markers::API_SPEC))
}

pub fn api_spec_with(name: &str, annotation: AnnotationUse) -> ClassDecl {
    ClassDecl {
        qualified_name: format!("com.example.{name}"),
        package: "com.example".to_string(),
        kind: ClassKind::Object,
        modifiers: Modifiers::default(),
        annotations: vec![annotation],
        properties: vec![],
        supertypes: vec![],
        constructor_defaults: BTreeMap::new(),
    }
}

/// A `@Serializable data class` response type under `com.example.models`.
pub fn serializable_dto(name: &str) -> ClassDecl {
    ClassDecl {
        qualified_name: format!("com.example.models.{name}"),
        package: "com.example.models".to_string(),
        kind: ClassKind::DataClass,
        modifiers: Modifiers::default(),
        annotations: vec![AnnotationUse::new(markers::SERIALIZABLE)],
        properties: vec![],
        supertypes: vec![],
        constructor_defaults: BTreeMap::new(),
    }
}

/// A parameterless marker request (`object`) under `com.example.models`.
pub fn marker_request(name: &str, method_marker: &str, path: &str, success: &str) -> ClassDecl {
    ClassDecl {
        qualified_name: format!("com.example.models.{name}"),
        package: "com.example.models".to_string(),
        kind: ClassKind::Object,
        modifiers: Modifiers::default(),
        annotations: vec![
            AnnotationUse::new(method_marker)
                .with_arg("path", AnnotationValue::Str(path.to_string())),
            AnnotationUse::new(markers::RETURNS)
                .with_arg("success", AnnotationValue::Type(success.to_string())),
        ],
        properties: vec![],
        supertypes: vec![],
        constructor_defaults: BTreeMap::new(),
    }
}

/// A data-class request with the given properties.
pub fn data_request(
    name: &str,
    method_marker: &str,
    path: &str,
    success: &str,
    properties: Vec<PropertyDecl>,
) -> ClassDecl {
    let mut decl = marker_request(name, method_marker, path, success);
    decl.kind = ClassKind::DataClass;
    decl.properties = properties;
    decl
}

/// A `@Path`-marked property, excluded from the wire payload.
pub fn path_property(name: &str, ty: &str) -> PropertyDecl {
    let mut property = PropertyDecl::new(name, TypeRef::new(ty));
    property.annotations = vec![
        AnnotationUse::new(markers::PATH),
        AnnotationUse::new(markers::TRANSIENT),
    ];
    property
}

/// A `@Query`-marked property. `nullable` is controlled by the caller so
/// tests can exercise the nullability rule.
pub fn query_property(name: &str, ty: &str, nullable: bool) -> PropertyDecl {
    let type_ref = if nullable {
        TypeRef::nullable(ty)
    } else {
        TypeRef::new(ty)
    };
    let mut property = PropertyDecl::new(name, type_ref);
    property.annotations = vec![
        AnnotationUse::new(markers::QUERY),
        AnnotationUse::new(markers::TRANSIENT),
    ];
    property
}

/// Marks a property's constructor parameter as defaulted.
pub fn with_default(mut decl: ClassDecl, property: &str) -> ClassDecl {
    decl.constructor_defaults.insert(property.to_string(), true);
    decl
}
