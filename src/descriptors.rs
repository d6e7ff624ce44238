//! Validated descriptors - the data model flowing from validation into
//! generation
//!
//! A [`SpecDescriptor`] is produced once per discovered API root declaration
//! and a [`RequestDescriptor`] once per validated request declaration. Both
//! are immutable after validation and live only for one generation pass.

use serde::Serialize;
use std::fmt;

use crate::idents;

/// HTTP methods recognized on request declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Maps an HTTP method marker annotation to its method.
    pub fn from_marker(marker: &str) -> Option<Self> {
        use crate::symbols::markers;
        match marker {
            markers::GET => Some(HttpMethod::Get),
            markers::POST => Some(HttpMethod::Post),
            markers::PUT => Some(HttpMethod::Put),
            markers::DELETE => Some(HttpMethod::Delete),
            markers::PATCH => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    /// Body properties are permitted only on POST/PUT/PATCH.
    pub fn allows_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// Query properties are permitted only on GET/DELETE.
    pub fn allows_query(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Delete => write!(f, "DELETE"),
            HttpMethod::Patch => write!(f, "PATCH"),
        }
    }
}

/// How endpoints are partitioned into client classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    #[default]
    SingleClient,
    ByPrefix,
}

impl Grouping {
    /// Parses the annotation's enum entry; accepts both `SINGLE_CLIENT` and
    /// `SingleClient` spellings.
    pub fn parse(entry: &str) -> Option<Self> {
        match entry.to_ascii_uppercase().replace('_', "").as_str() {
            "SINGLECLIENT" => Some(Grouping::SingleClient),
            "BYPREFIX" => Some(Grouping::ByPrefix),
            _ => None,
        }
    }
}

/// Resolved auth mode for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthMode {
    None,
    Bearer,
    Basic,
    ApiKey { header: String },
    Custom,
}

/// Allow-listed primitive parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimitiveType {
    String,
    Int,
    Long,
    Short,
    Float,
    Double,
    Boolean,
}

impl PrimitiveType {
    pub fn from_qualified(name: &str) -> Option<Self> {
        match name {
            "kotlin.String" => Some(PrimitiveType::String),
            "kotlin.Int" => Some(PrimitiveType::Int),
            "kotlin.Long" => Some(PrimitiveType::Long),
            "kotlin.Short" => Some(PrimitiveType::Short),
            "kotlin.Float" => Some(PrimitiveType::Float),
            "kotlin.Double" => Some(PrimitiveType::Double),
            "kotlin.Boolean" => Some(PrimitiveType::Boolean),
            _ => None,
        }
    }

    /// Source-level spelling in the generated code.
    pub fn render(self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Int => "Int",
            PrimitiveType::Long => "Long",
            PrimitiveType::Short => "Short",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
            PrimitiveType::Boolean => "Boolean",
        }
    }
}

/// A query parameter type: an allow-listed primitive or a one-level list of
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", content = "of", rename_all = "snake_case")]
pub enum QueryType {
    Scalar(PrimitiveType),
    List(PrimitiveType),
}

impl QueryType {
    pub fn render(self) -> String {
        match self {
            QueryType::Scalar(p) => p.render().to_string(),
            QueryType::List(p) => format!("List<{}>", p.render()),
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, QueryType::List(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathParam {
    pub name: String,
    pub ty: PrimitiveType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParam {
    pub name: String,
    pub ty: QueryType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderParam {
    pub name: String,
    /// Resolved wire header name (explicit override or the property name).
    pub header: String,
    pub ty: PrimitiveType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyParam {
    pub name: String,
    pub mutable: bool,
}

/// Declared success shape of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum SuccessType {
    /// The designated empty-body marker.
    Empty,
    /// A concrete serializable class, by qualified name.
    Named(String),
}

impl SuccessType {
    /// Simple name as referenced in generated code.
    pub fn render(&self) -> &str {
        match self {
            SuccessType::Empty => "NoContent",
            SuccessType::Named(qualified) => {
                qualified.rsplit('.').next().unwrap_or(qualified)
            }
        }
    }
}

/// Whether the request declaration is a parameterless marker or a data
/// aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestForm {
    Marker,
    Data,
}

/// One validated API root declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDescriptor {
    pub declaration: String,
    pub package: String,
    pub client_prefix: String,
    pub display_name: String,
    pub scan_packages: Vec<String>,
    pub grouping: Grouping,
    pub generate_harness: bool,
    pub generate_docs: bool,
}

impl SpecDescriptor {
    pub fn client_class_name(&self) -> String {
        format!("{}Client", self.client_prefix)
    }

    /// Package the generated files are emitted into.
    pub fn output_package(&self) -> String {
        format!("{}.client", self.package)
    }
}

/// One validated request declaration, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub declaration: String,
    pub simple_name: String,
    pub package: String,
    pub method: HttpMethod,
    /// Normalized path template: leading slash enforced, trailing slash
    /// stripped except for root.
    pub path: String,
    pub fn_name: String,
    pub form: RequestForm,
    pub success: SuccessType,
    /// Qualified error type, when one was declared.
    pub error: Option<String>,
    pub auth: AuthMode,
    pub path_params: Vec<PathParam>,
    pub query_params: Vec<QueryParam>,
    pub header_params: Vec<HeaderParam>,
    pub body_params: Vec<BodyParam>,
}

impl RequestDescriptor {
    /// ByPrefix group key: the first literal path segment, or the reserved
    /// fallback bucket when the path has none.
    pub fn group_key(&self) -> String {
        idents::first_literal_segment(&self.path)
            .unwrap_or(FALLBACK_GROUP)
            .to_string()
    }

    /// Whether the generated method constructs a request model instance.
    pub fn builds_model(&self) -> bool {
        !self.query_params.is_empty()
            || !self.header_params.is_empty()
            || !self.body_params.is_empty()
    }

    /// Whether the generated method takes a trailing builder function.
    pub fn takes_builder(&self) -> bool {
        !self.body_params.is_empty() || !self.query_params.is_empty()
    }
}

/// Reserved group name for paths with no literal segment.
pub const FALLBACK_GROUP: &str = "root";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::markers;

    #[test]
    fn test_http_method_from_marker() {
        assert_eq!(HttpMethod::from_marker(markers::GET), Some(HttpMethod::Get));
        assert_eq!(
            HttpMethod::from_marker(markers::PATCH),
            Some(HttpMethod::Patch)
        );
        assert_eq!(HttpMethod::from_marker("other.Marker"), None);
    }

    #[test]
    fn test_http_method_slots() {
        assert!(HttpMethod::Get.allows_query());
        assert!(HttpMethod::Delete.allows_query());
        assert!(!HttpMethod::Post.allows_query());

        assert!(HttpMethod::Post.allows_body());
        assert!(HttpMethod::Put.allows_body());
        assert!(HttpMethod::Patch.allows_body());
        assert!(!HttpMethod::Get.allows_body());
        assert!(!HttpMethod::Delete.allows_body());
    }

    #[test]
    fn test_grouping_parse() {
        assert_eq!(Grouping::parse("SINGLE_CLIENT"), Some(Grouping::SingleClient));
        assert_eq!(Grouping::parse("ByPrefix"), Some(Grouping::ByPrefix));
        assert_eq!(Grouping::parse("BY_PREFIX"), Some(Grouping::ByPrefix));
        assert_eq!(Grouping::parse("other"), None);
    }

    #[test]
    fn test_primitive_type_allow_list() {
        assert_eq!(
            PrimitiveType::from_qualified("kotlin.Int"),
            Some(PrimitiveType::Int)
        );
        assert_eq!(PrimitiveType::from_qualified("kotlin.Any"), None);
        assert_eq!(PrimitiveType::from_qualified("java.lang.String"), None);
    }

    #[test]
    fn test_query_type_render() {
        assert_eq!(QueryType::Scalar(PrimitiveType::Int).render(), "Int");
        assert_eq!(
            QueryType::List(PrimitiveType::String).render(),
            "List<String>"
        );
    }

    #[test]
    fn test_success_type_render() {
        assert_eq!(SuccessType::Empty.render(), "NoContent");
        assert_eq!(
            SuccessType::Named("com.example.UserDto".to_string()).render(),
            "UserDto"
        );
    }

    #[test]
    fn test_spec_descriptor_names() {
        let spec = SpecDescriptor {
            declaration: "com.example.PetApiSpec".to_string(),
            package: "com.example".to_string(),
            client_prefix: "Pet".to_string(),
            display_name: "Pet".to_string(),
            scan_packages: vec!["com.example.models".to_string()],
            grouping: Grouping::SingleClient,
            generate_harness: true,
            generate_docs: true,
        };
        assert_eq!(spec.client_class_name(), "PetClient");
        assert_eq!(spec.output_package(), "com.example.client");
    }
}
