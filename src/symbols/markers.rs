//! Well-known annotation and type names recognized by the generator

/// Root marker placed on an API specification declaration.
pub const API_SPEC: &str = "io.clientsmith.annotations.ApiSpec";

/// HTTP method markers, each carrying a `path` argument.
pub const GET: &str = "io.clientsmith.annotations.GET";
pub const POST: &str = "io.clientsmith.annotations.POST";
pub const PUT: &str = "io.clientsmith.annotations.PUT";
pub const DELETE: &str = "io.clientsmith.annotations.DELETE";
pub const PATCH: &str = "io.clientsmith.annotations.PATCH";

/// All HTTP method markers; a request declaration must carry exactly one.
pub const HTTP_METHOD_MARKERS: [&str; 5] = [GET, POST, PUT, DELETE, PATCH];

/// Declares the success (and optionally the error) response type.
pub const RETURNS: &str = "io.clientsmith.annotations.Returns";

/// Optional auth marker with a `type` argument and, for API_KEY, `headerName`.
pub const AUTH: &str = "io.clientsmith.annotations.Auth";

/// Per-property parameter role markers.
pub const PATH: &str = "io.clientsmith.annotations.Path";
pub const QUERY: &str = "io.clientsmith.annotations.Query";
pub const HEADER: &str = "io.clientsmith.annotations.Header";

/// Serialization participation marker required on response types.
pub const SERIALIZABLE: &str = "kotlinx.serialization.Serializable";

/// Serialization-level exclusion marker required on path/query/header
/// properties so they never reach the wire payload.
pub const TRANSIENT: &str = "kotlinx.serialization.Transient";

/// JVM-level transient marker. Does not affect the serializer; using it in
/// place of [`TRANSIENT`] is reported as a distinct error.
pub const JVM_TRANSIENT: &str = "kotlin.jvm.Transient";

/// Bottom type; illegal as a success type.
pub const NOTHING: &str = "kotlin.Nothing";

/// Unit type; illegal as an explicit error type.
pub const UNIT: &str = "kotlin.Unit";

/// Designated marker for responses with no body.
pub const NO_CONTENT: &str = "io.clientsmith.runtime.NoContent";

/// Package the generated code imports its runtime collaborators from.
pub const RUNTIME_PACKAGE: &str = "io.clientsmith.runtime";

/// One-level list wrapper allowed for query parameter types.
pub const LIST: &str = "kotlin.collections.List";

/// Required suffix on request class names.
pub const REQUEST_SUFFIX: &str = "Request";

/// Default wire header for API_KEY auth.
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
