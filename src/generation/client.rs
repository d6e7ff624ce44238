//! Client class synthesis
//!
//! One method per validated request, wired to the runtime `HttpClient` call
//! shape. Under ByPrefix grouping one client class is emitted per group plus
//! an aggregator class holding an instance of each group client.

use std::collections::BTreeSet;

use crate::descriptors::{
    AuthMode, Grouping, RequestDescriptor, SpecDescriptor, SuccessType,
};
use crate::generation::writer::KotlinWriter;
use crate::generation::Artifact;
use crate::idents;
use crate::symbols::markers;

/// Maximum raw-response prefix embedded in a decode failure.
const BODY_PREFIX_LIMIT: usize = 500;

/// Generates the client class files for one spec.
pub fn generate_clients(spec: &SpecDescriptor, requests: &[RequestDescriptor]) -> Vec<Artifact> {
    match spec.grouping {
        Grouping::SingleClient => {
            let class_name = spec.client_class_name();
            let refs: Vec<&RequestDescriptor> = requests.iter().collect();
            vec![client_artifact(spec, &class_name, &refs)]
        }
        Grouping::ByPrefix => {
            let groups = group_requests(requests);
            let mut artifacts: Vec<Artifact> = groups
                .iter()
                .map(|(group, members)| {
                    client_artifact(spec, &group_client_name(spec, group), members)
                })
                .collect();
            artifacts.push(aggregator_artifact(spec, &groups));
            artifacts
        }
    }
}

/// Group client class name, e.g. `PetUsersClient` for group `users`.
pub fn group_client_name(spec: &SpecDescriptor, group: &str) -> String {
    format!("{}{}Client", spec.client_prefix, idents::capitalize(group))
}

/// Partitions requests by group key, first-seen order, members in discovery
/// order.
fn group_requests(requests: &[RequestDescriptor]) -> Vec<(String, Vec<&RequestDescriptor>)> {
    let mut groups: Vec<(String, Vec<&RequestDescriptor>)> = Vec::new();
    for request in requests {
        let key = request.group_key();
        match groups.iter_mut().find(|(group, _)| *group == key) {
            Some((_, members)) => members.push(request),
            None => groups.push((key, vec![request])),
        }
    }
    groups
}

fn client_artifact(
    spec: &SpecDescriptor,
    class_name: &str,
    requests: &[&RequestDescriptor],
) -> Artifact {
    let mut writer = KotlinWriter::new();
    write_file_header(&mut writer, spec, requests);

    if spec.generate_docs {
        writer.kdoc(&[format!("Generated client for the {} API.", spec.display_name)]);
    }
    writer.open(&format!(
        "class {class_name}(private val httpClient: HttpClient) {{"
    ));
    for (index, request) in requests.iter().enumerate() {
        if index > 0 {
            writer.blank();
        }
        write_method(&mut writer, spec, request);
    }
    // Result types nest inside the class: function names are unique within
    // a client, so the derived type names cannot collide, while identical
    // function names in sibling group clients stay in separate scopes.
    for request in requests {
        if request.error.is_some() {
            writer.blank();
            write_result_type(&mut writer, spec, request);
        }
    }
    writer.close("}");

    Artifact::in_package(
        &spec.output_package(),
        &format!("{class_name}.kt"),
        writer.finish(),
    )
}

fn aggregator_artifact(
    spec: &SpecDescriptor,
    groups: &[(String, Vec<&RequestDescriptor>)],
) -> Artifact {
    let class_name = spec.client_class_name();
    let mut writer = KotlinWriter::new();
    writer.line(&format!("package {}", spec.output_package()));
    writer.blank();
    writer.line(&format!("import {}.*", markers::RUNTIME_PACKAGE));
    writer.blank();

    if spec.generate_docs {
        writer.kdoc(&[format!(
            "Entry point aggregating the {} API group clients.",
            spec.display_name
        )]);
    }
    writer.open(&format!("class {class_name}(httpClient: HttpClient) {{"));
    for (group, _) in groups {
        let group_class = group_client_name(spec, group);
        writer.line(&format!("val {group}: {group_class} = {group_class}(httpClient)"));
    }
    writer.close("}");

    Artifact::in_package(
        &spec.output_package(),
        &format!("{class_name}.kt"),
        writer.finish(),
    )
}

fn write_file_header(
    writer: &mut KotlinWriter,
    spec: &SpecDescriptor,
    requests: &[&RequestDescriptor],
) {
    writer.line(&format!("package {}", spec.output_package()));
    writer.blank();
    writer.line(&format!("import {}.*", markers::RUNTIME_PACKAGE));

    let mut imports: BTreeSet<String> = BTreeSet::new();
    for request in requests {
        if let SuccessType::Named(qualified) = &request.success {
            imports.insert(qualified.clone());
        }
        if let Some(qualified) = &request.error {
            imports.insert(qualified.clone());
        }
        if request.builds_model() {
            imports.insert(request.declaration.clone());
        }
    }
    for import in imports {
        writer.line(&format!("import {import}"));
    }
    writer.blank();
}

fn write_method(writer: &mut KotlinWriter, spec: &SpecDescriptor, request: &RequestDescriptor) {
    if spec.generate_docs {
        writer.kdoc(&method_doc(request));
    }

    let params = signature_params(request);
    let return_type = return_type(request);
    if params.is_empty() {
        writer.open(&format!(
            "suspend fun {}(): {return_type} {{",
            request.fn_name
        ));
    } else {
        writer.open(&format!("suspend fun {}(", request.fn_name));
        for param in &params {
            writer.line(&format!("{param},"));
        }
        writer.close_and_open(&format!("): {return_type} {{"));
    }

    write_method_body(writer, request);
    writer.close("}");
}

/// Parameter declarations in fixed order: auth, path, query, header, builder.
fn signature_params(request: &RequestDescriptor) -> Vec<String> {
    let mut params: Vec<String> = Vec::new();
    match &request.auth {
        AuthMode::None => {}
        AuthMode::Bearer => params.push("token: String".to_string()),
        AuthMode::Basic => {
            params.push("username: String".to_string());
            params.push("password: String".to_string());
        }
        AuthMode::ApiKey { .. } => params.push("apiKey: String".to_string()),
        AuthMode::Custom => {
            params.push("configure: HttpRequestBuilder.() -> Unit".to_string())
        }
    }
    for param in &request.path_params {
        params.push(format!("{}: {}", param.name, param.ty.render()));
    }
    for param in &request.query_params {
        params.push(format!("{}: {}? = null", param.name, param.ty.render()));
    }
    for param in &request.header_params {
        params.push(format!("{}: {}? = null", param.name, param.ty.render()));
    }
    if !request.body_params.is_empty() {
        params.push(format!("block: {}.() -> Unit", request.simple_name));
    } else if !request.query_params.is_empty() {
        // Offered for symmetry even without body properties.
        params.push(format!("block: {}.() -> Unit = {{}}", request.simple_name));
    }
    params
}

fn return_type(request: &RequestDescriptor) -> String {
    match &request.error {
        Some(_) => result_type_name(request),
        None => format!("ApiResponse<{}>", request.success.render()),
    }
}

/// Sealed result type name, e.g. `GetUserResult`. Unique within its client
/// class, where the type is declared.
fn result_type_name(request: &RequestDescriptor) -> String {
    format!("{}Result", idents::capitalize(&request.fn_name))
}

fn write_method_body(writer: &mut KotlinWriter, request: &RequestDescriptor) {
    if request.builds_model() {
        let mut ctor_args: Vec<String> = Vec::new();
        for param in &request.path_params {
            ctor_args.push(format!("{} = {}", param.name, param.name));
        }
        for param in &request.query_params {
            ctor_args.push(format!("{} = {}", param.name, param.name));
        }
        for param in &request.header_params {
            ctor_args.push(format!("{} = {}", param.name, param.name));
        }
        let construction = format!("{}({})", request.simple_name, ctor_args.join(", "));
        if request.takes_builder() {
            writer.line(&format!("val model = {construction}.apply(block)"));
        } else {
            writer.line(&format!("val model = {construction}"));
        }
    }

    writer.line(&format!("val path = {}", path_expression(&request.path)));

    if !request.query_params.is_empty() {
        writer.open("val query = buildList {");
        for param in &request.query_params {
            if param.ty.is_list() {
                writer.line(&format!(
                    "model.{0}?.forEach {{ add(\"{0}\" to it.toString()) }}",
                    param.name
                ));
            } else {
                writer.line(&format!(
                    "model.{0}?.let {{ add(\"{0}\" to it.toString()) }}",
                    param.name
                ));
            }
        }
        writer.close("}");
    }
    if !request.header_params.is_empty() {
        writer.open("val headers = buildList {");
        for param in &request.header_params {
            writer.line(&format!(
                "model.{}?.let {{ add(\"{}\" to it.toString()) }}",
                param.name, param.header
            ));
        }
        writer.close("}");
    }

    writer.open("val response = httpClient.execute(");
    writer.open("HttpRequest(");
    writer.line(&format!("method = \"{}\",", request.method));
    writer.line("path = path,");
    if !request.query_params.is_empty() {
        writer.line("query = query,");
    }
    if !request.header_params.is_empty() {
        writer.line("headers = headers,");
    }
    match &request.auth {
        AuthMode::None | AuthMode::Custom => {}
        AuthMode::Bearer => writer.line("auth = Auth.Bearer(token),"),
        AuthMode::Basic => writer.line("auth = Auth.Basic(username, password),"),
        AuthMode::ApiKey { header } => {
            writer.line(&format!("auth = Auth.ApiKey(apiKey, \"{header}\"),"))
        }
    }
    if !request.body_params.is_empty() {
        writer.line("body = model,");
    }
    writer.close("),");
    if matches!(request.auth, AuthMode::Custom) {
        writer.line("configure,");
    }
    writer.close(")");

    match &request.error {
        None => match &request.success {
            SuccessType::Empty => writer.line("return response.decodeEmpty()"),
            SuccessType::Named(_) => writer.line(&format!(
                "return response.decodeBody<{}>()",
                request.success.render()
            )),
        },
        Some(_) => {
            let result = result_type_name(request);
            let success_value = match &request.success {
                SuccessType::Empty => "NoContent".to_string(),
                SuccessType::Named(_) => {
                    format!("response.bodyAs<{}>()", request.success.render())
                }
            };
            let error_simple = simple_name(request.error.as_deref().unwrap_or(""));
            writer.open("return if (response.isSuccess) {");
            writer.line(&format!("{result}.Success({success_value}, response)"));
            writer.close_and_open("} else {");
            writer.open("val errorBody = try {");
            writer.line(&format!("response.bodyAs<{error_simple}>()"));
            writer.close_and_open("} catch (cause: Exception) {");
            writer.open("throw ApiDecodingException(");
            writer.line(&format!("endpoint = \"{}\",", request.fn_name));
            writer.line("status = response.status,");
            writer.line("cause = cause,");
            writer.line(&format!(
                "bodyPrefix = response.bodyText().take({BODY_PREFIX_LIMIT}),"
            ));
            writer.close(")");
            writer.close("}");
            writer.line(&format!("{result}.Error(errorBody, response)"));
            writer.close("}");
        }
    }
}

fn write_result_type(writer: &mut KotlinWriter, spec: &SpecDescriptor, request: &RequestDescriptor) {
    let result = result_type_name(request);
    let success_body = request.success.render();
    let error_body = simple_name(request.error.as_deref().unwrap_or(""));

    if spec.generate_docs {
        writer.kdoc(&[format!(
            "Two-variant result of the {} endpoint.",
            request.fn_name
        )]);
    }
    writer.open(&format!("sealed class {result} {{"));
    writer.line(&format!(
        "data class Success(val body: {success_body}, val response: HttpResponse) : {result}()"
    ));
    writer.line(&format!(
        "data class Error(val body: {error_body}, val response: HttpResponse) : {result}()"
    ));
    writer.blank();
    writer.line("fun successOrThrow(): Success =");
    writer.line(&format!(
        "    this as? Success ?: error(\"{} returned Error, not Success\")",
        request.fn_name
    ));
    writer.blank();
    writer.line("fun errorOrThrow(): Error =");
    writer.line(&format!(
        "    this as? Error ?: error(\"{} returned Success, not Error\")",
        request.fn_name
    ));
    writer.close("}");
}

/// Builds the Kotlin expression for the URL path, substituting each
/// placeholder with its URL-path-escaped parameter value.
fn path_expression(path: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut literal = String::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').unwrap_or(after.len());
        let name = &after[..close];
        if !literal.is_empty() {
            pieces.push(format!("\"{literal}\""));
            literal.clear();
        }
        pieces.push(format!("encodePathSegment({name}.toString())"));
        rest = &after[close.min(after.len())..];
        rest = rest.strip_prefix('}').unwrap_or(rest);
    }
    literal.push_str(rest);
    if !literal.is_empty() || pieces.is_empty() {
        pieces.push(format!("\"{literal}\""));
    }
    pieces.join(" + ")
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn method_doc(request: &RequestDescriptor) -> Vec<String> {
    let mut lines = vec![format!("Executes {} {}.", request.method, request.path)];
    let mut params: Vec<String> = Vec::new();
    match &request.auth {
        AuthMode::None => {}
        AuthMode::Bearer => {
            params.push("@param token bearer token for the Authorization header.".to_string())
        }
        AuthMode::Basic => {
            params.push("@param username basic-auth user name.".to_string());
            params.push("@param password basic-auth password.".to_string());
        }
        AuthMode::ApiKey { header } => {
            params.push(format!("@param apiKey value sent as the '{header}' header."))
        }
        AuthMode::Custom => {
            params.push("@param configure applied to the outgoing request builder.".to_string())
        }
    }
    for param in &request.path_params {
        params.push(format!(
            "@param {0} substituted into the '{{{0}}}' path segment.",
            param.name
        ));
    }
    for param in &request.query_params {
        params.push(format!(
            "@param {0} optional query parameter '{0}'.",
            param.name
        ));
    }
    for param in &request.header_params {
        params.push(format!(
            "@param {} optional header '{}'.",
            param.name, param.header
        ));
    }
    if !request.body_params.is_empty() {
        params.push(format!(
            "@param block builder applied to the outgoing [{}].",
            request.simple_name
        ));
    }
    if !params.is_empty() {
        lines.push(String::new());
        lines.extend(params);
    }
    lines
}
