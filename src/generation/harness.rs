//! Test-harness synthesis
//!
//! Structurally parallel to the client pass: two overloaded helper functions
//! per spec that instantiate the generated client and delegate to the fixed
//! external test runner.

use crate::descriptors::SpecDescriptor;
use crate::generation::writer::KotlinWriter;
use crate::generation::Artifact;
use crate::idents;
use crate::symbols::markers;

/// Generates `<Prefix>TestHarness.kt` with the simple and the
/// setUp/tearDown-bracketed overloads of `<prefix>ApiTest`.
pub fn generate_harness(spec: &SpecDescriptor) -> Artifact {
    let client = spec.client_class_name();
    let fn_name = format!("{}ApiTest", idents::decapitalize(&spec.client_prefix));

    let mut writer = KotlinWriter::new();
    writer.line(&format!("package {}", spec.output_package()));
    writer.blank();
    writer.line(&format!("import {}.*", markers::RUNTIME_PACKAGE));
    writer.blank();

    if spec.generate_docs {
        writer.kdoc(&[format!(
            "Runs [block] against a fresh [{client}] pointed at [baseUrl]."
        )]);
    }
    writer.open(&format!(
        "fun {fn_name}(baseUrl: String, block: suspend ({client}) -> Unit) {{"
    ));
    writer.open("runApiTest {");
    writer.line(&format!("block({client}(HttpClient(baseUrl)))"));
    writer.close("}");
    writer.close("}");
    writer.blank();

    if spec.generate_docs {
        writer.kdoc(&[format!(
            "Variant of [{fn_name}] bracketing [block] with [setUp] and [tearDown]."
        )]);
    }
    writer.open(&format!("fun {fn_name}("));
    writer.line("baseUrl: String,");
    writer.line("setUp: suspend () -> Unit,");
    writer.line("tearDown: suspend () -> Unit,");
    writer.line(&format!("block: suspend ({client}) -> Unit,"));
    writer.close_and_open(") {");
    writer.open("runApiTest {");
    writer.line("setUp()");
    writer.open("try {");
    writer.line(&format!("block({client}(HttpClient(baseUrl)))"));
    writer.close_and_open("} finally {");
    writer.line("tearDown()");
    writer.close("}");
    writer.close("}");
    writer.close("}");

    Artifact::in_package(
        &spec.output_package(),
        &format!("{}TestHarness.kt", spec.client_prefix),
        writer.finish(),
    )
}
