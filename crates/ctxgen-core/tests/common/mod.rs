//! Shared test utilities for generator integration tests

#![allow(dead_code)]

use ctxgen_core::{AutoGen, Conventions, Diagnostic, GenResult, Generated, HeaderSource};

pub use pretty_assertions::assert_eq;

/// Origin used for every in-memory header
pub const ORIGIN: &str = "tools/public_api.h";

/// Run the generator over a header with the default conventions
pub fn generate(header: &str) -> (GenResult<Generated>, Vec<Diagnostic>) {
    let autogen = AutoGen::new(Conventions::hpy().unwrap());
    let mut warnings = Vec::new();
    let result = autogen.run(&HeaderSource::new(ORIGIN, header), &mut warnings);
    (result, warnings)
}

/// Run the generator with configured conventions
pub fn generate_with(
    header: &str,
    config: &ctxgen_config::ConventionsConfig,
) -> (GenResult<Generated>, Vec<Diagnostic>) {
    let autogen = AutoGen::new(Conventions::from_config(config).unwrap());
    let mut warnings = Vec::new();
    let result = autogen.run(&HeaderSource::new(ORIGIN, header), &mut warnings);
    (result, warnings)
}

/// Run the generator and expect success without warnings
pub fn generate_clean(header: &str) -> Generated {
    let (result, warnings) = generate(header);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    result.unwrap_or_else(|e| panic!("generation failed: {} {:?}", e, e.diagnostics()))
}

/// Body of an artifact: the text after the notice
pub fn body(generated: &Generated, kind: ctxgen_core::ArtifactKind) -> String {
    let contents = &generated.artifact(kind).unwrap().contents;
    let start = match kind.comment_style() {
        ctxgen_core::generators::CommentStyle::Block => contents.find("*/\n\n").unwrap() + 4,
        ctxgen_core::generators::CommentStyle::Hash => contents.find("\n\n").unwrap() + 2,
    };
    contents[start..].trim_end_matches('\n').to_string()
}
