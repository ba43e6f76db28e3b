use vkml::{CompileOptions, Compiler, Layout, LayoutError};

/// Compile a document that is expected to be valid.
#[allow(dead_code)]
pub fn compile(xml: &str) -> Layout {
    vkml::compile(xml).expect("document should compile")
}

/// Compile a document that is expected to fail.
#[allow(dead_code)]
pub fn compile_err(xml: &str) -> LayoutError {
    vkml::compile(xml).expect_err("document should be rejected")
}

/// Compile with the XR tag set enabled.
#[allow(dead_code)]
pub fn compile_xr(xml: &str) -> vkml::Result<Layout> {
    Compiler::with_options(CompileOptions { reality: true }).compile(xml)
}
