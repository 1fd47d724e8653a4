//! WGSL compilation and program linking.
//!
//! Compilation parses and validates one stage with naga (CPU only, no device
//! needed). Linking checks that two compiled stages form the polygon program:
//! - a vertex entry point taking exactly one `vec2<f32>` at location 0
//! - a fragment entry point
//! - a `vec4<f32>` uniform at group 0, binding 0 in the fragment module
//! - every fragment location input produced by the vertex stage

use std::fmt;

use wgpu::naga;

use crate::error::{Error, Result};

/// Bind group slot of the color uniform.
pub const COLOR_GROUP: u32 = 0;
pub const COLOR_BINDING: u32 = 0;

/// Vertex attribute slot of the 2D position.
pub const POSITION_LOCATION: u32 = 0;

/// Built-in polygon shaders.
pub const POLYGON_VERTEX_WGSL: &str = include_str!("shaders/polygon_vs.wgsl");
pub const POLYGON_FRAGMENT_WGSL: &str = include_str!("shaders/polygon_fs.wgsl");

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A parsed and validated shader stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    stage: ShaderStage,
    source: String,
    module: naga::Module,
}

impl CompiledStage {
    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    fn entry_point(&self) -> Option<&naga::EntryPoint> {
        let stage = self.stage.naga();
        self.module.entry_points.iter().find(|ep| ep.stage == stage)
    }
}

/// Linked vertex + fragment program, ready for pipeline creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    vertex_source: String,
    vertex_entry: String,
    fragment_source: String,
    fragment_entry: String,
}

impl ShaderProgram {
    #[inline]
    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    #[inline]
    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    #[inline]
    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    #[inline]
    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }
}

/// Parses and validates a single WGSL stage.
pub fn compile(stage: ShaderStage, source: &str) -> Result<CompiledStage> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| Error::ShaderCompile {
        stage,
        diagnostic: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| Error::ShaderCompile {
        stage,
        diagnostic: e.to_string(),
    })?;

    Ok(CompiledStage {
        stage,
        source: source.to_owned(),
        module,
    })
}

/// Links a vertex and a fragment stage into a [`ShaderProgram`].
pub fn link(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<ShaderProgram> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(link_error(format!(
            "expected vertex + fragment stages, got {} + {}",
            vertex.stage, fragment.stage
        )));
    }

    let vs = vertex
        .entry_point()
        .ok_or_else(|| link_error("vertex module has no @vertex entry point"))?;
    let fs = fragment
        .entry_point()
        .ok_or_else(|| link_error("fragment module has no @fragment entry point"))?;

    // Attribute: exactly one vec2<f32> position.
    let attributes = location_inputs(&vertex.module, &vs.function);
    match attributes.as_slice() {
        [(POSITION_LOCATION, ty)] if *ty == vec_f32(naga::VectorSize::Bi) => {}
        _ => {
            return Err(link_error(format!(
                "vertex entry point `{}` must take a single vec2<f32> at @location({POSITION_LOCATION})",
                vs.name
            )));
        }
    }

    // Uniform: vec4<f32> color.
    let has_color = fragment.module.global_variables.iter().any(|(_, var)| {
        var.space == naga::AddressSpace::Uniform
            && var.binding.as_ref().is_some_and(|b| {
                b.group == COLOR_GROUP && b.binding == COLOR_BINDING
            })
            && fragment.module.types[var.ty].inner == vec_f32(naga::VectorSize::Quad)
    });
    if !has_color {
        return Err(link_error(format!(
            "fragment module must declare a vec4<f32> uniform at @group({COLOR_GROUP}) @binding({COLOR_BINDING})"
        )));
    }

    // Varyings: fragment inputs must be vertex outputs of the same type.
    let outputs = match vs.function.result.as_ref() {
        Some(result) => {
            let mut out = Vec::new();
            collect_locations(&vertex.module, result.ty, result.binding.as_ref(), &mut out);
            out
        }
        None => Vec::new(),
    };
    for (location, ty) in location_inputs(&fragment.module, &fs.function) {
        match outputs.iter().find(|(l, _)| *l == location) {
            Some((_, out_ty)) if *out_ty == ty => {}
            Some(_) => {
                return Err(link_error(format!(
                    "type mismatch for varying at @location({location})"
                )));
            }
            None => {
                return Err(link_error(format!(
                    "fragment input @location({location}) is not written by the vertex stage"
                )));
            }
        }
    }

    Ok(ShaderProgram {
        vertex_source: vertex.source.clone(),
        vertex_entry: vs.name.clone(),
        fragment_source: fragment.source.clone(),
        fragment_entry: fs.name.clone(),
    })
}

/// Compiles both stages and links them.
pub fn build_program(vertex_source: &str, fragment_source: &str) -> Result<ShaderProgram> {
    let vertex = compile(ShaderStage::Vertex, vertex_source)?;
    let fragment = compile(ShaderStage::Fragment, fragment_source)?;
    link(&vertex, &fragment)
}

fn link_error(diagnostic: impl Into<String>) -> Error {
    Error::ShaderLink {
        diagnostic: diagnostic.into(),
    }
}

fn vec_f32(size: naga::VectorSize) -> naga::TypeInner {
    naga::TypeInner::Vector {
        size,
        scalar: naga::Scalar::F32,
    }
}

fn location_inputs(module: &naga::Module, function: &naga::Function) -> Vec<(u32, naga::TypeInner)> {
    let mut out = Vec::new();
    for arg in &function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

/// Flattens `@location` bindings, descending into struct members.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<(u32, naga::TypeInner)>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.push((*location, module.types[ty].inner.clone()));
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS_NO_UNIFORM: &str = r#"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    const VS_VEC3: &str = r#"
        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }
    "#;

    const FS_WITH_VARYING: &str = r#"
        @group(0) @binding(0) var<uniform> u_color: vec4<f32>;

        @fragment
        fn fs_main(@location(0) shade: f32) -> @location(0) vec4<f32> {
            return u_color * shade;
        }
    "#;

    #[test]
    fn builtin_program_links() {
        let program = build_program(POLYGON_VERTEX_WGSL, POLYGON_FRAGMENT_WGSL).unwrap();
        assert_eq!(program.vertex_entry(), "vs_main");
        assert_eq!(program.fragment_entry(), "fs_main");
        assert_eq!(program.fragment_source(), POLYGON_FRAGMENT_WGSL);
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = compile(ShaderStage::Vertex, "fn vs_main( {").unwrap_err();
        match err {
            Error::ShaderCompile { stage, diagnostic } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!diagnostic.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return 1.0;
            }
        "#;
        assert!(matches!(
            compile(ShaderStage::Fragment, src),
            Err(Error::ShaderCompile { stage: ShaderStage::Fragment, .. })
        ));
    }

    #[test]
    fn missing_color_uniform_fails_to_link() {
        let err = build_program(POLYGON_VERTEX_WGSL, FS_NO_UNIFORM).unwrap_err();
        assert!(matches!(err, Error::ShaderLink { .. }), "{err:?}");
    }

    #[test]
    fn wrong_attribute_type_fails_to_link() {
        let err = build_program(VS_VEC3, POLYGON_FRAGMENT_WGSL).unwrap_err();
        assert!(matches!(err, Error::ShaderLink { .. }), "{err:?}");
    }

    #[test]
    fn unwritten_varying_fails_to_link() {
        let err = build_program(POLYGON_VERTEX_WGSL, FS_WITH_VARYING).unwrap_err();
        match err {
            Error::ShaderLink { diagnostic } => assert!(diagnostic.contains("@location(0)")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stages_in_wrong_slots_fail_to_link() {
        // The fragment source has no @vertex entry point.
        let err = build_program(POLYGON_FRAGMENT_WGSL, POLYGON_FRAGMENT_WGSL).unwrap_err();
        assert!(matches!(err, Error::ShaderLink { .. }), "{err:?}");
    }
}
