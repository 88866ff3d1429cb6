use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::error::{Result, SiteError};
use crate::surface::{Frame, Primitive, Surface, SurfaceRect, SurfaceSize};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
uniform mat4 u_mvp;
uniform float u_point_size;
void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    gl_PointSize = u_point_size;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 out_color;
void main() {
    out_color = u_color;
}
"#;

/// Flat-color WebGL2 pipeline: one program, one streaming vertex buffer.
struct Pipeline {
    gl: GL,
    program: WebGlProgram,
    buffer: WebGlBuffer,
    vao: WebGlVertexArrayObject,
    u_mvp: Option<WebGlUniformLocation>,
    u_color: Option<WebGlUniformLocation>,
    u_point_size: Option<WebGlUniformLocation>,
}

impl Pipeline {
    fn new(gl: GL) -> Result<Self> {
        let vs = compile(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let fs = compile(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = gl
            .create_program()
            .ok_or_else(|| SiteError::Shader("create_program failed".into()))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        // Shaders are owned by the program once linked.
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        let linked = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(SiteError::Shader(info));
        }

        let buffer = gl
            .create_buffer()
            .ok_or_else(|| SiteError::Shader("create_buffer failed".into()))?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SiteError::Shader("create_vertex_array failed".into()))?;
        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let position = gl.get_attrib_location(&program, "a_position");
        if position >= 0 {
            gl.enable_vertex_attrib_array(position as u32);
            gl.vertex_attrib_pointer_with_i32(position as u32, 3, GL::FLOAT, false, 0, 0);
        }
        gl.bind_vertex_array(None);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        Ok(Self {
            u_mvp: gl.get_uniform_location(&program, "u_mvp"),
            u_color: gl.get_uniform_location(&program, "u_color"),
            u_point_size: gl.get_uniform_location(&program, "u_point_size"),
            gl,
            program,
            buffer,
            vao,
        })
    }

    fn release(self) {
        let gl = &self.gl;
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.buffer));
        gl.delete_program(Some(&self.program));
        if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
            ext.unchecked_into::<WebglLoseContext>().lose_context();
        }
    }
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SiteError::Shader("create_shader failed".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SiteError::Shader(info))
    }
}

/// A canvas appended to a scene container. Without WebGL2 it stays blank.
pub struct GlSurface {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    pipeline: Option<Pipeline>,
    pixel_ratio: f64,
    scratch: Vec<f32>,
    released: bool,
}

impl GlSurface {
    pub fn new(document: &Document, container: HtmlElement) -> Result<Self> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| SiteError::SurfaceUnavailable("not a canvas".into()))?;
        canvas.set_class_name("scene-canvas");
        container.append_child(&canvas)?;

        let pipeline = match Self::context(&canvas).and_then(Pipeline::new) {
            Ok(pipeline) => Some(pipeline),
            Err(err) => {
                log::warn!("scene renders nothing: {err}");
                None
            }
        };
        let pixel_ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .clamp(1.0, 2.0);

        Ok(Self {
            container,
            canvas,
            pipeline,
            pixel_ratio,
            scratch: Vec::new(),
            released: false,
        })
    }

    fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
        canvas
            .get_context("webgl2")?
            .ok_or_else(|| SiteError::SurfaceUnavailable("WebGL2 not supported".into()))?
            .dyn_into::<GL>()
            .map_err(|_| SiteError::SurfaceUnavailable("unexpected context type".into()))
    }

    pub fn has_context(&self) -> bool {
        self.pipeline.is_some()
    }
}

impl Surface for GlSurface {
    fn bounds(&self) -> SurfaceRect {
        let rect = self.container.get_bounding_client_rect();
        SurfaceRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn resize(&mut self, size: SurfaceSize) {
        if self.released {
            return;
        }
        self.canvas
            .set_width((size.width as f64 * self.pixel_ratio) as u32);
        self.canvas
            .set_height((size.height as f64 * self.pixel_ratio) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
    }

    fn draw(&mut self, frame: &Frame<'_>) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };
        let gl = &pipeline.gl;
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
        let [r, g, b, a] = frame.clear;
        gl.clear_color(r, g, b, a);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        gl.use_program(Some(&pipeline.program));
        gl.bind_vertex_array(Some(&pipeline.vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&pipeline.buffer));

        for batch in &frame.batches {
            if batch.vertices.is_empty() {
                continue;
            }
            self.scratch.clear();
            self.scratch
                .extend(batch.vertices.iter().flat_map(|v| v.to_array()));
            let data = js_sys::Float32Array::from(self.scratch.as_slice());
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STREAM_DRAW);

            let mvp = frame.view_proj * batch.transform;
            gl.uniform_matrix4fv_with_f32_array(pipeline.u_mvp.as_ref(), false, &mvp.to_cols_array());
            gl.uniform4fv_with_f32_array(pipeline.u_color.as_ref(), &batch.color);
            gl.uniform1f(
                pipeline.u_point_size.as_ref(),
                batch.point_size * self.pixel_ratio as f32,
            );
            let mode = match batch.primitive {
                Primitive::Points => GL::POINTS,
                Primitive::Lines => GL::LINES,
                Primitive::Triangles => GL::TRIANGLES,
            };
            gl.draw_arrays(mode, 0, batch.vertices.len() as i32);
        }
        gl.bind_vertex_array(None);
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.release();
        }
        self.container.set_inner_html("");
    }
}
