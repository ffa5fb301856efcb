use crate::config::RendererConfig;
use crate::scene::{Curve, Edge, Placement, SceneDescription, SceneOp, Shape, Tone};
use anyhow::{Context, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Indentation of the generated construct() body
const INDENT: &str = "        ";

/// Drives the external animation engine: translates a [`SceneDescription`]
/// into a Python scene script, shells out to the engine binary, and locates
/// the produced video file.
pub struct ManimRenderer {
    scene: SceneDescription,
    binary: String,
    quality: String,
}

impl ManimRenderer {
    pub fn new(scene: SceneDescription, config: &RendererConfig) -> Self {
        Self {
            scene,
            binary: config.binary.clone(),
            quality: config.quality.clone(),
        }
    }

    /// Check if an engine binary is on PATH
    pub fn is_available(binary: &str) -> bool {
        Command::new(binary).arg("--version").output().is_ok()
    }

    fn quality_flag(&self) -> &'static str {
        match self.quality.as_str() {
            "low" => "-ql",
            "high" => "-qh",
            _ => "-qm",
        }
    }

    /// Python class name derived from the scene name
    pub fn class_name(&self) -> String {
        let mut name = String::new();
        let mut upper_next = true;
        for ch in self.scene.name.chars() {
            if ch.is_ascii_alphanumeric() {
                if upper_next {
                    name.extend(ch.to_uppercase());
                    upper_next = false;
                } else {
                    name.push(ch);
                }
            } else {
                upper_next = true;
            }
        }
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert_str(0, "Explainer");
        }
        name.push_str("Scene");
        name
    }

    /// Generate the Python scene script for the engine
    pub fn generate_python_script(&self) -> String {
        let mut py = String::new();

        py.push_str("from manim import *\n");
        py.push_str("import numpy as np\n\n\n");
        py.push_str(&format!("class {}(Scene):\n", self.class_name()));
        py.push_str("    def construct(self):\n");

        if self.scene.is_empty() {
            py.push_str(INDENT);
            py.push_str("pass\n");
            return py;
        }

        // Curve labels stack below the one plotted before them
        let mut last_label: Option<String> = None;

        for op in &self.scene.ops {
            Self::emit_op(&mut py, op, &mut last_label);
        }

        py
    }

    fn emit(py: &mut String, line: &str) {
        py.push_str(INDENT);
        py.push_str(line);
        py.push('\n');
    }

    fn emit_op(py: &mut String, op: &SceneOp, last_label: &mut Option<String>) {
        match op {
            SceneOp::WriteText {
                id,
                content,
                font_size,
                at,
            } => {
                let var = py_var(id);
                Self::emit(
                    py,
                    &format!(
                        "{} = Text(\"{}\", font_size={})",
                        var,
                        escape(content),
                        font_size
                    ),
                );
                Self::emit_placement(py, &var, at);
                Self::emit(py, &format!("self.play(Write({}))", var));
            }
            SceneOp::WriteEquation { id, tex, at } => {
                let var = py_var(id);
                Self::emit(py, &format!("{} = MathTex(\"{}\")", var, escape(tex)));
                Self::emit_placement(py, &var, at);
                Self::emit(py, &format!("self.play(Write({}))", var));
            }
            SceneOp::MoveToEdge { id, edge } => {
                Self::emit(
                    py,
                    &format!("self.play({}.animate.to_edge({}))", py_var(id), edge_py(*edge)),
                );
            }
            SceneOp::FadeToTone { id, tone } => {
                Self::emit(
                    py,
                    &format!(
                        "self.play({}.animate.set_color({}))",
                        py_var(id),
                        tone_py(*tone)
                    ),
                );
            }
            SceneOp::CreateShape { id, shape } => {
                let var = py_var(id);
                match shape {
                    Shape::Circle { radius } => {
                        Self::emit(py, &format!("{} = Circle(radius={})", var, radius));
                    }
                    Shape::Triangle => {
                        Self::emit(py, &format!("{} = Triangle()", var));
                    }
                }
                Self::emit(py, &format!("self.play(Create({}))", var));
            }
            SceneOp::DrawRadius { id, of, label } => {
                let var = py_var(id);
                let of = py_var(of);
                Self::emit(
                    py,
                    &format!("{} = Line({}.get_center(), {}.point_at_angle(0))", var, of, of),
                );
                match label {
                    Some(tex) => {
                        Self::emit(
                            py,
                            &format!(
                                "{}_label = MathTex(\"{}\").next_to({}, UP)",
                                var,
                                escape(tex),
                                var
                            ),
                        );
                        Self::emit(
                            py,
                            &format!("self.play(Create({}), Write({}_label))", var, var),
                        );
                    }
                    None => Self::emit(py, &format!("self.play(Create({}))", var)),
                }
            }
            SceneOp::MarkAngles { id, of } => {
                let var = py_var(id);
                let of = py_var(of);
                Self::emit(py, &format!("{} = VGroup(*[", var));
                Self::emit(py, "    Angle(");
                Self::emit(
                    py,
                    &format!(
                        "        {}.get_vertices()[(i + 1) % 3] - {}.get_vertices()[i],",
                        of, of
                    ),
                );
                Self::emit(
                    py,
                    &format!(
                        "        {}.get_vertices()[(i - 1) % 3] - {}.get_vertices()[i],",
                        of, of
                    ),
                );
                Self::emit(py, "        radius=0.5,");
                Self::emit(py, "    )");
                Self::emit(py, "    for i in range(3)");
                Self::emit(py, "])");
                Self::emit(py, &format!("self.play(Create({}))", var));
            }
            SceneOp::PlotAxes { id, x_range, y_range } => {
                let var = py_var(id);
                Self::emit(py, &format!("{} = Axes(", var));
                Self::emit(py, &format!("    x_range=[{}, {}],", x_range[0], x_range[1]));
                Self::emit(py, &format!("    y_range=[{}, {}],", y_range[0], y_range[1]));
                Self::emit(py, "    axis_config={\"include_tip\": True},");
                Self::emit(py, ")");
                Self::emit(py, &format!("self.play(Create({}))", var));
            }
            SceneOp::PlotCurve {
                id,
                on,
                curve,
                tone,
                label,
            } => {
                let var = py_var(id);
                let on = py_var(on);
                Self::emit(
                    py,
                    &format!(
                        "{} = {}.plot(lambda x: {}, color={})",
                        var,
                        on,
                        curve_py(*curve),
                        tone_py(*tone)
                    ),
                );
                match label {
                    Some(tex) => {
                        // First label sits above the axes, later ones stack below it
                        let anchor = match last_label {
                            Some(prev) => format!("{}, DOWN", prev),
                            None => format!("{}, UP", on),
                        };
                        Self::emit(
                            py,
                            &format!(
                                "{}_label = MathTex(\"{}\").next_to({})",
                                var,
                                escape(tex),
                                anchor
                            ),
                        );
                        Self::emit(
                            py,
                            &format!("self.play(Create({}), Write({}_label))", var, var),
                        );
                        *last_label = Some(format!("{}_label", var));
                    }
                    None => Self::emit(py, &format!("self.play(Create({}))", var)),
                }
            }
            SceneOp::ShadeUnderCurve {
                id,
                on,
                of,
                range,
                tone,
            } => {
                let var = py_var(id);
                Self::emit(
                    py,
                    &format!(
                        "{} = {}.get_area({}, [{}, {}], color={}, opacity=0.3)",
                        var,
                        py_var(on),
                        py_var(of),
                        range[0],
                        range[1],
                        tone_py(*tone)
                    ),
                );
                Self::emit(py, &format!("self.play(Create({}))", var));
            }
            SceneOp::Wait { seconds } => {
                Self::emit(py, &format!("self.wait({})", seconds));
            }
        }
    }

    fn emit_placement(py: &mut String, var: &str, at: &Placement) {
        match at {
            Placement::Center => {}
            Placement::Edge(edge) => {
                Self::emit(py, &format!("{}.to_edge({})", var, edge_py(*edge)));
            }
            Placement::Below { of } => {
                Self::emit(py, &format!("{}.next_to({}, DOWN)", var, py_var(of)));
            }
        }
    }

    /// Render the scene, returning the path of the produced video.
    ///
    /// The scene script and the engine's media tree both live under
    /// `work_dir`, which the caller is expected to discard.
    pub fn render(&self, work_dir: &Path) -> Result<PathBuf> {
        let python_script = self.generate_python_script();

        let mut hasher = Sha256::new();
        hasher.update(&python_script);
        let digest = format!("{:x}", hasher.finalize());

        let script_path = work_dir.join(format!("scene_{}.py", &digest[..16]));
        fs::write(&script_path, &python_script).context("Failed to write scene script")?;

        let media_dir = work_dir.join("media");

        println!("🎨 Rendering scene '{}'...", self.scene.name);

        let output = Command::new(&self.binary)
            .arg("render")
            .arg(self.quality_flag())
            .arg("--media_dir")
            .arg(&media_dir)
            .arg("--output_file")
            .arg("animation")
            .arg(&script_path)
            .arg(self.class_name())
            .output()
            .with_context(|| format!("Failed to launch renderer '{}'", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Renderer exited with {}: {}", output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(path) = Self::parse_output_path(&stdout) {
            if path.exists() {
                return Ok(path);
            }
        }

        // The media tree layout below `media_dir` depends on quality and
        // engine version; walk it instead of guessing the leaf directory.
        Self::find_video(&media_dir)
    }

    fn parse_output_path(stdout: &str) -> Option<PathBuf> {
        let re = Regex::new(r"File ready at\s+'([^']+)'").ok()?;
        let captures = re.captures(stdout)?;
        Some(PathBuf::from(captures.get(1)?.as_str()))
    }

    fn find_video(media_dir: &Path) -> Result<PathBuf> {
        for entry in WalkDir::new(media_dir).into_iter().filter_map(|e| e.ok()) {
            if entry.path().extension().and_then(|e| e.to_str()) == Some("mp4") {
                return Ok(entry.path().to_path_buf());
            }
        }
        anyhow::bail!(
            "Renderer reported success but produced no video under {}",
            media_dir.display()
        )
    }
}

/// Sanitize an element id into a Python variable name
fn py_var(id: &str) -> String {
    let mut var: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if var.is_empty() || var.starts_with(|c: char| c.is_ascii_digit()) {
        var.insert_str(0, "m_");
    }
    var
}

/// Escape a string for embedding in a double-quoted Python literal
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

fn edge_py(edge: Edge) -> &'static str {
    match edge {
        Edge::Top => "UP",
        Edge::Bottom => "DOWN",
    }
}

fn tone_py(tone: Tone) -> &'static str {
    match tone {
        Tone::Blue => "BLUE",
        Tone::Red => "RED",
        Tone::Yellow => "YELLOW",
        Tone::Gray => "GRAY",
    }
}

fn curve_py(curve: Curve) -> &'static str {
    match curve {
        Curve::Sin => "np.sin(x)",
        Curve::Cos => "np.cos(x)",
        Curve::Square => "x**2",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererConfig;
    use crate::content::{Category, ContentRecord};
    use crate::templates::SceneTemplates;

    fn renderer_for(content: &ContentRecord) -> ManimRenderer {
        let scene = SceneTemplates::build(content);
        ManimRenderer::new(scene, &RendererConfig::default())
    }

    #[test]
    fn test_generate_generic_scene_script() {
        let content = ContentRecord::from_prompt("Relativity", "explain energy-mass equivalence");
        let py = renderer_for(&content).generate_python_script();

        assert!(py.contains("from manim import *"));
        assert!(py.contains("class RelativityScene(Scene):"));
        assert!(py.contains("title = Text(\"Relativity\", font_size=40)"));
        assert!(py.contains("self.play(Write(title))"));
        assert!(py.contains("self.play(title.animate.to_edge(UP))"));
        assert!(py.contains("equation = MathTex(\"E = mc^2\")"));
        assert!(py.contains("self.wait(2)"));
        assert!(py.contains("caption.to_edge(DOWN)"));
    }

    #[test]
    fn test_generate_algebra_script_stacks_steps() {
        let content = ContentRecord::sample(Category::Algebra);
        let py = renderer_for(&content).generate_python_script();

        assert!(py.contains("eq1.next_to(eq0, DOWN)"));
        assert!(py.contains("self.play(eq0.animate.set_color(GRAY))"));
        assert!(py.contains("eq2.next_to(eq1, DOWN)"));
    }

    #[test]
    fn test_generate_geometry_script() {
        let content = ContentRecord::sample(Category::Geometry);
        let py = renderer_for(&content).generate_python_script();

        assert!(py.contains("circle = Circle(radius=2)"));
        assert!(py.contains("radius = Line(circle.get_center(), circle.point_at_angle(0))"));
        assert!(py.contains("radius_label = MathTex(\"r\").next_to(radius, UP)"));
        assert!(py.contains("area = MathTex(\"A = \\\\pi r^2\")"));
        assert!(py.contains("area.to_edge(UP)"));
    }

    #[test]
    fn test_generate_calculus_script_stacks_labels() {
        let content = ContentRecord::sample(Category::Calculus);
        let py = renderer_for(&content).generate_python_script();

        assert!(py.contains("axis_config={\"include_tip\": True}"));
        assert!(py.contains("function = axes.plot(lambda x: np.sin(x), color=BLUE)"));
        assert!(py.contains("function_label = MathTex(\"f(x) = \\\\sin(x)\").next_to(axes, UP)"));
        assert!(py.contains(
            "derivative_label = MathTex(\"f'(x) = \\\\cos(x)\").next_to(function_label, DOWN)"
        ));
    }

    #[test]
    fn test_generate_integral_script() {
        let mut content = ContentRecord::sample(Category::Calculus);
        content.kind = Some("integral".to_string());
        let py = renderer_for(&content).generate_python_script();

        assert!(py.contains("function = axes.plot(lambda x: x**2, color=BLUE)"));
        assert!(py.contains("area = axes.get_area(function, [0, 2], color=YELLOW, opacity=0.3)"));
        assert!(py.contains("integral = MathTex(\"\\\\int_0^2 x^2 dx\")"));
    }

    #[test]
    fn test_empty_scene_emits_pass() {
        let renderer = ManimRenderer::new(
            SceneDescription::new("Empty"),
            &RendererConfig::default(),
        );
        let py = renderer.generate_python_script();
        assert!(py.contains("class EmptyScene(Scene):"));
        assert!(py.contains("pass"));
    }

    #[test]
    fn test_class_name_sanitization() {
        let renderer = ManimRenderer::new(
            SceneDescription::new("Area of a Circle"),
            &RendererConfig::default(),
        );
        assert_eq!(renderer.class_name(), "AreaOfACircleScene");

        let renderer = ManimRenderer::new(
            SceneDescription::new("???"),
            &RendererConfig::default(),
        );
        assert_eq!(renderer.class_name(), "ExplainerScene");
    }

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape("\\pi"), "\\\\pi");
        assert_eq!(escape("two\nlines"), "two lines");
    }

    #[test]
    fn test_py_var_sanitization() {
        assert_eq!(py_var("title"), "title");
        assert_eq!(py_var("My Shape"), "my_shape");
        assert_eq!(py_var("2nd"), "m_2nd");
    }

    #[test]
    fn test_quality_flags() {
        let mut config = RendererConfig::default();
        for (quality, flag) in [("low", "-ql"), ("medium", "-qm"), ("high", "-qh"), ("bogus", "-qm")] {
            config.quality = quality.to_string();
            let renderer = ManimRenderer::new(SceneDescription::new("Q"), &config);
            assert_eq!(renderer.quality_flag(), flag);
        }
    }

    #[test]
    fn test_parse_output_path() {
        let stdout = "INFO  Rendered RelativityScene\nFile ready at '/tmp/media/videos/animation.mp4'\n";
        assert_eq!(
            ManimRenderer::parse_output_path(stdout),
            Some(PathBuf::from("/tmp/media/videos/animation.mp4"))
        );
        assert_eq!(ManimRenderer::parse_output_path("no match here"), None);
    }
}
