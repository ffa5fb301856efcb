use crate::content::{Category, ContentRecord};
use crate::scene::{Curve, Edge, Placement, SceneDescription, SceneOp, Shape, Tone};
use unicode_segmentation::UnicodeSegmentation;

/// Longest caption we put on screen; anything beyond this is cut at a
/// grapheme boundary and ellipsized.
const CAPTION_MAX_GRAPHEMES: usize = 120;

const TITLE_FONT_SIZE: u32 = 40;
const CAPTION_FONT_SIZE: u32 = 24;

/// Builds the deterministic op sequence for a content record.
///
/// Every scene opens with the title frame and closes with the explanation
/// caption (when present). Categories add their own ops in between; a
/// category we do not recognize contributes the generic equation frame and
/// nothing else.
pub struct SceneTemplates;

impl SceneTemplates {
    pub fn build(content: &ContentRecord) -> SceneDescription {
        let mut scene = SceneDescription::new(&content.topic);

        scene.push(SceneOp::WriteText {
            id: "title".to_string(),
            content: content.topic.clone(),
            font_size: TITLE_FONT_SIZE,
            at: Placement::Center,
        });
        scene.push(SceneOp::Wait { seconds: 1.0 });
        scene.push(SceneOp::MoveToEdge {
            id: "title".to_string(),
            edge: Edge::Top,
        });

        match content.category {
            Some(Category::Algebra) => Self::algebra(&mut scene, content),
            Some(Category::Geometry) => Self::geometry(&mut scene, content),
            Some(Category::Calculus) => Self::calculus(&mut scene, content),
            Some(Category::Unknown) | None => Self::generic(&mut scene, content),
        }

        if !content.explanation.is_empty() {
            scene.push(SceneOp::WriteText {
                id: "caption".to_string(),
                content: Self::caption(&content.explanation),
                font_size: CAPTION_FONT_SIZE,
                at: Placement::Edge(Edge::Bottom),
            });
            scene.push(SceneOp::Wait { seconds: 2.0 });
        }

        scene
    }

    /// Title plus the bare equation, held on screen
    fn generic(scene: &mut SceneDescription, content: &ContentRecord) {
        scene.push(SceneOp::WriteEquation {
            id: "equation".to_string(),
            tex: content.equation.clone(),
            at: Placement::Center,
        });
        scene.push(SceneOp::Wait { seconds: 2.0 });
    }

    /// Base equation with each rewrite step written below the previous one,
    /// dimming the step it supersedes
    fn algebra(scene: &mut SceneDescription, content: &ContentRecord) {
        scene.push(SceneOp::WriteEquation {
            id: "eq0".to_string(),
            tex: content.equation.clone(),
            at: Placement::Center,
        });

        let mut prev = "eq0".to_string();
        for (index, step) in content.steps.iter().enumerate() {
            let id = format!("eq{}", index + 1);
            scene.push(SceneOp::WriteEquation {
                id: id.clone(),
                tex: step.clone(),
                at: Placement::Below { of: prev.clone() },
            });
            scene.push(SceneOp::FadeToTone {
                id: prev,
                tone: Tone::Gray,
            });
            scene.push(SceneOp::Wait { seconds: 1.0 });
            prev = id;
        }
    }

    fn geometry(scene: &mut SceneDescription, content: &ContentRecord) {
        match content.kind.as_deref() {
            Some("circle") => {
                scene.push(SceneOp::CreateShape {
                    id: "circle".to_string(),
                    shape: Shape::Circle { radius: 2.0 },
                });
                scene.push(SceneOp::DrawRadius {
                    id: "radius".to_string(),
                    of: "circle".to_string(),
                    label: Some("r".to_string()),
                });
                scene.push(SceneOp::WriteEquation {
                    id: "area".to_string(),
                    tex: "A = \\pi r^2".to_string(),
                    at: Placement::Edge(Edge::Top),
                });
            }
            Some("triangle") => {
                scene.push(SceneOp::CreateShape {
                    id: "triangle".to_string(),
                    shape: Shape::Triangle,
                });
                scene.push(SceneOp::MarkAngles {
                    id: "angles".to_string(),
                    of: "triangle".to_string(),
                });
            }
            // Kinds we do not know draw nothing beyond the shared frame
            _ => {}
        }
    }

    fn calculus(scene: &mut SceneDescription, content: &ContentRecord) {
        match content.kind.as_deref() {
            Some("derivative") => {
                scene.push(SceneOp::PlotAxes {
                    id: "axes".to_string(),
                    x_range: [-3.0, 3.0],
                    y_range: [-2.0, 2.0],
                });
                scene.push(SceneOp::PlotCurve {
                    id: "function".to_string(),
                    on: "axes".to_string(),
                    curve: Curve::Sin,
                    tone: Tone::Blue,
                    label: Some("f(x) = \\sin(x)".to_string()),
                });
                scene.push(SceneOp::PlotCurve {
                    id: "derivative".to_string(),
                    on: "axes".to_string(),
                    curve: Curve::Cos,
                    tone: Tone::Red,
                    label: Some("f'(x) = \\cos(x)".to_string()),
                });
            }
            Some("integral") => {
                scene.push(SceneOp::PlotAxes {
                    id: "axes".to_string(),
                    x_range: [0.0, 4.0],
                    y_range: [0.0, 4.0],
                });
                scene.push(SceneOp::PlotCurve {
                    id: "function".to_string(),
                    on: "axes".to_string(),
                    curve: Curve::Square,
                    tone: Tone::Blue,
                    label: None,
                });
                scene.push(SceneOp::ShadeUnderCurve {
                    id: "area".to_string(),
                    on: "axes".to_string(),
                    of: "function".to_string(),
                    range: [0.0, 2.0],
                    tone: Tone::Yellow,
                });
                scene.push(SceneOp::WriteEquation {
                    id: "integral".to_string(),
                    tex: "\\int_0^2 x^2 dx".to_string(),
                    at: Placement::Edge(Edge::Top),
                });
            }
            _ => {}
        }
    }

    fn caption(text: &str) -> String {
        let mut graphemes = text.graphemes(true);
        let cut: String = graphemes.by_ref().take(CAPTION_MAX_GRAPHEMES).collect();
        if graphemes.next().is_some() {
            format!("{cut}…")
        } else {
            cut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DEFAULT_EQUATION;

    fn equation_count(scene: &SceneDescription) -> usize {
        scene
            .ops
            .iter()
            .filter(|op| matches!(op, SceneOp::WriteEquation { .. }))
            .count()
    }

    #[test]
    fn test_generic_scene_for_request_content() {
        let content = ContentRecord::from_prompt("Relativity", "explain energy-mass equivalence");
        let scene = SceneTemplates::build(&content);

        assert_eq!(scene.name, "Relativity");
        assert!(matches!(
            &scene.ops[0],
            SceneOp::WriteText { id, content, .. } if id == "title" && content == "Relativity"
        ));
        assert!(scene.ops.iter().any(|op| matches!(
            op,
            SceneOp::WriteEquation { tex, .. } if tex == DEFAULT_EQUATION
        )));
        // Caption is the last thing written
        assert!(matches!(
            &scene.ops[scene.len() - 2],
            SceneOp::WriteText { id, .. } if id == "caption"
        ));
    }

    #[test]
    fn test_unrecognized_category_gets_generic_scene() {
        let json = r#"{"topic": "T", "equation": "a = b", "category": "numerology"}"#;
        let content: ContentRecord = serde_json::from_str(json).unwrap();
        let scene = SceneTemplates::build(&content);

        assert_eq!(equation_count(&scene), 1);
        assert!(!scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::CreateShape { .. } | SceneOp::PlotAxes { .. })));
    }

    #[test]
    fn test_algebra_steps_ladder() {
        let content = ContentRecord::sample(Category::Algebra);
        let scene = SceneTemplates::build(&content);

        // Base equation plus one per step
        assert_eq!(equation_count(&scene), content.steps.len() + 1);

        // Each step dims its predecessor
        let fades: Vec<_> = scene
            .ops
            .iter()
            .filter(|op| matches!(op, SceneOp::FadeToTone { tone: Tone::Gray, .. }))
            .collect();
        assert_eq!(fades.len(), content.steps.len());

        // Steps stack below one another
        assert!(scene.ops.iter().any(|op| matches!(
            op,
            SceneOp::WriteEquation { at: Placement::Below { of }, .. } if of == "eq0"
        )));
    }

    #[test]
    fn test_geometry_circle() {
        let content = ContentRecord::sample(Category::Geometry);
        let scene = SceneTemplates::build(&content);

        assert!(scene.ops.iter().any(|op| matches!(
            op,
            SceneOp::CreateShape { shape: Shape::Circle { .. }, .. }
        )));
        assert!(scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::DrawRadius { label: Some(l), .. } if l == "r")));
        assert!(scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::WriteEquation { tex, .. } if tex == "A = \\pi r^2")));
    }

    #[test]
    fn test_geometry_triangle() {
        let mut content = ContentRecord::sample(Category::Geometry);
        content.kind = Some("triangle".to_string());
        let scene = SceneTemplates::build(&content);

        assert!(scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::CreateShape { shape: Shape::Triangle, .. })));
        assert!(scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::MarkAngles { .. })));
    }

    #[test]
    fn test_geometry_missing_kind_draws_nothing_extra() {
        let mut content = ContentRecord::sample(Category::Geometry);
        content.kind = None;
        let scene = SceneTemplates::build(&content);

        assert!(!scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::CreateShape { .. })));
    }

    #[test]
    fn test_calculus_derivative_plots_both_curves() {
        let content = ContentRecord::sample(Category::Calculus);
        let scene = SceneTemplates::build(&content);

        let curves: Vec<_> = scene
            .ops
            .iter()
            .filter_map(|op| match op {
                SceneOp::PlotCurve { curve, .. } => Some(*curve),
                _ => None,
            })
            .collect();
        assert_eq!(curves, vec![Curve::Sin, Curve::Cos]);
    }

    #[test]
    fn test_calculus_integral_shades_area() {
        let mut content = ContentRecord::sample(Category::Calculus);
        content.kind = Some("integral".to_string());
        let scene = SceneTemplates::build(&content);

        assert!(scene.ops.iter().any(|op| matches!(
            op,
            SceneOp::ShadeUnderCurve { range, tone: Tone::Yellow, .. } if *range == [0.0, 2.0]
        )));
    }

    #[test]
    fn test_empty_explanation_skips_caption() {
        let mut content = ContentRecord::from_prompt("T", "");
        content.explanation.clear();
        let scene = SceneTemplates::build(&content);

        assert!(!scene
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::WriteText { id, .. } if id == "caption")));
    }

    #[test]
    fn test_caption_truncates_at_grapheme_boundary() {
        let long = "é".repeat(200);
        let caption = SceneTemplates::caption(&long);
        assert_eq!(caption.graphemes(true).count(), CAPTION_MAX_GRAPHEMES + 1);
        assert!(caption.ends_with('…'));

        let short = "short enough";
        assert_eq!(SceneTemplates::caption(short), short);
    }
}
