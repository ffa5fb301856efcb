use serde::Serialize;

/// Frame edges an element can be pushed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
}

/// Named color tones understood by the external engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Blue,
    Red,
    Yellow,
    Gray,
}

/// Primitive shapes the engine can construct
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle { radius: f32 },
    Triangle,
}

/// Curves the engine can plot on a set of axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Sin,
    Cos,
    /// f(x) = x^2
    Square,
}

/// Where a written element is placed before it appears
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Center,
    Edge(Edge),
    /// Directly below a previously created element
    Below { of: String },
}

/// A single draw/animate instruction for the external rendering engine.
///
/// Elements are referred to by the `id` they were created under; ops that
/// name an unknown id are the engine's problem, not ours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneOp {
    WriteText {
        id: String,
        content: String,
        font_size: u32,
        at: Placement,
    },
    WriteEquation {
        id: String,
        tex: String,
        at: Placement,
    },
    MoveToEdge {
        id: String,
        edge: Edge,
    },
    FadeToTone {
        id: String,
        tone: Tone,
    },
    CreateShape {
        id: String,
        shape: Shape,
    },
    /// Radius line from the center of a circle, with an optional TeX label
    DrawRadius {
        id: String,
        of: String,
        label: Option<String>,
    },
    /// Arc marks on all three corners of a triangle
    MarkAngles {
        id: String,
        of: String,
    },
    PlotAxes {
        id: String,
        x_range: [f32; 2],
        y_range: [f32; 2],
    },
    /// Plot a curve on existing axes, with an optional TeX label that stacks
    /// under any label plotted before it
    PlotCurve {
        id: String,
        on: String,
        curve: Curve,
        tone: Tone,
        label: Option<String>,
    },
    /// Shade the region under a previously plotted curve
    ShadeUnderCurve {
        id: String,
        on: String,
        of: String,
        range: [f32; 2],
        tone: Tone,
    },
    Wait {
        seconds: f32,
    },
}

/// An ordered recipe of drawing/animation operations for one video
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneDescription {
    pub name: String,
    pub ops: Vec<SceneOp>,
}

impl SceneDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: SceneOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
