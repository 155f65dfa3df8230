use crate::foundation::core::{Canvas, Point};

/// Two-stage rescale from the logical authoring canvas to reference screen space.
///
/// `screen = ((p - logical/2) * (output / logical) + logical/2) * (reference / output)`, per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenMapping {
    logical: Canvas,
    output: Canvas,
    reference: Canvas,
}

impl ScreenMapping {
    /// Mapping for the given canvases. Zero-sized canvases are rejected upstream by option
    /// validation.
    pub fn new(logical: Canvas, output: Canvas, reference: Canvas) -> Self {
        Self {
            logical,
            output,
            reference,
        }
    }

    /// Logical canvas.
    pub fn logical(&self) -> Canvas {
        self.logical
    }

    /// Output canvas.
    pub fn output(&self) -> Canvas {
        self.output
    }

    /// Reference canvas.
    pub fn reference(&self) -> Canvas {
        self.reference
    }

    /// Map a projected point.
    pub fn map(&self, p: Point) -> Point {
        Point::new(
            axis(p.x, self.logical.width, self.output.width, self.reference.width),
            axis(p.y, self.logical.height, self.output.height, self.reference.height),
        )
    }
}

fn axis(v: f64, logical: u32, output: u32, reference: u32) -> f64 {
    let logical = f64::from(logical);
    let output = f64::from(output);
    let half = (logical / 2.0).floor();
    ((v - half) * (output / logical) + half) * (f64::from(reference) / output)
}

#[cfg(test)]
#[path = "../../tests/unit/render/screen.rs"]
mod tests;
