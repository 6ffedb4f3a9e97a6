#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: [f32; 4],
    /// Radial scale factor applied to surface geometry; values slightly
    /// above 1.0 lift it off the globe to avoid z-fighting.
    pub lift: f64,
}

impl LayerStyle {
    pub const fn new(visible: bool, color: [f32; 4], lift: f64) -> Self {
        Self {
            visible,
            color,
            lift,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: [1.0, 1.0, 1.0, 1.0],
            lift: 1.0,
        }
    }
}
