use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::zero(),
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self { position }
    }
}
