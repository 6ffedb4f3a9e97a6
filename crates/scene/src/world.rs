use crate::components::{ComponentProperties, Drawable3D, Spin, Transform, Visibility};
use crate::entity::EntityId;

/// Component storage for the persistent 3D scene.
///
/// Dense vectors indexed by entity id; entities are never despawned, the
/// whole world is dropped at teardown instead.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    transforms: Vec<Option<Transform>>,
    spins: Vec<Option<Spin>>,
    visibility: Vec<Option<Visibility>>,
    drawables_3d: Vec<Option<Drawable3D>>,
    properties: Vec<Option<ComponentProperties>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.next_index);
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn set_spin(&mut self, entity: EntityId, spin: Spin) {
        self.ensure_capacity(entity.index() as usize);
        self.spins[entity.index() as usize] = Some(spin);
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        self.ensure_capacity(entity.index() as usize);
        self.visibility[entity.index() as usize] = Some(visibility);
    }

    pub fn set_drawable_3d(&mut self, entity: EntityId, drawable: Drawable3D) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables_3d[entity.index() as usize] = Some(drawable);
    }

    pub fn set_properties(&mut self, entity: EntityId, properties: ComponentProperties) {
        self.ensure_capacity(entity.index() as usize);
        self.properties[entity.index() as usize] = Some(properties);
    }

    pub fn spin(&self, entity: EntityId) -> Option<Spin> {
        self.spins.get(entity.index() as usize).and_then(|s| *s)
    }

    pub fn properties(&self, entity: EntityId) -> Option<&ComponentProperties> {
        self.properties
            .get(entity.index() as usize)
            .and_then(|p| p.as_ref())
    }

    /// Advance every spin component by one frame.
    pub fn advance_spins(&mut self) {
        for spin in self.spins.iter_mut().flatten() {
            spin.advance();
        }
    }

    /// Visible 3D drawables in entity order.
    pub fn drawables_3d(&self) -> Vec<(EntityId, Transform, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables_3d.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            let visible = self
                .visibility
                .get(idx)
                .and_then(|v| *v)
                .map(|v| v.visible)
                .unwrap_or(true);
            if !visible {
                continue;
            }

            out.push((EntityId(idx as u32), transform, *drawable));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.transforms.resize(new_len, None);
            self.spins.resize(new_len, None);
            self.visibility.resize(new_len, None);
            self.drawables_3d.resize(new_len, None);
            self.properties.resize(new_len, None);
        }
    }
}
