use runtime::{Job, Scheduler};

use crate::World;
use crate::components::{ComponentProperties, Drawable3D, Spin, Transform};
use crate::entity::EntityId;

/// Radius of the pickable globe surface.
pub const GLOBE_RADIUS: f64 = 1.0;
/// Cloud shell sits just above the surface.
pub const CLOUD_RADIUS: f64 = 1.01;
pub const CLOUD_OPACITY: f64 = 0.5;
/// Background sphere rendered from the inside.
pub const STARFIELD_RADIUS: f64 = 90.0;
/// Per-frame spin deltas (radians). Clouds drift faster than the surface;
/// the outline group matches the globe so highlights stay glued to it.
pub const GLOBE_SPIN_RATE: f64 = 0.0008;
pub const CLOUD_SPIN_RATE: f64 = 0.0012;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlobeSceneIds {
    pub globe: EntityId,
    pub clouds: EntityId,
    pub stars: EntityId,
    pub outlines: EntityId,
}

/// Spawn the persistent globe scene: surface, cloud shell, starfield
/// backdrop, and the (initially empty) hover outline group.
pub fn spawn_globe_scene(world: &mut World) -> GlobeSceneIds {
    let globe = world.spawn();
    world.set_transform(globe, Transform::identity());
    world.set_drawable_3d(globe, Drawable3D::globe(GLOBE_RADIUS));
    world.set_spin(globe, Spin::new(GLOBE_SPIN_RATE));
    world.set_properties(globe, ComponentProperties::named("globe"));

    let clouds = world.spawn();
    world.set_transform(clouds, Transform::identity());
    world.set_drawable_3d(clouds, Drawable3D::cloud_shell(CLOUD_RADIUS, CLOUD_OPACITY));
    world.set_spin(clouds, Spin::new(CLOUD_SPIN_RATE));
    world.set_properties(clouds, ComponentProperties::named("clouds"));

    let stars = world.spawn();
    world.set_transform(stars, Transform::identity());
    world.set_drawable_3d(stars, Drawable3D::starfield(STARFIELD_RADIUS));
    world.set_properties(stars, ComponentProperties::named("stars"));

    let outlines = world.spawn();
    world.set_transform(outlines, Transform::identity());
    world.set_drawable_3d(outlines, Drawable3D::outline_group());
    world.set_spin(outlines, Spin::new(GLOBE_SPIN_RATE));
    world.set_properties(outlines, ComponentProperties::named("outlines"));

    GlobeSceneIds {
        globe,
        clouds,
        stars,
        outlines,
    }
}

/// Register the scene's per-frame animation work with the runtime.
pub fn register_frame_jobs(scheduler: &mut Scheduler<World>) {
    scheduler.add_job(Job::new("advance-spins", |_frame, world: &mut World| {
        world.advance_spins();
    }));
}
