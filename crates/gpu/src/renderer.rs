use foundation::math::Vec3;
use scene::World;
use scene::components::Shape3D;

/// One draw instruction for the backend.
///
/// The list is the seam between scene state and the wgpu backend: the
/// scene side is plain data and fully testable, the backend just replays
/// the commands in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    DrawStars {
        radius: f64,
    },
    DrawGlobe {
        radius: f64,
        spin_angle_rad: f64,
    },
    DrawClouds {
        radius: f64,
        opacity: f64,
        spin_angle_rad: f64,
    },
    /// Hover outline line strips, one per polygon ring, drawn last.
    DrawOutlines {
        spin_angle_rad: f64,
        color: [f32; 4],
        rings: Vec<Vec<Vec3>>,
    },
}

#[derive(Debug, Default)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

pub struct Renderer;

impl Renderer {
    /// Collect the frame's draw list in back-to-front order: starfield,
    /// globe, cloud shell, then outlines. The outline command is emitted
    /// only when there are rings to draw.
    pub fn collect(world: &World, outline_rings: &[Vec<Vec3>], outline_color: [f32; 4]) -> RenderFrame {
        let mut frame = RenderFrame::default();

        let drawables = world.drawables_3d();

        for (_, _, drawable) in &drawables {
            if let Shape3D::Starfield { radius } = drawable.shape {
                frame.commands.push(RenderCommand::DrawStars { radius });
            }
        }

        for (entity, _, drawable) in &drawables {
            if let Shape3D::Globe { radius } = drawable.shape {
                let spin_angle_rad = world.spin(*entity).map(|s| s.angle_rad).unwrap_or(0.0);
                frame.commands.push(RenderCommand::DrawGlobe {
                    radius,
                    spin_angle_rad,
                });
            }
        }

        for (entity, _, drawable) in &drawables {
            if let Shape3D::CloudShell { radius, opacity } = drawable.shape {
                let spin_angle_rad = world.spin(*entity).map(|s| s.angle_rad).unwrap_or(0.0);
                frame.commands.push(RenderCommand::DrawClouds {
                    radius,
                    opacity,
                    spin_angle_rad,
                });
            }
        }

        if !outline_rings.is_empty() {
            for (entity, _, drawable) in &drawables {
                if let Shape3D::OutlineGroup = drawable.shape {
                    let spin_angle_rad = world.spin(*entity).map(|s| s.angle_rad).unwrap_or(0.0);
                    frame.commands.push(RenderCommand::DrawOutlines {
                        spin_angle_rad,
                        color: outline_color,
                        rings: outline_rings.to_vec(),
                    });
                }
            }
        }

        frame
    }
}
