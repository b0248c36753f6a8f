use std::collections::BTreeSet;

use bevy::prelude::*;
use bevy::input::common_conditions::input_just_pressed;
use bevy::math::primitives::{Sphere, Cuboid};
use bevy::ecs::system::Local;

use crate::simulation::engine::{FrameHandle, FrameHost, SimulationLoop};

/// Component tagging each sphere with its particle index
#[derive(Component)]
struct BodyIndex3(pub usize);

/// The simulation as seen by the viewer, advanced by a fixed `frame_dt` per rendered frame
#[derive(Resource)]
struct ViewerSimulation {
    sim: SimulationLoop,
    frame_dt: f64,
}

/// Per-frame callback registrations owned by the app
#[derive(Resource, Default)]
struct FrameCallbacks {
    active: BTreeSet<FrameHandle>,
    next_id: u64,
}

impl FrameCallbacks {
    fn is_active(&self, handle: FrameHandle) -> bool {
        self.active.contains(&handle)
    }
}

impl FrameHost for FrameCallbacks {
    fn register_frame_callback(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.active.insert(handle);
        handle
    }

    fn cancel_frame_callback(&mut self, handle: FrameHandle) {
        self.active.remove(&handle);
    }
}

/// World-space → screen-space scaling factor for positions and radii
const SCALE3D: f32 = 50.0;

/// Open a window and drive `sim` once per rendered frame.
/// Space pauses/resumes, Escape disposes the simulation and quits.
pub fn run_3d(sim: SimulationLoop, frame_dt: f64) {
    tracing::info!(particles = sim.particles().len(), "starting Bevy 3D viewer");

    App::new()
        .insert_resource(ViewerSimulation { sim, frame_dt })
        .init_resource::<FrameCallbacks>()
        // main() already installed the tracing subscriber
        .add_plugins(DefaultPlugins.build().disable::<bevy::log::LogPlugin>())
        .add_systems(Startup, (setup_3d, start_simulation))
        .add_systems(
            Update,
            (
                toggle_running.run_if(input_just_pressed(KeyCode::Space)),
                physics_step_3d,
                sync_transforms_3d,
            )
                .chain()
                .run_if(resource_exists::<ViewerSimulation>),
        )
        .add_systems(Update, teardown.run_if(input_just_pressed(KeyCode::Escape)))
        .run();
}

/// Startup system: spawn camera, light, the boundary cube and one sphere per body
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewer: Res<ViewerSimulation>,
) {
    let cfg = viewer.sim.config();
    let h = cfg.half_extent as f32 * SCALE3D;

    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        transform: Transform::from_xyz(1.6 * h, 1.2 * h, 3.5 * h).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 20.0 * h,
            ..Default::default()
        },
        transform: Transform::from_xyz(h, 2.0 * h, 2.0 * h),
        ..Default::default()
    });

    spawn_box_edges(&mut commands, &mut meshes, &mut materials, h);

    let radius_screen = cfg.radius as f32 * SCALE3D;
    for (i, p) in viewer.sim.particles().iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(radius_screen).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(1.0, 1.0, 1.0),
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_xyz(
                    (p.x.x as f32) * SCALE3D,
                    (p.x.y as f32) * SCALE3D,
                    (p.x.z as f32) * SCALE3D,
                ),
                ..Default::default()
            },
            BodyIndex3(i),
        ));
    }
}

fn start_simulation(mut viewer: ResMut<ViewerSimulation>, mut callbacks: ResMut<FrameCallbacks>) {
    viewer.sim.start(&mut *callbacks);
}

fn toggle_running(mut viewer: ResMut<ViewerSimulation>, mut callbacks: ResMut<FrameCallbacks>) {
    let callbacks = &mut *callbacks;
    if viewer.sim.is_running() {
        viewer.sim.stop(callbacks);
    } else {
        viewer.sim.start(callbacks);
    }
}

/// Per-frame tick: advance only while our registration is live
fn physics_step_3d(mut viewer: ResMut<ViewerSimulation>, callbacks: Res<FrameCallbacks>) {
    let Some(handle) = viewer.sim.frame_handle() else {
        return;
    };
    if !callbacks.is_active(handle) {
        return;
    }

    let dt = viewer.frame_dt;
    viewer.sim.advance(dt);
}

fn teardown(world: &mut World) {
    let Some(viewer) = world.remove_resource::<ViewerSimulation>() else {
        return;
    };
    {
        let mut callbacks = world.resource_mut::<FrameCallbacks>();
        viewer.sim.dispose(&mut *callbacks);
    }
    world.send_event(AppExit::Success);
}

// ========================================================================================
// Velocity color
// ========================================================================================

fn speed_to_color(speed: f32, max_speed: f32) -> Color {
    if max_speed <= 0.0 {
        return Color::srgb(1.0, 1.0, 1.0);
    }

    let t = (speed / max_speed).clamp(0.0, 1.0);

    // Simple blue -> red gradient
    Color::srgb(t, 0.0, 1.0 - t)
}

#[derive(Default)]
struct VelocityColorState {
    smoothed_max: f32,
}

fn sync_transforms_3d(
    viewer: Res<ViewerSimulation>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&BodyIndex3, &mut Transform, &Handle<StandardMaterial>)>,
    mut vel_state: Local<VelocityColorState>,
) {
    let snapshot = viewer.sim.snapshot();

    let max_speed_frame = snapshot
        .iter()
        .map(|p| p.velocity.norm() as f32)
        .fold(0.0_f32, f32::max);

    if vel_state.smoothed_max == 0.0 {
        vel_state.smoothed_max = max_speed_frame.max(1e-6);
    }

    // Smooth over time (EMA) so one fast collision doesn't wash out the palette
    let alpha = 0.05;
    vel_state.smoothed_max = (1.0 - alpha) * vel_state.smoothed_max + alpha * max_speed_frame;
    let v_norm = vel_state.smoothed_max.max(1e-6);

    for (BodyIndex3(i), mut transform, mat_handle) in &mut query {
        if let Some(p) = snapshot.get(*i) {
            transform.translation = Vec3::new(
                (p.position.x as f32) * SCALE3D,
                (p.position.y as f32) * SCALE3D,
                (p.position.z as f32) * SCALE3D,
            );

            if let Some(mat) = materials.get_mut(mat_handle) {
                mat.base_color = speed_to_color(p.velocity.norm() as f32, v_norm);
            }
        }
    }
}

// =========================================================================================
// Boundary cube outline: 12 thin boxes, four along each axis
// =========================================================================================

fn spawn_box_edges(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    h: f32,
) {
    let thickness = 0.01 * h;
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.4, 0.4, 0.4),
        unlit: true,
        ..Default::default()
    });

    let corners = [(-h, -h), (-h, h), (h, -h), (h, h)];
    for axis in 0..3 {
        let mut size = Vec3::splat(thickness);
        size[axis] = 2.0 * h;
        let mesh = meshes.add(Cuboid::new(size.x, size.y, size.z).mesh());

        for (a, b) in corners {
            let translation = match axis {
                0 => Vec3::new(0.0, a, b),
                1 => Vec3::new(a, 0.0, b),
                _ => Vec3::new(a, b, 0.0),
            };
            commands.spawn(PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: Transform::from_translation(translation),
                ..Default::default()
            });
        }
    }
}
