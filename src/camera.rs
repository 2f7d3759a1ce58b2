use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::config::GalleryConfig;
use crate::MainCamera;

pub struct CameraPlugin;
impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewMode>()
            .add_event::<ToggleView>()
            .add_systems(
                Update,
                (apply_view_toggle, fit_aspect_to_window, sync_orientation)
                    .chain()
                    .in_set(CameraSet),
            );
    }
}

/// Systems that write the camera transform from its logical state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraSet;

/// Euler angles in radians. Rotation is applied about X, then Y, then Z.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_x(self.pitch)
            * Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_z(self.roll)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub translation: Vec3,
    pub orientation: Orientation,
}

impl CameraPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation).with_rotation(self.orientation.to_quat())
    }

    fn apply(&self, transform: &mut Transform, orientation: &mut Orientation) {
        transform.translation = self.translation;
        *orientation = self.orientation;
    }
}

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    TopDown,
    FirstPerson,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::TopDown => ViewMode::FirstPerson,
            ViewMode::FirstPerson => ViewMode::TopDown,
        }
    }

    pub fn pose(self, config: &GalleryConfig) -> CameraPose {
        match self {
            ViewMode::TopDown => config.camera.top_down.pose(),
            ViewMode::FirstPerson => config.camera.first_person.pose(),
        }
    }
}

#[derive(Event, Default)]
pub struct ToggleView;

fn apply_view_toggle(
    mut ev_toggle: EventReader<ToggleView>,
    mut mode: ResMut<ViewMode>,
    config: Res<GalleryConfig>,
    mut q_cam: Query<(&mut Transform, &mut Orientation), With<MainCamera>>,
) {
    for _ in ev_toggle.read() {
        *mode = mode.toggled();
        let pose = mode.pose(&config);
        for (mut transform, mut orientation) in &mut q_cam {
            pose.apply(&mut transform, &mut orientation);
        }
        debug!("view mode -> {:?}", *mode);
    }
}

fn fit_aspect_to_window(
    mut ev_resize: EventReader<WindowResized>,
    mut q_cam: Query<&mut Projection, With<MainCamera>>,
) {
    let Some(ev) = ev_resize.read().last() else {
        return;
    };
    // Minimized windows report a zero extent.
    if ev.width <= 0.0 || ev.height <= 0.0 {
        return;
    }
    for mut projection in &mut q_cam {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = ev.width / ev.height;
        }
    }
    debug!("window resized to {}x{}", ev.width, ev.height);
}

fn sync_orientation(mut q_cam: Query<(&Orientation, &mut Transform), Changed<Orientation>>) {
    for (orientation, mut transform) in &mut q_cam {
        transform.rotation = orientation.to_quat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn camera_app() -> App {
        let mut app = App::new();
        app.insert_resource(GalleryConfig::default())
            .add_plugins(CameraPlugin)
            .add_event::<WindowResized>();
        app
    }

    fn spawn_camera(app: &mut App, pose: CameraPose) -> Entity {
        app.world_mut()
            .spawn((
                pose.transform(),
                pose.orientation,
                Projection::Perspective(PerspectiveProjection::default()),
                MainCamera,
            ))
            .id()
    }

    #[test]
    fn top_down_pose_looks_straight_down() {
        let pose = ViewMode::TopDown.pose(&GalleryConfig::default());
        assert_eq!(pose.orientation.pitch, -FRAC_PI_2);
        let forward = *pose.transform().forward();
        assert!(forward.abs_diff_eq(Vec3::NEG_Y, 1e-5), "forward was {forward:?}");
    }

    #[test]
    fn toggling_twice_restores_original_pose() {
        let mut app = camera_app();
        let start = ViewMode::TopDown.pose(&GalleryConfig::default());
        let cam = spawn_camera(&mut app, start);

        app.world_mut().send_event(ToggleView);
        app.update();
        assert_eq!(*app.world().resource::<ViewMode>(), ViewMode::FirstPerson);
        let transform = app.world().get::<Transform>(cam).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.0, 2.0, 0.0));

        app.world_mut().send_event(ToggleView);
        app.update();
        assert_eq!(*app.world().resource::<ViewMode>(), ViewMode::TopDown);
        let transform = *app.world().get::<Transform>(cam).unwrap();
        assert_eq!(transform.translation, start.translation);
        assert!(transform.rotation.abs_diff_eq(start.orientation.to_quat(), 1e-6));
        assert_eq!(*app.world().get::<Orientation>(cam).unwrap(), start.orientation);
    }

    #[test]
    fn toggle_discards_movement_and_yaw() {
        let mut app = camera_app();
        let cam = spawn_camera(&mut app, ViewMode::TopDown.pose(&GalleryConfig::default()));
        {
            let mut entity = app.world_mut().entity_mut(cam);
            entity.get_mut::<Transform>().unwrap().translation = Vec3::new(13.0, 100.0, -7.5);
            entity.get_mut::<Orientation>().unwrap().yaw = 1.2;
        }

        app.world_mut().send_event(ToggleView);
        app.update();

        let orientation = *app.world().get::<Orientation>(cam).unwrap();
        assert_eq!(orientation, Orientation::default());
        let transform = app.world().get::<Transform>(cam).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.0, 2.0, 0.0));
        assert!(transform.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn resize_updates_aspect_ratio() {
        let mut app = camera_app();
        let pose = CameraPose {
            translation: Vec3::ZERO,
            orientation: Orientation::default(),
        };
        let cam = spawn_camera(&mut app, pose);
        let window = app.world_mut().spawn_empty().id();

        app.world_mut().send_event(WindowResized {
            window,
            width: 1600.0,
            height: 900.0,
        });
        app.update();

        let Projection::Perspective(perspective) = app.world().get::<Projection>(cam).unwrap()
        else {
            panic!("camera lost its perspective projection");
        };
        assert!((perspective.aspect_ratio - 1600.0 / 900.0).abs() < 1e-6);

        // A minimized window keeps the last usable ratio.
        app.world_mut().send_event(WindowResized {
            window,
            width: 0.0,
            height: 0.0,
        });
        app.update();
        let Projection::Perspective(perspective) = app.world().get::<Projection>(cam).unwrap()
        else {
            panic!("camera lost its perspective projection");
        };
        assert!((perspective.aspect_ratio - 1600.0 / 900.0).abs() < 1e-6);
    }

    #[test]
    fn orientation_applies_pitch_before_yaw() {
        let orientation = Orientation {
            pitch: 0.3,
            yaw: -0.8,
            roll: 0.0,
        };
        let expected = Quat::from_rotation_x(0.3) * Quat::from_rotation_y(-0.8);
        assert!(orientation.to_quat().abs_diff_eq(expected, 1e-6));
    }
}
