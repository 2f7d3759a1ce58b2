use crate::camera::{CameraSet, Orientation, ViewMode};
use crate::config::GalleryConfig;
use crate::MainCamera;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::winit::WinitEvent as WindowEvent;

/// Each direction answers to an arrow key and its WASD twin.
#[derive(Resource)]
pub struct Keybinds {
    pub forward: [KeyCode; 2],
    pub back: [KeyCode; 2],
    pub left: [KeyCode; 2],
    pub right: [KeyCode; 2],
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            forward: [KeyCode::ArrowUp, KeyCode::KeyW],
            back: [KeyCode::ArrowDown, KeyCode::KeyS],
            left: [KeyCode::ArrowLeft, KeyCode::KeyA],
            right: [KeyCode::ArrowRight, KeyCode::KeyD],
        }
    }
}

impl Keybinds {
    pub fn intent(&self, keys: &ButtonInput<KeyCode>) -> MoveIntent {
        MoveIntent {
            forward: keys.any_pressed(self.forward),
            back: keys.any_pressed(self.back),
            left: keys.any_pressed(self.left),
            right: keys.any_pressed(self.right),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Set by the UI each frame while the pointer is over an egui area.
#[derive(Resource, Default)]
pub struct UiPointerCapture(pub bool);

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Keybinds>()
            .init_resource::<UiPointerCapture>()
            .insert_resource(DragState::default())
            .add_systems(
                Update,
                (mouse_drag_rotation, touch_drag_rotation, keyboard_movement)
                    .chain()
                    .in_set(InputSet)
                    .before(CameraSet),
            );
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSet;

#[derive(Resource, Default, Debug)]
pub struct DragState {
    pub active: bool,
    pub last: Vec2,
    /// Finger that owns the drag, if it was started by touch.
    pub touch: Option<u64>,
    cursor: Option<Vec2>,
}

impl DragState {
    pub fn press(&mut self, at: Vec2) {
        self.active = true;
        self.last = at;
    }

    /// Horizontal travel since the previous sample, if a drag is in progress.
    pub fn drag_to(&mut self, at: Vec2) -> Option<f32> {
        if !self.active {
            return None;
        }
        let dx = at.x - self.last.x;
        self.last = at;
        Some(dx)
    }

    pub fn release(&mut self) {
        self.active = false;
        self.touch = None;
    }
}

pub fn apply_drag(orientation: &mut Orientation, dx: f32, sensitivity: f32) {
    orientation.yaw -= dx * sensitivity;
}

/// Reads the window's combined event stream so a press or release is
/// ordered against the cursor moves around it within the same frame.
fn mouse_drag_rotation(
    mut drag: ResMut<DragState>,
    mut window_evr: EventReader<WindowEvent>,
    capture: Res<UiPointerCapture>,
    config: Res<GalleryConfig>,
    mut q_cam: Query<&mut Orientation, With<MainCamera>>,
) {
    for ev in window_evr.read() {
        match ev {
            WindowEvent::MouseButtonInput(input) if input.button == MouseButton::Left => {
                if drag.touch.is_some() {
                    continue;
                }
                match input.state {
                    ButtonState::Pressed if !capture.0 => {
                        if let Some(at) = drag.cursor {
                            drag.press(at);
                        }
                    }
                    ButtonState::Released => drag.release(),
                    _ => {}
                }
            }
            WindowEvent::CursorMoved(moved) => {
                drag.cursor = Some(moved.position);
                if drag.touch.is_some() {
                    continue;
                }
                if let Some(dx) = drag.drag_to(moved.position) {
                    for mut orientation in &mut q_cam {
                        apply_drag(&mut orientation, dx, config.controls.rotation_speed);
                    }
                }
            }
            _ => {}
        }
    }
}

fn touch_drag_rotation(
    mut drag: ResMut<DragState>,
    mut touch_evr: EventReader<TouchInput>,
    capture: Res<UiPointerCapture>,
    config: Res<GalleryConfig>,
    mut q_cam: Query<&mut Orientation, With<MainCamera>>,
) {
    for ev in touch_evr.read() {
        match ev.phase {
            TouchPhase::Started if !drag.active && !capture.0 => {
                drag.press(ev.position);
                drag.touch = Some(ev.id);
            }
            TouchPhase::Moved if drag.touch == Some(ev.id) => {
                if let Some(dx) = drag.drag_to(ev.position) {
                    for mut orientation in &mut q_cam {
                        apply_drag(&mut orientation, dx, config.controls.rotation_speed);
                    }
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled if drag.touch == Some(ev.id) => {
                drag.release();
            }
            _ => {}
        }
    }
}

/// Unit direction on the floor plane for the held keys, or zero.
pub fn movement_direction(intent: MoveIntent, mode: ViewMode, yaw: f32) -> Vec3 {
    let (forward, right) = match mode {
        ViewMode::TopDown => (Vec3::NEG_Z, Vec3::X),
        ViewMode::FirstPerson => {
            let (sin, cos) = yaw.sin_cos();
            (Vec3::new(-sin, 0.0, -cos), Vec3::new(cos, 0.0, -sin))
        }
    };

    let mut dir = Vec3::ZERO;
    if intent.forward {
        dir += forward;
    }
    if intent.back {
        dir -= forward;
    }
    if intent.left {
        dir -= right;
    }
    if intent.right {
        dir += right;
    }
    dir.normalize_or_zero()
}

fn keyboard_movement(
    keys: Res<ButtonInput<KeyCode>>,
    keybinds: Res<Keybinds>,
    mode: Res<ViewMode>,
    config: Res<GalleryConfig>,
    mut q_cam: Query<(&mut Transform, &Orientation), With<MainCamera>>,
) {
    let intent = keybinds.intent(&keys);
    if intent == MoveIntent::default() {
        return;
    }
    for (mut transform, orientation) in &mut q_cam {
        let dir = movement_direction(intent, *mode, orientation.yaw);
        transform.translation += dir * config.controls.move_speed;
    }
}
