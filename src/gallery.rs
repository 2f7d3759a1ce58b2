//! Static room geometry: checkerboard floor, two walls, and the paintings hung on them.
//!
//! Everything here is spawned once at startup. The only later mutation is
//! dropping the texture from a painting whose image failed to load.

use std::f32::consts::FRAC_PI_2;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::config::{GalleryConfig, Palette};

pub struct GalleryPlugin;
impl Plugin for GalleryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_floor, spawn_walls, spawn_paintings))
            .add_systems(Update, watch_painting_textures);
    }
}

#[derive(Component)]
pub struct Floor;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorTile {
    pub column: u32,
    pub row: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileShade {
    Light,
    Dark,
}

impl TileShade {
    pub fn at(column: u32, row: u32) -> Self {
        if (column + row) % 2 == 0 {
            TileShade::Light
        } else {
            TileShade::Dark
        }
    }
}

/// Center of a floor tile. Rows share the column offset, so the hall runs
/// mostly toward +Z from the starting point.
pub fn tile_center(column: u32, row: u32, columns: u32, tile_size: f32) -> Vec3 {
    let half = (columns / 2) as f32;
    Vec3::new(
        (column as f32 - half) * tile_size + tile_size / 2.0,
        0.0,
        (row as f32 - half) * tile_size + tile_size / 2.0,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// X coordinate sign of this wall.
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Rotation that turns a +Z facing rectangle toward the room's center line.
    fn facing(self) -> Quat {
        Quat::from_rotation_y(-self.sign() * FRAC_PI_2)
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Wall {
    pub side: Side,
}

#[derive(Component, Clone, Debug)]
pub struct Painting {
    pub side: Side,
    pub slot: usize,
}

/// A painting whose image has not finished loading yet.
#[derive(Component)]
struct PendingTexture {
    path: String,
    image: Handle<Image>,
    material: Handle<StandardMaterial>,
}

/// Z coordinates of `count` evenly spaced slots along a wall of `length`.
pub fn painting_slots(count: usize, length: f32) -> Vec<f32> {
    let spacing = length / count as f32;
    (0..count)
        .map(|i| -length / 2.0 + (i as f32 + 0.5) * spacing)
        .collect()
}

fn unlit(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    }
}

fn spawn_floor(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GalleryConfig>,
    palette: Res<Palette>,
) {
    let floor = &config.floor;
    let mesh = meshes.add(Rectangle::new(floor.tile_size, floor.tile_size));
    let light = materials.add(unlit(palette.floor_light));
    let dark = materials.add(unlit(palette.floor_dark));
    let lay_flat = Quat::from_rotation_x(-FRAC_PI_2);

    commands
        .spawn((SpatialBundle::default(), Floor, Name::new("Floor")))
        .with_children(|parent| {
            for column in 0..floor.columns {
                for row in 0..floor.rows {
                    let material = match TileShade::at(column, row) {
                        TileShade::Light => light.clone(),
                        TileShade::Dark => dark.clone(),
                    };
                    let center = tile_center(column, row, floor.columns, floor.tile_size);
                    parent.spawn((
                        PbrBundle {
                            mesh: mesh.clone(),
                            material,
                            transform: Transform::from_translation(center).with_rotation(lay_flat),
                            ..default()
                        },
                        FloorTile { column, row },
                    ));
                }
            }
        });

    info!(
        "floor: {}x{} tiles of {}",
        floor.columns, floor.rows, floor.tile_size
    );
}

fn spawn_walls(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GalleryConfig>,
    palette: Res<Palette>,
) {
    let walls = &config.walls;
    let mesh = meshes.add(Rectangle::new(walls.length, walls.height));
    let material = materials.add(unlit(palette.wall));

    for side in [Side::Left, Side::Right] {
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: Transform::from_xyz(side.sign() * walls.offset, walls.height / 2.0, 0.0)
                    .with_rotation(side.facing()),
                ..default()
            },
            Wall { side },
            Name::new(format!("{side:?} wall")),
        ));
    }
}

fn spawn_paintings(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    config: Res<GalleryConfig>,
) {
    let paintings = &config.paintings;
    let walls = &config.walls;
    if paintings.left.is_empty() && paintings.right.is_empty() {
        return;
    }
    let mesh = meshes.add(Rectangle::new(paintings.width, paintings.height));
    let x = walls.offset - paintings.inset;

    for (side, images) in [(Side::Left, &paintings.left), (Side::Right, &paintings.right)] {
        let slots = painting_slots(images.len(), walls.length);
        for (slot, (path, z)) in images.iter().zip(slots).enumerate() {
            let image: Handle<Image> = asset_server.load(path.clone());
            let material = materials.add(StandardMaterial {
                base_color_texture: Some(image.clone()),
                ..unlit(Color::WHITE)
            });
            commands.spawn((
                PbrBundle {
                    mesh: mesh.clone(),
                    material: material.clone(),
                    transform: Transform::from_xyz(side.sign() * x, walls.height / 2.0, z)
                        .with_rotation(side.facing()),
                    ..default()
                },
                Painting { side, slot },
                PendingTexture {
                    path: path.clone(),
                    image,
                    material,
                },
                Name::new(path.clone()),
            ));
        }
    }

    info!(
        "hung {} paintings on the left wall and {} on the right",
        paintings.left.len(),
        paintings.right.len()
    );
}

fn watch_painting_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q_pending: Query<(Entity, &Painting, &PendingTexture)>,
) {
    for (entity, painting, pending) in &q_pending {
        match asset_server.get_load_state(pending.image.id()) {
            Some(LoadState::Loaded) => {
                debug!("loaded painting texture {}", pending.path);
            }
            Some(LoadState::Failed(err)) => {
                error!(
                    "failed to load painting texture {} ({:?} wall, slot {}): {err}",
                    pending.path, painting.side, painting.slot
                );
                if let Some(material) = materials.get_mut(&pending.material) {
                    material.base_color_texture = None;
                }
            }
            _ => continue,
        }
        commands.entity(entity).remove::<PendingTexture>();
    }
}
