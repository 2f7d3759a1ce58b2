mod camera;
mod config;
mod gallery;
mod input;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::{EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use camera::{CameraPlugin, ViewMode};
use clap::Parser;
use config::{GalleryConfig, Palette};
use gallery::GalleryPlugin;
use input::InputPlugin;
use ui::UiPlugin;

/// Walk through a tiled gallery hall.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// JSON file overriding the built-in room, camera and control settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the FPS and entity count window.
    #[arg(long)]
    show_diagnostics: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GalleryConfig::load(path)
            .with_context(|| format!("loading gallery config from {}", path.display()))?,
        None => GalleryConfig::default(),
    };
    config.show_diagnostics |= args.show_diagnostics;
    let palette = Palette::from_config(&config).context("resolving scene colors")?;
    let window = config.window.clone();

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Msaa::Sample4)
        .insert_resource(config)
        .insert_resource(palette)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(EntityCountDiagnosticsPlugin)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title,
                resolution: (window.width, window.height).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((CameraPlugin, InputPlugin, GalleryPlugin, UiPlugin))
        .add_systems(Startup, setup_camera);

    match &args.config {
        Some(path) => info!("gallery config loaded from {}", path.display()),
        None => info!("using built-in gallery config"),
    }

    app.run();
    Ok(())
}

fn setup_camera(mut commands: Commands, config: Res<GalleryConfig>) {
    let pose = ViewMode::default().pose(&config);
    commands.spawn((
        Camera3dBundle {
            projection: PerspectiveProjection {
                fov: config.camera.fov_degrees.to_radians(),
                near: config.camera.near,
                far: config.camera.far,
                ..default()
            }
            .into(),
            // Unlit materials keep their authored colors.
            tonemapping: Tonemapping::None,
            transform: pose.transform(),
            ..default()
        },
        pose.orientation,
        MainCamera,
    ));
}

#[derive(Component)]
pub struct MainCamera;
