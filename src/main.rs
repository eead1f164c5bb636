use avian2d::prelude::*;
use bevy::prelude::*;

use unthread_locomotion::content::ContentPlugin;
use unthread_locomotion::movement::LocomotionPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Unthread".to_string(),
            resolution: (1280, 720).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Time::<Fixed>::from_hz(60.0))
    .add_plugins((ContentPlugin::default(), LocomotionPlugin));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(unthread_locomotion::movement::dev::SandboxPlugin);

    app.run();
}
