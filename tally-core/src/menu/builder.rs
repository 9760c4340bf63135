//! Device settings menu

use heapless::{String, Vec};

use super::tree::{MenuAction, MenuError, MenuTree, MAX_OPTIONS};
use crate::config::{
    DeviceConfig, Mode, Settings, BRIGHTNESS_LEVELS, FIRMWARE_VERSION, MAX_LABEL_LEN,
};

/// Audio choice index for "On"
pub const AUDIO_ON: usize = 0;

/// Audio choice index for "Off"
pub const AUDIO_OFF: usize = 1;

/// Build the settings menu
///
/// ```text
/// Menu
/// ├── Mode        Host | Camera 1..N
/// ├── Audio       On | Off
/// ├── Brightness  1..5
/// ├── Address     device identity
/// └── Version     firmware version
/// ```
pub fn build_device_menu(config: &DeviceConfig, settings: &Settings) -> Result<MenuTree, MenuError> {
    let mut tree = MenuTree::new("Menu");
    let root = tree.root();

    let mut mode_labels: Vec<String<MAX_LABEL_LEN>, MAX_OPTIONS> = Vec::new();
    for index in 0..=config.fleet.count() {
        if let Some(mode) = Mode::from_index(index, config.fleet) {
            mode_labels.push(mode.label()).map_err(|_| MenuError::Full)?;
        }
    }
    let mut mode_options: Vec<&str, MAX_OPTIONS> = Vec::new();
    for label in &mode_labels {
        mode_options.push(label.as_str()).map_err(|_| MenuError::Full)?;
    }
    let mode = tree.create_node("Mode")?;
    tree.set_choice(mode, &mode_options, settings.mode.index() as usize)?;
    tree.set_action(mode, MenuAction::SetMode)?;
    tree.add_child(root, mode)?;

    let audio = tree.create_node("Audio")?;
    let audio_selected = if settings.audio_enabled { AUDIO_ON } else { AUDIO_OFF };
    tree.set_choice(audio, &["On", "Off"], audio_selected)?;
    tree.set_action(audio, MenuAction::SetAudio)?;
    tree.add_child(root, audio)?;

    const BRIGHTNESS_OPTIONS: [&str; BRIGHTNESS_LEVELS as usize] = ["1", "2", "3", "4", "5"];
    let brightness = tree.create_node("Brightness")?;
    tree.set_choice(brightness, &BRIGHTNESS_OPTIONS, settings.brightness as usize)?;
    tree.set_action(brightness, MenuAction::SetBrightness)?;
    tree.add_child(root, brightness)?;

    let address = tree.create_node("Address")?;
    tree.set_description(address, &config.identity)?;
    tree.add_child(root, address)?;

    let version = tree.create_node("Version")?;
    tree.set_description(version, FIRMWARE_VERSION)?;
    tree.add_child(root, version)?;

    Ok(tree)
}
