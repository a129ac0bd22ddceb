/// Key interactions used in `key_(press|down|up)()` in [super::Device]
///
/// Must include a [`Key`] to specify what you want to interact with
#[derive(Debug, Clone, Copy)]
pub(super) enum KeyEvent {
    /// Hold the key down
    Down,
    /// Release the key after a hold
    Up,
    /// Click the key once
    Press,
}

impl KeyEvent {
    /// Endpoint segment of the External Control Protocol request
    pub(super) fn endpoint(&self) -> &'static str {
        match self {
            Self::Down => "keydown",
            Self::Up => "keyup",
            Self::Press => "keypress",
        }
    }
}

/// Remote control keys you can send using [`Device::key_press()`](super::Device::key_press),
/// [`Device::key_down()`](super::Device::key_down), or [`Device::key_up()`](super::Device::key_up)
///
/// See the External Control Protocol's keypress key values for what each
/// key maps to on the device.
#[allow(unused)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Home screen
    Home,
    /// Rewind
    Rev,
    /// Fast forward
    Fwd,
    /// Play/Pause
    Play,
    /// Select (Ok)
    Select,
    /// Directional pad left
    Left,
    /// Directional pad right
    Right,
    /// Directional pad down
    Down,
    /// Directional pad up
    Up,
    /// Back
    Back,
    /// Replay the last few seconds
    InstantReplay,
    /// Info
    Info,
    /// The `*` key, same code as [`Info`](Self::Info)
    Star,
    /// Options, same code as [`Info`](Self::Info)
    Options,
    /// Backspace in a text field
    Backspace,
    /// Open search
    Search,
    /// Commit a text field
    Enter,
    /// Trigger the remote finder on devices that support it
    FindRemote,
    /// Volume down (Roku TV)
    VolumeDown,
    /// Volume up (Roku TV)
    VolumeUp,
    /// Mute (Roku TV)
    VolumeMute,
    /// Channel up (Roku TV tuner)
    ChannelUp,
    /// Channel down (Roku TV tuner)
    ChannelDown,
    /// Switch to the TV tuner input
    InputTuner,
    /// Switch to HDMI 1
    InputHdmi1,
    /// Switch to HDMI 2
    InputHdmi2,
    /// Switch to HDMI 3
    InputHdmi3,
    /// Switch to HDMI 4
    InputHdmi4,
    /// Switch to AV 1
    InputAv1,
    /// Toggle power (Roku TV)
    Power,
    /// Power off (Roku TV)
    PowerOff,
    /// Power on (Roku TV)
    PowerOn,
}

impl Key {
    /// The key value the device expects in the request path
    pub(super) fn code(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Rev => "Rev",
            Self::Fwd => "Fwd",
            Self::Play => "Play",
            Self::Select => "Select",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Down => "Down",
            Self::Up => "Up",
            Self::Back => "Back",
            Self::InstantReplay => "InstantReplay",
            Self::Info | Self::Star | Self::Options => "Info",
            Self::Backspace => "Backspace",
            Self::Search => "Search",
            Self::Enter => "Enter",
            Self::FindRemote => "FindRemote",
            Self::VolumeDown => "VolumeDown",
            Self::VolumeUp => "VolumeUp",
            Self::VolumeMute => "VolumeMute",
            Self::ChannelUp => "ChannelUp",
            Self::ChannelDown => "ChannelDown",
            Self::InputTuner => "InputTuner",
            Self::InputHdmi1 => "InputHDMI1",
            Self::InputHdmi2 => "InputHDMI2",
            Self::InputHdmi3 => "InputHDMI3",
            Self::InputHdmi4 => "InputHDMI4",
            Self::InputAv1 => "InputAV1",
            Self::Power => "Power",
            Self::PowerOff => "PowerOff",
            Self::PowerOn => "PowerOn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, KeyEvent};

    #[test]
    fn aliases_share_a_code() {
        assert_eq!(Key::Star.code(), "Info");
        assert_eq!(Key::Options.code(), "Info");
        assert_eq!(Key::Info.code(), "Info");
    }

    #[test]
    fn event_endpoints() {
        assert_eq!(KeyEvent::Press.endpoint(), "keypress");
        assert_eq!(KeyEvent::Down.endpoint(), "keydown");
        assert_eq!(KeyEvent::Up.endpoint(), "keyup");
    }
}
