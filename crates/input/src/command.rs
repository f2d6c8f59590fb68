use glam::Vec3;

/// A held fly-camera command. Active for as long as its key is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Forward,
        Command::Back,
        Command::Left,
        Command::Right,
        Command::Up,
        Command::Down,
        Command::PitchUp,
        Command::PitchDown,
        Command::YawLeft,
        Command::YawRight,
        Command::RollLeft,
        Command::RollRight,
    ];

    /// True for translation commands, false for rotation commands.
    pub fn is_translation(self) -> bool {
        matches!(
            self,
            Command::Forward
                | Command::Back
                | Command::Left
                | Command::Right
                | Command::Up
                | Command::Down
        )
    }

    /// Camera-local axis this command moves along (translation) or turns
    /// about (rotation), signed for direction.
    pub fn local_axis(self) -> Vec3 {
        match self {
            Command::Forward => Vec3::NEG_Z,
            Command::Back => Vec3::Z,
            Command::Left => Vec3::NEG_X,
            Command::Right => Vec3::X,
            Command::Up => Vec3::Y,
            Command::Down => Vec3::NEG_Y,
            Command::PitchUp => Vec3::X,
            Command::PitchDown => Vec3::NEG_X,
            Command::YawLeft => Vec3::Y,
            Command::YawRight => Vec3::NEG_Y,
            Command::RollLeft => Vec3::Z,
            Command::RollRight => Vec3::NEG_Z,
        }
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of commands active this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CommandSet(u16);

impl CommandSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, command: Command) {
        self.0 |= command.bit();
    }

    pub fn remove(&mut self, command: Command) {
        self.0 &= !command.bit();
    }

    pub fn contains(&self, command: Command) -> bool {
        self.0 & command.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Active commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        Command::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Command> for CommandSet {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut set = Self::empty();
        for command in iter {
            set.insert(command);
        }
        set
    }
}
