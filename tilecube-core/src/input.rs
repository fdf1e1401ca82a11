/// Mapping from key names to scene commands
use crate::geometry::Direction;
use crate::projection::ProjectionMode;

/// Camera axis adjusted by a rotation key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Pitch,
    Yaw,
    Roll,
}

/// A high-level command produced from one key press.
///
/// Front ends translate their native key events into the DOM
/// `KeyboardEvent.key` names understood by [`Command::from_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the cube to the next tile in a direction, creating one if needed
    Move(Direction),
    /// Turn the camera one step about an axis
    Rotate { axis: Axis, positive: bool },
    StartAnimation,
    StopAnimation,
    SetMode(ProjectionMode),
    /// Key without a binding
    Noop,
}

impl Command {
    pub fn from_key(key: &str) -> Self {
        match key {
            "ArrowLeft" => Command::Move(Direction::Left),
            "ArrowRight" => Command::Move(Direction::Right),
            "ArrowUp" => Command::Move(Direction::Up),
            "ArrowDown" => Command::Move(Direction::Down),
            "w" => Command::Rotate {
                axis: Axis::Pitch,
                positive: false,
            },
            "s" => Command::Rotate {
                axis: Axis::Pitch,
                positive: true,
            },
            "a" => Command::Rotate {
                axis: Axis::Yaw,
                positive: false,
            },
            "d" => Command::Rotate {
                axis: Axis::Yaw,
                positive: true,
            },
            "q" => Command::Rotate {
                axis: Axis::Roll,
                positive: false,
            },
            "e" => Command::Rotate {
                axis: Axis::Roll,
                positive: true,
            },
            "o" => Command::StartAnimation,
            "p" => Command::StopAnimation,
            "1" => Command::SetMode(ProjectionMode::Flat),
            "2" => Command::SetMode(ProjectionMode::Dimetric),
            "3" => Command::SetMode(ProjectionMode::Perspective),
            _ => Command::Noop,
        }
    }
}
