//! Input scripts replayed one simulation step per frame.
//!
//! A script is a whitespace-separated list of frames. Each frame is either a
//! set of held keys (`w`, `a`, `s`, `d` to move, `e` to interact, `.` for
//! nothing) or a pointer press `@x,y` in viewport pixels. Any frame may be
//! repeated with a `*count` suffix, e.g. `d*10 wd e @400,300`.

use std::{error::Error, fmt};

use glam::Vec2;
use isonav_core::HeldKeys;
use isonav_rendering::FrameInput;

const REPEAT_DELIMITER: char = '*';
const POINTER_PREFIX: char = '@';

/// Parses a script into per-frame inputs.
pub(crate) fn parse_script(source: &str) -> Result<Vec<FrameInput>, ScriptError> {
    let mut frames = Vec::new();
    for token in source.split_whitespace() {
        let (body, count) = split_repeat(token)?;
        let frame = parse_frame(body)?;
        frames.extend(std::iter::repeat(frame).take(count));
    }
    Ok(frames)
}

fn split_repeat(token: &str) -> Result<(&str, usize), ScriptError> {
    match token.split_once(REPEAT_DELIMITER) {
        Some((body, count)) => {
            let count = count
                .parse::<usize>()
                .map_err(|_| ScriptError::InvalidRepeat(token.to_owned()))?;
            Ok((body, count))
        }
        None => Ok((token, 1)),
    }
}

fn parse_frame(body: &str) -> Result<FrameInput, ScriptError> {
    if let Some(pointer) = body.strip_prefix(POINTER_PREFIX) {
        return parse_pointer(pointer).map(|pointer| FrameInput {
            keys: HeldKeys::default(),
            pointer: Some(pointer),
        });
    }

    if body.is_empty() {
        return Err(ScriptError::EmptyFrame);
    }

    let mut keys = HeldKeys::default();
    for key in body.chars() {
        match key.to_ascii_lowercase() {
            'w' => keys.up = true,
            'a' => keys.left = true,
            's' => keys.down = true,
            'd' => keys.right = true,
            'e' => keys.interact = true,
            '.' => {}
            other => return Err(ScriptError::UnknownKey(other)),
        }
    }
    Ok(FrameInput {
        keys,
        pointer: None,
    })
}

fn parse_pointer(value: &str) -> Result<Vec2, ScriptError> {
    let invalid = || ScriptError::InvalidPointer(value.to_owned());
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f32>().map_err(|_| invalid())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(invalid());
    }
    Ok(Vec2::new(x, y))
}

/// Errors that can occur while parsing input scripts.
#[derive(Debug, PartialEq)]
pub(crate) enum ScriptError {
    /// A frame contained no keys; use `.` for an idle frame.
    EmptyFrame,
    /// A frame referenced a key outside `w`, `a`, `s`, `d`, `e` and `.`.
    UnknownKey(char),
    /// A repeat suffix was not a non-negative integer.
    InvalidRepeat(String),
    /// A pointer press was not of the form `@x,y`.
    InvalidPointer(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrame => write!(f, "script frame is empty; use '.' to idle"),
            Self::UnknownKey(key) => write!(f, "script key '{key}' is not supported"),
            Self::InvalidRepeat(token) => {
                write!(f, "could not parse repeat count in '{token}'")
            }
            Self::InvalidPointer(pointer) => {
                write!(f, "could not parse pointer position '{pointer}'")
            }
        }
    }
}

impl Error for ScriptError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_key_frames_expand() {
        let frames = parse_script("d*3 e").expect("valid script");

        assert_eq!(frames.len(), 4);
        assert!(frames[..3].iter().all(|frame| frame.keys.right && !frame.keys.interact));
        assert!(frames[3].keys.interact);
    }

    #[test]
    fn combined_keys_hold_together() {
        let frames = parse_script("WD .").expect("valid script");

        let keys = frames[0].keys;
        assert!(keys.up && keys.right && !keys.down && !keys.left);
        assert_eq!(frames[1], FrameInput::default());
    }

    #[test]
    fn pointer_frames_carry_viewport_positions() {
        let frames = parse_script("@400,300*2").expect("valid script");

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].pointer, Some(Vec2::new(400.0, 300.0)));
        assert_eq!(frames[0].keys, HeldKeys::default());
    }

    #[test]
    fn malformed_frames_are_rejected() {
        assert_eq!(parse_script("wx"), Err(ScriptError::UnknownKey('x')));
        assert_eq!(
            parse_script("d*many"),
            Err(ScriptError::InvalidRepeat("d*many".to_owned()))
        );
        assert_eq!(
            parse_script("@12"),
            Err(ScriptError::InvalidPointer("12".to_owned()))
        );
        assert_eq!(parse_script("*4"), Err(ScriptError::EmptyFrame));
    }

    #[test]
    fn empty_script_has_no_frames() {
        assert_eq!(parse_script("  \n "), Ok(Vec::new()));
    }
}
