//! Line-oriented session scripts.
//!
//! ```text
//! # comments and blank lines are ignored
//! click 100 100
//! pixel 412 398
//! down
//! tick
//! refuel 25
//! up
//! ```

use anyhow::{Context, Result};
use glam::Vec2;
use ocean_descent_core::CellCoord;
use thiserror::Error;

/// One player input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Input {
    /// Click on a play-grid cell.
    Click(CellCoord),
    /// Click at a window pixel.
    Pixel(Vec2),
    /// Dive one layer deeper.
    Descend,
    /// Climb one layer toward the surface.
    Ascend,
    /// Let the currents act once.
    Tick,
    /// Top up the fuel tank by the given amount.
    Refuel(f32),
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    #[error("unknown input `{0}`")]
    UnknownInput(String),
    #[error("`{input}` expects {expected} argument(s), got {received}")]
    ArgumentCount {
        input: &'static str,
        expected: usize,
        received: usize,
    },
    #[error("invalid argument `{value}` for `{input}`")]
    InvalidArgument { input: &'static str, value: String },
}

/// Parses a whole script, skipping comments and blank lines.
pub(crate) fn parse_script(contents: &str) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let parsed = parse_line(line).with_context(|| format!("script line {}", index + 1))?;
        inputs.extend(parsed);
    }
    Ok(inputs)
}

/// Parses one line. Returns `None` for blank lines and comments.
pub(crate) fn parse_line(line: &str) -> Result<Option<Input>, ScriptError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let arguments: Vec<&str> = words.collect();

    let input = match keyword {
        "click" => {
            let [column, row] = arguments_for::<2>("click", &arguments)?;
            Input::Click(CellCoord::new(
                number("click", column)?,
                number("click", row)?,
            ))
        }
        "pixel" => {
            let [x, y] = arguments_for::<2>("pixel", &arguments)?;
            Input::Pixel(Vec2::new(number("pixel", x)?, number("pixel", y)?))
        }
        "down" => {
            let [] = arguments_for::<0>("down", &arguments)?;
            Input::Descend
        }
        "up" => {
            let [] = arguments_for::<0>("up", &arguments)?;
            Input::Ascend
        }
        "tick" => {
            let [] = arguments_for::<0>("tick", &arguments)?;
            Input::Tick
        }
        "refuel" => {
            let [amount] = arguments_for::<1>("refuel", &arguments)?;
            Input::Refuel(number("refuel", amount)?)
        }
        other => return Err(ScriptError::UnknownInput(other.to_owned())),
    };
    Ok(Some(input))
}

fn arguments_for<'a, const N: usize>(
    input: &'static str,
    arguments: &[&'a str],
) -> Result<[&'a str; N], ScriptError> {
    <[&str; N]>::try_from(arguments).map_err(|_| ScriptError::ArgumentCount {
        input,
        expected: N,
        received: arguments.len(),
    })
}

fn number<T: std::str::FromStr>(input: &'static str, value: &str) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidArgument {
        input,
        value: value.to_owned(),
    })
}
