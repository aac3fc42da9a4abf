use std::fmt;
use std::str::FromStr;

use crate::animation::Mode;
use crate::foundation::core::Point;
use crate::foundation::error::BoatError;
use crate::installation::BrightnessStep;

/// External request applied between ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Switch mode by identifier; unknown identifiers fall back to the default mode.
    SetMode(String),
    Brightness(BrightnessStep),
    /// Debug toggle at a preview-space coordinate.
    Toggle(Point),
    Shutdown,
}

impl FromStr for Command {
    type Err = BoatError;

    /// Parse one console line.
    ///
    /// Accepts `mode <name>` or a bare mode name, `+`/`brighter`, `-`/`dimmer`,
    /// `click <x> <y>` and `quit`/`exit`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(BoatError::command("empty command"));
        };
        let cmd = match head.to_ascii_lowercase().as_str() {
            "mode" => match words.next() {
                Some(name) => Command::SetMode(name.to_string()),
                None => return Err(BoatError::command("`mode` needs a mode name")),
            },
            "+" | "brighter" => Command::Brightness(BrightnessStep::Up),
            "-" | "dimmer" => Command::Brightness(BrightnessStep::Down),
            "click" => {
                let mut coord = || -> Result<f64, BoatError> {
                    let word = words
                        .next()
                        .ok_or_else(|| BoatError::command("`click` needs x and y"))?;
                    word.parse()
                        .map_err(|_| BoatError::command(format!("bad coordinate '{word}'")))
                };
                let x = coord()?;
                let y = coord()?;
                Command::Toggle(Point::new(x, y))
            }
            "quit" | "exit" => Command::Shutdown,
            word => match Mode::from_name(word) {
                Some(mode) => Command::SetMode(mode.name().to_string()),
                None => return Err(BoatError::command(format!("unknown command '{head}'"))),
            },
        };
        if words.next().is_some() {
            return Err(BoatError::command(format!("trailing input in '{}'", line.trim())));
        }
        Ok(cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetMode(name) => write!(f, "mode {name}"),
            Command::Brightness(BrightnessStep::Up) => f.write_str("brighter"),
            Command::Brightness(BrightnessStep::Down) => f.write_str("dimmer"),
            Command::Toggle(pt) => write!(f, "click {} {}", pt.x, pt.y),
            Command::Shutdown => f.write_str("quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Command {
        s.parse().unwrap()
    }

    #[test]
    fn mode_lines() {
        assert_eq!(parse("mode america"), Command::SetMode("america".into()));
        assert_eq!(parse("  disco "), Command::SetMode("disco".into()));
        // Unknown names are passed through so the state machine can fall back.
        assert_eq!(parse("mode warp"), Command::SetMode("warp".into()));
    }

    #[test]
    fn brightness_and_shutdown() {
        assert_eq!(parse("+"), Command::Brightness(BrightnessStep::Up));
        assert_eq!(parse("Dimmer"), Command::Brightness(BrightnessStep::Down));
        assert_eq!(parse("quit"), Command::Shutdown);
        assert_eq!(parse("exit"), Command::Shutdown);
    }

    #[test]
    fn click_needs_two_numbers() {
        assert_eq!(parse("click 12 40.5"), Command::Toggle(Point::new(12.0, 40.5)));
        assert!("click 12".parse::<Command>().is_err());
        assert!("click a b".parse::<Command>().is_err());
    }

    #[test]
    fn junk_is_a_command_error() {
        for line in ["", "   ", "warp", "mode", "quit now"] {
            let err = line.parse::<Command>().unwrap_err();
            assert!(matches!(err, BoatError::Command(_)), "{line:?}");
        }
    }

    #[test]
    fn display_parses_back() {
        for cmd in [
            Command::SetMode("slow".into()),
            Command::Brightness(BrightnessStep::Down),
            Command::Toggle(Point::new(3.0, 4.0)),
            Command::Shutdown,
        ] {
            assert_eq!(parse(&cmd.to_string()), cmd);
        }
    }
}
