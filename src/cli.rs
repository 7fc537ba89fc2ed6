use clap::Parser;

use crate::files::IMAGE_EXTENSIONS;

pub const HELP_KEYS: &str = "\
Key Bindings:
  Shift+H       : Toggle HUD
  e / r         : Rotate 90° left / right
  z / x         : Zoom out / in (25% - 300%)
  h j k l       : Pan left / down / up / right (hold, zoom > 100%)
  a             : Toggle antialiasing
  q             : Quit
";

#[derive(Parser)]
#[command(name = "liv", version, about = "A minimal image viewer", after_help = HELP_KEYS)]
pub struct Cli {
    /// Image file (png, bmp, tga, jpg, qoi) or directory to view
    pub path: Option<std::path::PathBuf>,
}

/// Printed to stdout when no path is given.
pub fn usage(program: &str) -> String {
    format!(
        "usage: {} <image>\n    where <image> format is {}\n",
        program,
        IMAGE_EXTENSIONS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_lists_formats() {
        assert_eq!(
            usage("liv"),
            "usage: liv <image>\n    where <image> format is png, bmp, tga, jpg, qoi\n"
        );
    }

    #[test]
    fn path_is_optional_positional() {
        let cli = Cli::try_parse_from(["liv"]).unwrap();
        assert!(cli.path.is_none());
        let cli = Cli::try_parse_from(["liv", "photo.png"]).unwrap();
        assert_eq!(cli.path.unwrap(), std::path::PathBuf::from("photo.png"));
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["liv", "a.png", "b.png"]).is_err());
    }
}
