//! Writing resolved icons into the generated theme.

pub mod fanout;
pub mod install;
pub mod residual;
pub mod theme;

pub use fanout::{decode_rgba, write_fan_out, write_png};
pub use install::{default_install_base, install_theme};
pub use residual::collect_residual_icons;
pub use theme::{ThemeLayout, parse_inherits, sanitize_theme_name};
