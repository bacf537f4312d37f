//! Generates the logging macros into `$OUT_DIR/logger.rs`.
//!
//! Each level becomes a `#[macro_export]` macro with two arms: a bare message and a
//! format string with arguments. Levels marked as gated only print when the *calling*
//! crate enables its `debug` feature.

use itertools::Itertools;
use std::{env, fs, path::Path};

struct Level {
    name: &'static str,
    label: &'static str,
    label_colour: u8,
    text_colour: u8,
    gated: bool,
}

const LEVELS: &[Level] = &[
    Level {
        name: "trace",
        label: "TRACE",
        label_colour: 240,
        text_colour: 240,
        gated: true,
    },
    Level {
        name: "debug",
        label: "DEBUG",
        label_colour: 245,
        text_colour: 245,
        gated: true,
    },
    Level {
        name: "info",
        label: "INFO ",
        label_colour: 15,
        text_colour: 7,
        gated: true,
    },
    Level {
        name: "warn",
        label: "WARN ",
        label_colour: 11,
        text_colour: 228,
        gated: false,
    },
    Level {
        name: "error",
        label: "ERROR",
        label_colour: 9,
        text_colour: 160,
        gated: false,
    },
];

fn render(level: &Level) -> String {
    let gate = if level.gated {
        "#[cfg(feature=\"debug\")]\n        "
    } else {
        ""
    };
    let prefix = format!(
        "\\x1b[1m\\x1b[38:5:{lc}m{label}\\x1b[39m | \\x1b[22m\\x1b[38:5:{tc}m[pid {{}}] ",
        lc = level.label_colour,
        label = level.label,
        tc = level.text_colour,
    );

    format!(
        r#"#[macro_export]
macro_rules! {name} {{
    ($base:tt) => {{{{
        {gate}eprintln!("{prefix}{{}}\x1b[39m", ::std::process::id(), $base);
    }}}};
    ($base:tt, $($arg:tt)*) => {{{{
        {gate}eprintln!(concat!("{prefix}", $base, "\x1b[39m"), ::std::process::id(), $($arg)*);
    }}}};
}}
"#,
        name = level.name,
    )
}

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is always set for build scripts");
    let dest = Path::new(&out_dir).join("logger.rs");

    // `#[macro_export]` already places every macro at the root of the crate.
    let macros = LEVELS.iter().map(render).join("\n");

    fs::write(&dest, macros).expect("Unable to write logger.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
