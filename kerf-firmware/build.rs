//! Build script for kerf-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates cutter.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const CUTTER_KEYS: &[&str] = &[
    "kind",
    "unit",
    "output",
    "power_min",
    "power_max",
    "power_startup",
    "relative",
    "power_sync",
    "direction_control",
    "dynamic_full_power_feedrate",
    "pwm",
];

const PWM_KEYS: &[&str] = &["frequency_hz", "inverted", "enable_inverted"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate cutter.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=cutter.toml");

    let config_path = Path::new("cutter.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: cutter.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a cutter.toml configuration file.         ║\n\
            ║  Please create one in the kerf-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read cutter.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in cutter.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = check_cutter(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid cutter configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=cutter.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn number(table: &toml::value::Table, key: &str) -> Option<f64> {
    match table.get(key) {
        Some(toml::Value::Integer(i)) => Some(*i as f64),
        Some(toml::Value::Float(f)) => Some(*f),
        _ => None,
    }
}

fn string<'a>(table: &'a toml::value::Table, key: &str) -> Option<&'a str> {
    table.get(key).and_then(|v| v.as_str())
}

fn check_choice(
    table: &toml::value::Table,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(value)) if allowed.contains(&value.as_str()) => {}
        Some(_) => errors.push(format!("[cutter] {} must be one of {}", key, allowed.join("/"))),
    }
}

/// Collect every problem in the [cutter] section
fn check_cutter(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for key in table.keys().filter(|k| k.as_str() != "cutter") {
            errors.push(format!("Unknown section [{}]", key));
        }
    }

    let cutter = match config.get("cutter") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[cutter] must be a table".to_string());
            return errors;
        }
        None => return errors,
    };

    for key in cutter.keys() {
        if !CUTTER_KEYS.contains(&key.as_str()) {
            errors.push(format!("[cutter] unknown key '{}'", key));
        }
    }

    check_choice(cutter, "kind", &["laser", "spindle"], &mut errors);
    check_choice(cutter, "unit", &["pwm255", "percent", "rpm", "servo"], &mut errors);
    check_choice(cutter, "output", &["pwm", "onoff", "servo"], &mut errors);

    for key in ["relative", "power_sync", "direction_control"] {
        if let Some(value) = cutter.get(key) {
            if !value.is_bool() {
                errors.push(format!("[cutter] {} must be true or false", key));
            }
        }
    }

    let laser = string(cutter, "kind").unwrap_or("laser") == "laser";
    let unit = string(cutter, "unit").unwrap_or(if laser { "pwm255" } else { "rpm" });
    let output = string(cutter, "output").unwrap_or("pwm");

    let (default_min, default_max) = if laser { (0.0, 100.0) } else { (5000.0, 30000.0) };
    let min = number(cutter, "power_min").unwrap_or(default_min);
    let max = number(cutter, "power_max").unwrap_or(default_max);
    if min < 0.0 || max <= min {
        errors.push(format!("[cutter] power range {}..{} is empty or negative", min, max));
    }
    if laser && max > 100.0 {
        errors.push("[cutter] laser power_max is a percentage (max 100)".to_string());
    }
    if let Some(startup) = number(cutter, "power_startup") {
        if startup < 0.0 || startup > max {
            errors.push(format!("[cutter] power_startup must be within 0..{}", max));
        }
    }

    if laser && unit == "rpm" {
        errors.push("[cutter] unit 'rpm' requires kind = \"spindle\"".to_string());
    }
    if laser && cutter.get("direction_control").and_then(|v| v.as_bool()) == Some(true) {
        errors.push("[cutter] direction_control is spindle only".to_string());
    }
    if (unit == "servo") != (output == "servo") {
        errors.push("[cutter] unit 'servo' and output 'servo' go together".to_string());
    }

    if let Some(feedrate) = number(cutter, "dynamic_full_power_feedrate") {
        if feedrate <= 0.0 {
            errors.push("[cutter] dynamic_full_power_feedrate must be positive".to_string());
        }
    }

    if let Some(pwm) = cutter.get("pwm").and_then(|v| v.as_table()) {
        for key in pwm.keys() {
            if !PWM_KEYS.contains(&key.as_str()) {
                errors.push(format!("[cutter.pwm] unknown key '{}'", key));
            }
        }
        match pwm.get("frequency_hz") {
            None => {}
            Some(toml::Value::Integer(hz)) if *hz > 0 && *hz <= 1_000_000 => {}
            Some(_) => errors.push("[cutter.pwm] frequency_hz must be 1-1000000".to_string()),
        }
    }

    errors
}
