//! Minimal TOML parser for cutter configuration
//!
//! Handles only the subset needed for `cutter.toml`. It does NOT support the
//! full TOML grammar.
//!
//! Supported:
//! - `[cutter]` and `[cutter.pwm]` section headers
//! - Key = value pairs (string, integer, float, boolean)
//! - Comments (# ...), including trailing comments
//!
//! The `kind` key selects the defaults every other key overrides, so it may
//! appear anywhere inside `[cutter]`.

use heapless::String;

use super::types::{ConfigError, CutterConfig, CutterKind, OutputKind, PowerUnit};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Cutter,
    Pwm,
}

/// Parse and validate a cutter configuration
pub fn parse_config(input: &str) -> Result<CutterConfig, ConfigError> {
    let kind = find_kind(input)?;
    let mut config = CutterConfig::for_kind(kind);
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ConfigError::Syntax { line: line_no });
            }
            section = parse_section_header(&line[1..line.len() - 1], line_no)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::Syntax { line: line_no })?;
        apply_value(section, key, value, line_no, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

/// First pass: find the tool kind so defaults can be chosen before overrides
fn find_kind(input: &str) -> Result<CutterKind, ConfigError> {
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let line = strip_comment(raw).trim();

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1], line_no)?;
            continue;
        }

        if section != Section::Cutter {
            continue;
        }

        if let Some(("kind", value)) = parse_key_value(line) {
            return match parse_string(value) {
                "spindle" => Ok(CutterKind::Spindle),
                "laser" => Ok(CutterKind::Laser),
                _ => Err(ConfigError::InvalidValue { line: line_no }),
            };
        }
    }

    Ok(CutterKind::default())
}

fn parse_section_header(header: &str, line: u16) -> Result<Section, ConfigError> {
    match header.trim() {
        "cutter" => Ok(Section::Cutter),
        "cutter.pwm" => Ok(Section::Pwm),
        _ => Err(ConfigError::UnknownSection { line }),
    }
}

/// Remove a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (pos, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..pos],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip quotes from a string value (unquoted strings are accepted)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_bool(value: &str, line: u16) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue { line }),
    }
}

/// Copy a numeric literal without TOML digit separators (`30_000`)
fn numeric_literal(value: &str, line: u16) -> Result<String<24>, ConfigError> {
    let mut digits = String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits
            .push(ch)
            .map_err(|_| ConfigError::InvalidValue { line })?;
    }
    Ok(digits)
}

fn parse_number(value: &str, line: u16) -> Result<f32, ConfigError> {
    numeric_literal(value, line)?
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidValue { line })
}

fn parse_u32(value: &str, line: u16) -> Result<u32, ConfigError> {
    numeric_literal(value, line)?
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue { line })
}

fn parse_unit(value: &str, line: u16) -> Result<PowerUnit, ConfigError> {
    match parse_string(value) {
        "pwm255" => Ok(PowerUnit::Pwm255),
        "percent" => Ok(PowerUnit::Percent),
        "rpm" => Ok(PowerUnit::Rpm),
        "servo" => Ok(PowerUnit::Servo),
        _ => Err(ConfigError::InvalidValue { line }),
    }
}

fn parse_output(value: &str, line: u16) -> Result<OutputKind, ConfigError> {
    match parse_string(value) {
        "pwm" => Ok(OutputKind::Pwm),
        "onoff" => Ok(OutputKind::OnOff),
        "servo" => Ok(OutputKind::Servo),
        _ => Err(ConfigError::InvalidValue { line }),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    line: u16,
    config: &mut CutterConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Root => return Err(ConfigError::UnknownKey { line }),
        Section::Cutter => match key {
            // Already resolved by find_kind
            "kind" => {}
            "unit" => config.unit = parse_unit(value, line)?,
            "output" => config.output = parse_output(value, line)?,
            "power_min" => config.speed_power_min = parse_number(value, line)?,
            "power_max" => config.speed_power_max = parse_number(value, line)?,
            "power_startup" => config.speed_power_startup = parse_number(value, line)?,
            "relative" => config.relative = parse_bool(value, line)?,
            "power_sync" => config.power_sync = parse_bool(value, line)?,
            "direction_control" => config.direction_control = parse_bool(value, line)?,
            "dynamic_full_power_feedrate" => {
                config.dynamic_full_power_feedrate = parse_number(value, line)?
            }
            _ => return Err(ConfigError::UnknownKey { line }),
        },
        Section::Pwm => match key {
            "frequency_hz" => config.pwm.frequency_hz = parse_u32(value, line)?,
            "inverted" => config.pwm.inverted = parse_bool(value, line)?,
            "enable_inverted" => config.pwm.enable_inverted = parse_bool(value, line)?,
            _ => return Err(ConfigError::UnknownKey { line }),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPINDLE_TOML: &str = r#"
# Router spindle on a 0-10V converter
[cutter]
kind = "spindle"
unit = "rpm"
power_min = 8_000
power_max = 24000    # VFD limit
power_startup = 18000
direction_control = true

[cutter.pwm]
frequency_hz = 1000
inverted = true
"#;

    #[test]
    fn test_parse_spindle() {
        let config = parse_config(SPINDLE_TOML).unwrap();

        assert_eq!(config.kind, CutterKind::Spindle);
        assert_eq!(config.unit, PowerUnit::Rpm);
        assert_eq!(config.speed_power_min, 8000.0);
        assert_eq!(config.speed_power_max, 24000.0);
        assert_eq!(config.speed_power_startup, 18000.0);
        assert!(config.direction_control);
        assert_eq!(config.pwm.frequency_hz, 1000);
        assert!(config.pwm.inverted);
        assert!(!config.pwm.enable_inverted);
    }

    #[test]
    fn test_kind_selects_defaults() {
        // Keys not given fall back to the kind's defaults
        let config = parse_config("[cutter]\nkind = \"spindle\"\n").unwrap();
        assert_eq!(config, CutterConfig::spindle());

        let config = parse_config("").unwrap();
        assert_eq!(config, CutterConfig::laser());
    }

    #[test]
    fn test_kind_after_other_keys() {
        let config = parse_config("[cutter]\npower_max = 20000\npower_startup = 15000\nkind = spindle\n").unwrap();
        assert_eq!(config.kind, CutterKind::Spindle);
        assert_eq!(config.speed_power_max, 20000.0);
        assert_eq!(config.speed_power_startup, 15000.0);
    }

    #[test]
    fn test_laser_power_sync_flag() {
        let config = parse_config("[cutter]\npower_sync = false\nunit = \"percent\"\n").unwrap();
        assert_eq!(config.kind, CutterKind::Laser);
        assert_eq!(config.unit, PowerUnit::Percent);
        assert!(!config.power_sync);
    }

    #[test]
    fn test_unknown_key() {
        let result = parse_config("[cutter]\nwattage = 10\n");
        assert_eq!(result, Err(ConfigError::UnknownKey { line: 2 }));
    }

    #[test]
    fn test_unknown_section() {
        let result = parse_config("[extruder]\n");
        assert_eq!(result, Err(ConfigError::UnknownSection { line: 1 }));
    }

    #[test]
    fn test_key_outside_section() {
        let result = parse_config("unit = \"rpm\"\n");
        assert_eq!(result, Err(ConfigError::UnknownKey { line: 1 }));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[cutter]\nrelative = yes\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[cutter]\nunit = \"watts\"\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[cutter]\nkind = \"plasma\"\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[cutter.pwm]\nfrequency_hz = -5\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            parse_config("[cutter\n"),
            Err(ConfigError::Syntax { line: 1 })
        );
        assert_eq!(
            parse_config("[cutter]\npower_max\n"),
            Err(ConfigError::Syntax { line: 2 })
        );
    }

    #[test]
    fn test_parsed_config_is_validated() {
        let result = parse_config("[cutter]\ndirection_control = true\n");
        assert_eq!(result, Err(ConfigError::DirectionOnLaser));

        let result = parse_config("[cutter]\noutput = \"servo\"\n");
        assert_eq!(result, Err(ConfigError::UnitOutputMismatch));
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        assert_eq!(strip_comment("unit = \"a#b\" # note"), "unit = \"a#b\" ");
    }
}
