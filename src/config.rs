//! Formatting configuration
//!
//! Controls how parameter values are rendered for humans: the float
//! notation, the number of decimals, when long arrays are abbreviated, and
//! how a rendered value is padded to a requested width.

use serde::{Deserialize, Serialize};

/// Notation used when formatting a float for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FloatFormat {
    /// `%g` style: fixed or scientific, whichever is shorter, trailing zeros trimmed.
    #[default]
    General,
    /// `%e` style.
    Scientific,
    /// `%f` style.
    Fixed,
}

/// Alignment used when a formatted value is padded to a width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Justify {
    Left,
    #[default]
    Right,
    Center,
}

/// Display settings for parameter values.
///
/// # Examples
///
/// ```
/// use modelparams_rs::config::FormatConfig;
///
/// let config = FormatConfig::default();
/// assert_eq!(config.format_float(0.000123456), "0.00012");
/// assert_eq!(config.format_float(1234567.0), "1.2e+06");
/// assert_eq!(config.justify("45", 5), "   45");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Float notation
    pub float_format: FloatFormat,

    /// Significant digits (general) or decimals (fixed, scientific)
    pub num_decimals: usize,

    /// Arrays longer than this are shown as first two, ellipsis, last two
    pub abbreviate_after: usize,

    /// Padding alignment
    pub justify: Justify,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            float_format: FloatFormat::General,
            num_decimals: 2,
            abbreviate_after: 4,
            justify: Justify::Right,
        }
    }
}

impl FormatConfig {
    /// Format a float according to the configured notation.
    pub fn format_float(&self, value: f64) -> String {
        if value.is_nan() {
            return "nan".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }
        match self.float_format {
            FloatFormat::General => format_general(value, self.num_decimals),
            FloatFormat::Scientific => format_scientific(value, self.num_decimals),
            FloatFormat::Fixed => format!("{:.*}", self.num_decimals, value),
        }
    }

    /// Pad `text` to `width` characters using the configured alignment.
    pub fn justify(&self, text: &str, width: usize) -> String {
        match self.justify {
            Justify::Left => format!("{:<width$}", text),
            Justify::Right => format!("{:>width$}", text),
            Justify::Center => format!("{:^width$}", text),
        }
    }
}

/// `%.{precision}g`
pub(crate) fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exponent < -4 || exponent >= precision as i32 {
        format!(
            "{}e{}{:02}",
            trim_zeros(&mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value))
    }
}

/// `%.{precision}e`
fn format_scientific(value: f64, precision: usize) -> String {
    let sci = format!("{:.*e}", precision, value);
    match sci.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent = exponent.parse::<i32>().unwrap_or(0);
            format!(
                "{}e{}{:02}",
                mantissa,
                if exponent < 0 { '-' } else { '+' },
                exponent.abs()
            )
        }
        None => sci,
    }
}

fn trim_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
