//! Field definitions for per-node forms.
//!
//! A field is an editable value on a node (line edit, spin box, check box,
//! combo box). Each field has a unique name that doubles as its persistence
//! key, a kind describing its type and range, and a display label.

use crate::error::FormError;

/// Current value of a field.
///
/// Text and choice fields hold `Text`, numeric fields hold `Number`, boolean
/// fields hold `Bool`.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the number, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Type, range and default of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// Free text, single or multi-line.
    Text {
        default: String,
        placeholder: Option<String>,
        multiline: bool,
    },
    /// Bounded number. `integral` fields hold whole numbers only.
    Numeric {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
        integral: bool,
    },
    /// On/off toggle.
    Boolean { default: bool },
    /// One entry out of a fixed list of options.
    Choice { options: Vec<String>, default: String },
}

impl FieldKind {
    /// Name of the value type this kind holds, used in error messages.
    pub fn expected_type(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Numeric { integral: true, .. } => "integer",
            Self::Numeric { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::Choice { .. } => "choice",
        }
    }
}

/// Declaration of one field on a form.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    /// Unique name within the form, also the persistence key.
    pub name: String,
    /// Human-readable label. Defaults to the name.
    pub label: String,
    /// Type, range and default.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Creates a field spec; the label defaults to the name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
        }
    }

    /// Single-line text field.
    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                default: default.into(),
                placeholder: None,
                multiline: false,
            },
        )
    }

    /// Multi-line text field.
    pub fn text_area(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                default: default.into(),
                placeholder: None,
                multiline: true,
            },
        )
    }

    /// Integer field with a step of 1.
    ///
    /// Values are held as `f64`, so only integers within ±2^53 are exact.
    pub fn integer(name: impl Into<String>, min: i64, max: i64, default: i64) -> Self {
        let (min, max) = ordered(min as f64, max as f64);
        Self::new(
            name,
            FieldKind::Numeric {
                min,
                max,
                step: 1.0,
                default: default as f64,
                integral: true,
            },
        )
    }

    /// Floating-point field with a step of 0.01.
    pub fn float(name: impl Into<String>, min: f64, max: f64, default: f64) -> Self {
        let (min, max) = ordered(min, max);
        Self::new(
            name,
            FieldKind::Numeric {
                min,
                max,
                step: 0.01,
                default,
                integral: false,
            },
        )
    }

    /// Boolean field.
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, FieldKind::Boolean { default })
    }

    /// Choice field selecting the first option by default.
    pub fn choice<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let default = options.first().cloned().unwrap_or_default();
        Self::new(name, FieldKind::Choice { options, default })
    }

    /// Builder method to set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder method to set the placeholder of a text field.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        if let FieldKind::Text { placeholder, .. } = &mut self.kind {
            *placeholder = Some(text.into());
        }
        self
    }

    /// Builder method to set the step of a numeric field.
    pub fn with_step(mut self, value: f64) -> Self {
        if let FieldKind::Numeric { step, .. } = &mut self.kind {
            *step = value;
        }
        self
    }

    /// Builder method to change the default option of a choice field.
    ///
    /// Ignored if `option` is not one of the field's options.
    pub fn selecting(mut self, option: &str) -> Self {
        if let FieldKind::Choice { options, default } = &mut self.kind {
            if options.iter().any(|o| o == option) {
                *default = option.to_string();
            }
        }
        self
    }

    /// Value the field starts with. Numeric defaults are clamped into range.
    pub fn default_value(&self) -> FieldValue {
        match &self.kind {
            FieldKind::Text { default, .. } => FieldValue::Text(default.clone()),
            FieldKind::Numeric {
                min,
                max,
                default,
                integral,
                ..
            } => FieldValue::Number(fit_number(*default, *min, *max, *integral)),
            FieldKind::Boolean { default } => FieldValue::Bool(*default),
            FieldKind::Choice { default, .. } => FieldValue::Text(default.clone()),
        }
    }

    /// Checks `value` against this field and normalizes it.
    ///
    /// Numbers are clamped into `[min, max]` and rounded for integral fields.
    /// Choices must be one of the options or the field's own default, so an
    /// empty option list still accepts `""`.
    pub fn coerce(&self, value: FieldValue) -> Result<FieldValue, FormError> {
        match (&self.kind, value) {
            (FieldKind::Text { .. }, FieldValue::Text(text)) => Ok(FieldValue::Text(text)),
            (
                FieldKind::Numeric {
                    min, max, integral, ..
                },
                FieldValue::Number(number),
            ) if number.is_finite() => Ok(FieldValue::Number(fit_number(
                number, *min, *max, *integral,
            ))),
            (FieldKind::Boolean { .. }, FieldValue::Bool(flag)) => Ok(FieldValue::Bool(flag)),
            (FieldKind::Choice { options, default }, FieldValue::Text(text)) => {
                if options.contains(&text) || *default == text {
                    Ok(FieldValue::Text(text))
                } else {
                    Err(FormError::InvalidChoice {
                        field: self.name.clone(),
                        value: text,
                    })
                }
            }
            _ => Err(FormError::TypeMismatch {
                field: self.name.clone(),
                expected: self.kind.expected_type(),
            }),
        }
    }

    /// Canonical string form of `value` for snapshots.
    ///
    /// Booleans become `"True"`/`"False"`. Integral numbers are written without
    /// a fraction, other numbers always with one (`"1.0"`).
    pub fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Bool(true) => "True".to_string(),
            FieldValue::Bool(false) => "False".to_string(),
            FieldValue::Number(number) => {
                let integral = matches!(self.kind, FieldKind::Numeric { integral: true, .. });
                format_number(*number, integral)
            }
        }
    }

    /// Parses a snapshot string back into a value for this field.
    ///
    /// The result is already coerced. The error is a human-readable reason.
    pub fn parse(&self, raw: &str) -> Result<FieldValue, String> {
        let value = match &self.kind {
            FieldKind::Text { .. } | FieldKind::Choice { .. } => FieldValue::Text(raw.to_string()),
            FieldKind::Numeric { integral: true, .. } => raw
                .trim()
                .parse::<i64>()
                .map(|n| FieldValue::Number(n as f64))
                .map_err(|err| format!("not an integer: {err}"))?,
            FieldKind::Numeric { .. } => {
                let number = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|err| format!("not a number: {err}"))?;
                if !number.is_finite() {
                    return Err("not a finite number".to_string());
                }
                FieldValue::Number(number)
            }
            FieldKind::Boolean { .. } => FieldValue::Bool(parse_bool(raw)?),
        };
        self.coerce(value).map_err(|err| err.to_string())
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim() {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        other => Err(format!("not a boolean: '{other}'")),
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn fit_number(value: f64, min: f64, max: f64, integral: bool) -> f64 {
    if integral {
        value.round().max(min.ceil()).min(max.floor())
    } else {
        value.max(min).min(max)
    }
}

/// Locale-independent decimal formatting. Rust's float `Display` never uses
/// exponents and round-trips exactly.
fn format_number(value: f64, integral: bool) -> String {
    if integral {
        format!("{}", value.round() as i64)
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
