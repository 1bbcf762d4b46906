//! Number format types

/// Number format for cell display
///
/// Only the parts needed to recognise date cells on read, and to write date
/// cells back out, are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 22 - m/d/yy h:mm
    pub const ID_DATETIME: u32 = 22;

    /// Create a number format from a format string
    pub fn from_string<S: Into<String>>(format: S) -> Self {
        NumberFormat::Custom(format.into())
    }

    /// Create a built-in format by ID
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => NumberFormat::General,
            id => NumberFormat::BuiltIn(id),
        }
    }

    /// Short date (mm-dd-yy)
    pub fn date_short() -> Self {
        NumberFormat::BuiltIn(Self::ID_DATE_SHORT)
    }

    /// Date and time (m/d/yy h:mm)
    pub fn datetime() -> Self {
        NumberFormat::BuiltIn(Self::ID_DATETIME)
    }

    /// Check if this is a date/time format
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 14..=22 | 45..=47),
            NumberFormat::Custom(s) => is_date_pattern(s),
            NumberFormat::General => false,
        }
    }
}

/// Looks for date/time placeholders outside of quoted literals, escapes and
/// bracketed sections (`[Red]`, `[$-409]`, ...). Elapsed-time brackets like
/// `[h]` count as time.
fn is_date_pattern(code: &str) -> bool {
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&b| b != ']').collect();
                let inner = inner.to_ascii_lowercase();
                if !inner.is_empty() && inner.chars().all(|b| matches!(b, 'h' | 'm' | 's')) {
                    return true;
                }
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dates() {
        assert!(NumberFormat::date_short().is_date_format());
        assert!(NumberFormat::from_id(22).is_date_format());
        assert!(NumberFormat::from_id(46).is_date_format());
        assert!(!NumberFormat::from_id(2).is_date_format());
        assert!(!NumberFormat::from_id(0).is_date_format());
    }

    #[test]
    fn test_custom_dates() {
        assert!(NumberFormat::from_string("yyyy-mm-dd").is_date_format());
        assert!(NumberFormat::from_string("[h]:mm").is_date_format());
        assert!(NumberFormat::from_string("[$-409]d-mmm-yy").is_date_format());
        assert!(!NumberFormat::from_string("#,##0.00").is_date_format());
        assert!(!NumberFormat::from_string("[Red]0.00").is_date_format());
        assert!(!NumberFormat::from_string("0.0\" days\"").is_date_format());
    }
}
