use std::fmt;
use std::str::FromStr;

/// Visual style used to paint each dark module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Filled squares, slightly enlarged so adjacent modules tile without
    /// hairline seams.
    #[default]
    Square,
    /// Filled circles, leaving visible gaps between modules.
    Dots,
    /// Filled squares with rounded corners.
    Rounded,
}

impl RenderStyle {
    /// Name of the style, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Dots => "dots",
            Self::Rounded => "rounded",
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RenderStyle {
    type Err = ParseStyleError;

    /// # Example
    /// ```
    /// use qrink_core::RenderStyle;
    /// assert_eq!("dots".parse(), Ok(RenderStyle::Dots));
    /// assert!("plaid".parse::<RenderStyle>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let style = [Self::Square, Self::Dots, Self::Rounded]
            .into_iter()
            .find(|style| s.eq_ignore_ascii_case(style.name()));
        style.ok_or_else(|| ParseStyleError(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown render style '{0}', expected square, dots or rounded")]
pub struct ParseStyleError(String);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for style in [RenderStyle::Square, RenderStyle::Dots, RenderStyle::Rounded] {
            assert_eq!(style.name().parse::<RenderStyle>(), Ok(style));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Rounded".parse::<RenderStyle>(), Ok(RenderStyle::Rounded));
    }

    #[test]
    fn test_display_matches_name() {
        assert_eq!(RenderStyle::Dots.to_string(), "dots");
    }
}
