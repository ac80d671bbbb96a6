//! Symbolic transition-matrix cell expressions.

use std::fmt;
use std::str::FromStr;

/// A single cell of a transition-matrix template.
///
/// Cells are resolved in one explicit pass: constants and parameter
/// references first, then each row's complement as one minus the sum of
/// the row's other cells.
#[derive(Debug, Clone, PartialEq)]
pub enum CellExpr {
    /// An explicit probability value.
    Constant(f64),
    /// A reference into the parameter store, resolved per
    /// (sample, stratum, time interval).
    ParameterRef(String),
    /// The remaining probability mass of the row.
    Complement,
}

impl FromStr for CellExpr {
    type Err = std::convert::Infallible;

    /// Parses a cell from its textual form.
    ///
    /// `"C"` (or `"complement"`) is the complement marker; anything that
    /// parses as a number is a constant; everything else is a parameter
    /// reference. Never fails: name validity is checked later against the
    /// parameter store.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "C" || trimmed.eq_ignore_ascii_case("complement") {
            return Ok(Self::Complement);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return Ok(Self::Constant(v));
        }
        Ok(Self::ParameterRef(trimmed.to_string()))
    }
}

impl fmt::Display for CellExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::ParameterRef(name) => write!(f, "{name}"),
            Self::Complement => write!(f, "C"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_complement_marker() {
        assert_eq!("C".parse::<CellExpr>().unwrap(), CellExpr::Complement);
        assert_eq!(
            "complement".parse::<CellExpr>().unwrap(),
            CellExpr::Complement
        );
        assert_eq!(" C ".parse::<CellExpr>().unwrap(), CellExpr::Complement);
    }

    #[test]
    fn parse_constant() {
        assert_eq!("0.25".parse::<CellExpr>().unwrap(), CellExpr::Constant(0.25));
        assert_eq!("0".parse::<CellExpr>().unwrap(), CellExpr::Constant(0.0));
        assert_eq!("1e-3".parse::<CellExpr>().unwrap(), CellExpr::Constant(0.001));
    }

    #[test]
    fn parse_parameter_ref() {
        assert_eq!(
            "p_sick_dead".parse::<CellExpr>().unwrap(),
            CellExpr::ParameterRef("p_sick_dead".to_string())
        );
    }

    #[test]
    fn display_round_trip() {
        for s in ["C", "p_healthy_sick"] {
            let expr: CellExpr = s.parse().unwrap();
            assert_eq!(expr.to_string(), s);
        }
    }
}
