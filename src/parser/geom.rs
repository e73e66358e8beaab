// Geometry (geom) parser for the pipeline DSL

use super::ast::Layer;
use super::lexer::ws;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::value,
    sequence::pair,
    IResult,
};

/// Parse a lines geometry
/// Format: lines() or line()
pub fn parse_lines(input: &str) -> IResult<&str, Layer> {
    let (input, _) = ws(alt((tag("lines"), tag("line"))))(input)?;
    value(Layer::Lines, pair(ws(char('(')), ws(char(')'))))(input)
}

/// Parse a paths geometry
/// Format: paths() or path()
pub fn parse_paths(input: &str) -> IResult<&str, Layer> {
    let (input, _) = ws(alt((tag("paths"), tag("path"))))(input)?;
    value(Layer::Paths, pair(ws(char('(')), ws(char(')'))))(input)
}

pub fn parse_geom(input: &str) -> IResult<&str, Layer> {
    alt((parse_lines, parse_paths))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(parse_geom("lines()"), Ok(("", Layer::Lines)));
        assert_eq!(parse_geom("line( )"), Ok(("", Layer::Lines)));
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(parse_geom(" paths() "), Ok(("", Layer::Paths)));
        assert_eq!(parse_geom("path()"), Ok(("", Layer::Paths)));
    }

    #[test]
    fn test_parse_geom_requires_parens() {
        assert!(parse_geom("lines").is_err());
        assert!(parse_geom("point()").is_err());
    }
}
