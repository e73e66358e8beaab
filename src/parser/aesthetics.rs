// Aesthetics parser for the pipeline DSL

use super::ast::{AestheticValue, Aesthetics};
use super::lexer::{identifier, number_literal, string_literal, ws};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, separated_pair},
    IResult,
};

/// Parse an aesthetic value: "literal", column, or number
pub fn parse_aesthetic_value(input: &str) -> IResult<&str, AestheticValue> {
    alt((
        map(string_literal, AestheticValue::Text),
        map(identifier, AestheticValue::Mapped),
        map(number_literal, AestheticValue::Number),
    ))(input)
}

fn parse_property(input: &str) -> IResult<&str, &str> {
    alt((tag("x"), tag("y"), tag("color"), tag("fill")))(input)
}

/// Parse aesthetics specification
/// Format: aes(x: col, y: col, color: col, fill: "blue")
pub fn parse_aesthetics(input: &str) -> IResult<&str, Aesthetics> {
    let (input, _) = ws(tag("aes"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list1(
        ws(char(',')),
        separated_pair(ws(parse_property), char(':'), ws(parse_aesthetic_value)),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut aes = Aesthetics::default();
    for (key, value) in args {
        match key {
            "x" => aes.x = Some(value),
            "y" => aes.y = Some(value),
            "color" => aes.color = Some(value),
            "fill" => aes.fill = Some(value),
            _ => {}
        }
    }

    Ok((input, aes))
}

/// Parse a grouping specification
/// Format: group_by(col) or group_by(col, col)
pub fn parse_group_by(input: &str) -> IResult<&str, Vec<String>> {
    let (input, _) = ws(tag("group_by"))(input)?;
    delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), ws(identifier)),
        ws(char(')')),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aesthetics() {
        let (_, aes) = parse_aesthetics("aes(x: time, y: temp)").unwrap();
        assert_eq!(aes.x, Some(AestheticValue::Mapped("time".to_string())));
        assert_eq!(aes.y, Some(AestheticValue::Mapped("temp".to_string())));
        assert_eq!(aes.color, None);
    }

    #[test]
    fn test_parse_aesthetics_with_constants() {
        let (_, aes) = parse_aesthetics(r#"aes(x: 3, y: v, color: "red", fill: grp)"#).unwrap();
        assert_eq!(aes.x, Some(AestheticValue::Number(3.0)));
        assert_eq!(aes.color, Some(AestheticValue::Text("red".to_string())));
        assert_eq!(aes.fill, Some(AestheticValue::Mapped("grp".to_string())));
    }

    #[test]
    fn test_parse_aesthetics_with_whitespace() {
        let (_, aes) = parse_aesthetics("  aes( x : time , y: temp )  ").unwrap();
        assert_eq!(aes.x, Some(AestheticValue::Mapped("time".to_string())));
    }

    #[test]
    fn test_parse_aesthetics_partial() {
        // Required properties are checked by the layers, not the parser
        let (_, aes) = parse_aesthetics("aes(y: temp)").unwrap();
        assert_eq!(aes.x, None);
    }

    #[test]
    fn test_parse_aesthetics_empty() {
        assert!(parse_aesthetics("aes()").is_err());
    }

    #[test]
    fn test_parse_aesthetics_missing_comma() {
        assert!(parse_aesthetics("aes(x: time y: temp)").is_err());
    }

    #[test]
    fn test_parse_aesthetics_unclosed_paren() {
        assert!(parse_aesthetics("aes(x: time, y: temp").is_err());
    }

    #[test]
    fn test_parse_group_by() {
        let (_, cols) = parse_group_by("group_by(region, site)").unwrap();
        assert_eq!(cols, vec!["region".to_string(), "site".to_string()]);
        assert!(parse_group_by("group_by()").is_err());
    }
}
