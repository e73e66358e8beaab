// Lexical helpers for the pipeline DSL

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, verify},
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it ignores surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Column name: a letter or underscore, then letters, digits or underscores
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        verify(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            |s: &str| s.chars().next().map_or(false, |c| c.is_alphabetic() || c == '_'),
        ),
        str::to_string,
    )(input)
}

/// Double-quoted string without escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        str::to_string,
    )(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("temp_1 rest"), Ok((" rest", "temp_1".to_string())));
        assert_eq!(identifier("température)"), Ok((")", "température".to_string())));
        assert!(identifier("1abc").is_err());
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal(r#""red" x"#), Ok((" x", "red".to_string())));
        assert!(string_literal(r#""unterminated"#).is_err());
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("2.5)"), Ok((")", 2.5)));
        assert_eq!(number_literal("-3"), Ok(("", -3.0)));
    }

    #[test]
    fn test_ws() {
        let mut p = ws(identifier);
        assert_eq!(p("  x  |"), Ok(("|", "x".to_string())));
    }
}
