// Pipeline parser for the DSL

use super::aesthetics::{parse_aesthetics, parse_group_by};
use super::ast::{Aesthetics, Layer, PlotSpec};
use super::geom::parse_geom;
use super::lexer::ws;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, map, opt},
    error::{Error, ErrorKind},
    multi::separated_list0,
    IResult,
};

#[derive(Debug)]
enum PipelineComponent {
    Aes(Aesthetics),
    GroupBy(Vec<String>),
    Layer(Layer),
}

fn parse_pipeline_component(input: &str) -> IResult<&str, PipelineComponent> {
    alt((
        map(parse_aesthetics, PipelineComponent::Aes),
        map(parse_group_by, PipelineComponent::GroupBy),
        map(parse_geom, PipelineComponent::Layer),
    ))(input)
}

/// Parse a complete plot specification
/// Format: component | component | ...
pub fn parse_plot_spec(input: &str) -> IResult<&str, PlotSpec> {
    // Optional: consume leading "df"
    let (input, _) = opt(ws(tag("df")))(input)?;

    // If input starts with "|", consume it
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, components) = separated_list0(ws(tag("|")), parse_pipeline_component)(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    let mut spec = PlotSpec::default();
    for comp in components {
        match comp {
            PipelineComponent::Aes(a) => spec.aesthetics.merge(a),
            PipelineComponent::GroupBy(cols) => spec.group_by.extend(cols),
            PipelineComponent::Layer(l) => spec.layers.push(l),
        }
    }

    // Validation: Must have at least one layer
    if spec.layers.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Verify)));
    }

    Ok((input, spec))
}
