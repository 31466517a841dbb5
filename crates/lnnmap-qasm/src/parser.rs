//! `nom`-based parser for the textual quantum-assembly format into an AST.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace1},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::ast::*;

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("//"), take_while(|c| c != '\n')))(input)
}

fn sp(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((value((), multispace1), comment))))(input)
}

fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

fn usize_literal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

fn float_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(pair(
                alt((char('e'), char('E'))),
                pair(opt(alt((char('+'), char('-')))), digit1),
            )),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

fn argument(input: &str) -> IResult<&str, Argument> {
    alt((
        map(
            pair(identifier, delimited(char('['), usize_literal, char(']'))),
            |(name, idx)| Argument::Indexed(name, idx),
        ),
        map(identifier, Argument::Id),
    ))(input)
}

fn version_decl(input: &str) -> IResult<&str, String> {
    delimited(
        tuple((tag("OPENQASM"), sp)),
        map(
            recognize(pair(digit1, pair(char('.'), digit1))),
            |s: &str| s.to_string(),
        ),
        tuple((sp, char(';'))),
    )(input)
}

fn qreg_decl(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            tag("qreg"),
            sp,
            identifier,
            sp,
            delimited(char('['), usize_literal, char(']')),
            sp,
            char(';'),
        )),
        |(_, _, name, _, size, _, _)| Statement::QRegDecl { name, size },
    )(input)
}

fn creg_decl(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            tag("creg"),
            sp,
            identifier,
            sp,
            delimited(char('['), usize_literal, char(']')),
            sp,
            char(';'),
        )),
        |(_, _, name, _, size, _, _)| Statement::CRegDecl { name, size },
    )(input)
}

fn gate_call(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            identifier,
            sp,
            opt(delimited(
                char('('),
                separated_list0(tuple((sp, char(','), sp)), float_literal),
                char(')'),
            )),
            sp,
            separated_list0(tuple((sp, char(','), sp)), argument),
            sp,
            char(';'),
        )),
        |(name, _, params, _, args, _, _)| Statement::GateCall {
            name,
            params: params.unwrap_or_default(),
            args,
        },
    )(input)
}

fn measure_stmt(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            tag("measure"),
            sp,
            argument,
            sp,
            tag("->"),
            sp,
            argument,
            sp,
            char(';'),
        )),
        |(_, _, qubit, _, _, _, target, _, _)| Statement::Measure { qubit, target },
    )(input)
}

fn barrier_stmt(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            tag("barrier"),
            sp,
            separated_list0(tuple((sp, char(','), sp)), argument),
            sp,
            char(';'),
        )),
        |(_, _, args, _, _)| Statement::Barrier { args },
    )(input)
}

fn statement(input: &str) -> IResult<&str, Statement> {
    preceded(
        sp,
        alt((qreg_decl, creg_decl, measure_stmt, barrier_stmt, gate_call)),
    )(input)
}

/// Parses a full program, returning `QasmError::ParseError` on any leftover
/// or malformed input.
pub fn parse_qasm_str(input: &str) -> crate::Result<Program> {
    let (input, version) = opt(preceded(sp, version_decl))(input)
        .map_err(|e| crate::QasmError::ParseError(e.to_string()))?;

    let (input, statements) =
        many0(statement)(input).map_err(|e| crate::QasmError::ParseError(e.to_string()))?;

    let input = sp(input).map(|(i, _)| i).unwrap_or(input);
    if !input.is_empty() {
        return Err(crate::QasmError::ParseError(format!(
            "unparsed input: {}",
            input
        )));
    }

    Ok(Program {
        version,
        statements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_registers_and_gates() {
        let src = "qreg q[3];\ncreg c[3];\ncx q[0],q[1];\nmeasure q[0] -> c[0];\n";
        let program = parse_qasm_str(src).unwrap();
        assert_eq!(program.statements.len(), 4);
        assert!(matches!(
            program.statements[0],
            Statement::QRegDecl { ref name, size } if name == "q" && size == 3
        ));
    }

    #[test]
    fn parses_rz_with_param() {
        let program = parse_qasm_str("qreg q[1];\nrz(1.5707963) q[0];\n").unwrap();
        match &program.statements[1] {
            Statement::GateCall { name, params, args } => {
                assert_eq!(name, "rz");
                assert_eq!(params.len(), 1);
                assert_eq!(args.len(), 1);
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn rejects_unparsed_trailing_input() {
        assert!(parse_qasm_str("qreg q[1];\n@@@").is_err());
    }
}
