//! Abstract syntax tree for the textual quantum-assembly format (§6).

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub version: Option<String>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    QRegDecl { name: String, size: usize },
    CRegDecl { name: String, size: usize },
    GateCall {
        name: String,
        params: Vec<f64>,
        args: Vec<Argument>,
    },
    Measure { qubit: Argument, target: Argument },
    Barrier { args: Vec<Argument> },
}

/// A register reference, either bare (`q`) or indexed (`q[3]`).
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Id(String),
    Indexed(String, usize),
}
