//! Named-command boundary over a [`Session`].
//!
//! Node and group indices crossing this boundary are 1-based and are
//! converted exactly once, here. Sparse column arguments use compressed
//! storage, whose row indices are 0-based offsets by construction. `move`
//! takes exactly one column; `reduce` also takes a packed matrix and adds
//! all of its columns.

use crate::column::{CscMatrix, OwnedColumn};
use crate::error::{Error, Result};
use crate::mover::MoveStrategy;
use crate::session::Session;

/// An argument as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Text(String),
    Vector(Vec<f64>),
    Sparse(CscMatrix),
}

/// A parsed, arity- and type-checked command with 0-based indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Assign(Vec<u64>),
    Move {
        strategy: MoveStrategy,
        node: usize,
        column: OwnedColumn,
    },
    Reduce(Vec<OwnedColumn>),
    Flush,
    Return,
    NodesOfGroup(u32),
}

/// Result of a command, with 1-based labels and node indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Empty,
    Scalar(f64),
    Labels(Vec<u64>),
    Column(OwnedColumn),
    Nodes(Vec<u64>),
}

fn take_args<const N: usize>(command: &'static str, args: Vec<Value>) -> Result<[Value; N]> {
    args.try_into().map_err(|args: Vec<Value>| Error::Arity {
        command,
        expected: N,
        found: args.len(),
    })
}

fn positive_integer(x: f64) -> Option<u64> {
    if x.is_finite() && x >= 1.0 && x.fract() == 0.0 && x <= u64::MAX as f64 {
        Some(x as u64)
    } else {
        None
    }
}

fn index_arg(value: &Value, argument: &'static str) -> Result<usize> {
    let mismatch = Error::TypeMismatch {
        argument,
        expected: "a positive integer index",
    };
    match value {
        Value::Scalar(x) => positive_integer(*x)
            .map(|one_based| (one_based - 1) as usize)
            .ok_or(mismatch),
        _ => Err(mismatch),
    }
}

fn labels_arg(value: &Value) -> Result<Vec<u64>> {
    let values: &[f64] = match value {
        Value::Vector(v) => v,
        Value::Scalar(x) => std::slice::from_ref(x),
        _ => {
            return Err(Error::TypeMismatch {
                argument: "labels",
                expected: "a numeric vector",
            })
        }
    };
    values
        .iter()
        .enumerate()
        .map(|(position, &x)| positive_integer(x).ok_or(Error::InvalidLabel { position }))
        .collect()
}

fn column_mismatch() -> Error {
    Error::TypeMismatch {
        argument: "column",
        expected: "a dense or sparse numeric column",
    }
}

fn column_arg(value: Value) -> Result<OwnedColumn> {
    match value {
        Value::Vector(v) => Ok(OwnedColumn::Dense(v)),
        Value::Sparse(m) => {
            if m.n_cols() != 1 {
                return Err(Error::ColumnCount {
                    expected: 1,
                    found: m.n_cols(),
                });
            }
            m.column_owned(0)
        }
        _ => Err(column_mismatch()),
    }
}

fn columns_arg(value: Value) -> Result<Vec<OwnedColumn>> {
    match value {
        Value::Vector(v) => Ok(vec![OwnedColumn::Dense(v)]),
        Value::Sparse(m) => (0..m.n_cols()).map(|j| m.column_owned(j)).collect(),
        _ => Err(column_mismatch()),
    }
}

fn strategy_for(handle: &str) -> Option<(&'static str, MoveStrategy)> {
    match handle {
        "move" => Some(("move", MoveStrategy::MaxGain)),
        "moverand" | "move-random-uniform" => Some(("moverand", MoveStrategy::UniformImproving)),
        "moverandw" | "move-random-weighted" => {
            Some(("moverandw", MoveStrategy::WeightedImproving))
        }
        _ => None,
    }
}

impl Command {
    pub fn parse(handle: &str, args: Vec<Value>) -> Result<Command> {
        if let Some((name, strategy)) = strategy_for(handle) {
            let [node, column] = take_args(name, args)?;
            return Ok(Command::Move {
                strategy,
                node: index_arg(&node, "node")?,
                column: column_arg(column)?,
            });
        }

        match handle {
            "assign" => {
                let [labels] = take_args("assign", args)?;
                Ok(Command::Assign(labels_arg(&labels)?))
            }
            "reduce" => {
                let [column] = take_args("reduce", args)?;
                Ok(Command::Reduce(columns_arg(column)?))
            }
            "flush" => {
                take_args::<0>("flush", args)?;
                Ok(Command::Flush)
            }
            "return" => {
                take_args::<0>("return", args)?;
                Ok(Command::Return)
            }
            "nodes" | "nodes-of-group" => {
                let [group] = take_args("nodes", args)?;
                let group = index_arg(&group, "group")?;
                let group = u32::try_from(group).map_err(|_| Error::TypeMismatch {
                    argument: "group",
                    expected: "a group index within 32 bits",
                })?;
                Ok(Command::NodesOfGroup(group))
            }
            _ => Err(Error::UnknownCommand(handle.to_string())),
        }
    }
}

impl Session {
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::Assign(labels) => {
                self.assign(&labels)?;
                Ok(Reply::Empty)
            }
            Command::Move {
                strategy,
                node,
                column,
            } => Ok(Reply::Scalar(self.move_node(strategy, node, &column)?)),
            Command::Reduce(columns) => {
                self.accumulate_all(&columns)?;
                Ok(Reply::Empty)
            }
            Command::Flush => Ok(Reply::Column(self.flush()?)),
            Command::Return => Ok(Reply::Labels(
                self.tidy()?.into_iter().map(|g| g as u64 + 1).collect(),
            )),
            Command::NodesOfGroup(group) => Ok(Reply::Nodes(
                self.nodes_of(group)?.iter().map(|&v| v as u64 + 1).collect(),
            )),
        }
    }

    /// Parses and executes one command.
    pub fn call(&mut self, handle: &str, args: Vec<Value>) -> Result<Reply> {
        let command = Command::parse(handle, args)?;
        self.execute(command)
    }
}
