//! Combinator and circuit conditions.
//!
//! A [`Condition`] is the normalized form of the game's nested
//! `decider_conditions` / `arithmetic_conditions` / `circuit_condition`
//! objects. Every field is optional: a condition is built up by merging
//! patches, and export writes only the fields that are set.

use blueprint_core::catalog::EntityKind;
use blueprint_core::error::{CapabilityError, EntityError, ValidationError};
use blueprint_core::names::{Lookup, NameCanonicalizer};
use blueprint_data::schema::{ConditionData, LooseBool, SignalIdData};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SIGNAL_EACH: &str = "signal_each";
pub const SIGNAL_EVERYTHING: &str = "signal_everything";
pub const SIGNAL_ANYTHING: &str = "signal_anything";

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Comparison operator for decider and circuit conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
    Ne,
}

impl ComparisonOp {
    /// Parse a comparator symbol. The legacy `:` means equality, and ASCII
    /// spellings of the two-character operators are accepted.
    pub fn parse(symbol: &str) -> Option<Self> {
        Some(match symbol {
            ">" => ComparisonOp::Gt,
            "<" => ComparisonOp::Lt,
            "=" | ":" => ComparisonOp::Eq,
            "≥" | ">=" => ComparisonOp::Gte,
            "≤" | "<=" => ComparisonOp::Lte,
            "≠" | "!=" => ComparisonOp::Ne,
            _ => return None,
        })
    }

    /// The symbol the game writes.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Eq => "=",
            ComparisonOp::Gte => "≥",
            ComparisonOp::Lte => "≤",
            ComparisonOp::Ne => "≠",
        }
    }
}

/// Arithmetic combinator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

impl ArithmeticOp {
    pub fn parse(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => ArithmeticOp::Add,
            "-" => ArithmeticOp::Sub,
            "*" => ArithmeticOp::Mul,
            "/" => ArithmeticOp::Div,
            "%" => ArithmeticOp::Mod,
            "^" => ArithmeticOp::Pow,
            "<<" => ArithmeticOp::Shl,
            ">>" => ArithmeticOp::Shr,
            "AND" => ArithmeticOp::And,
            "OR" => ArithmeticOp::Or,
            "XOR" => ArithmeticOp::Xor,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
            ArithmeticOp::Pow => "^",
            ArithmeticOp::Shl => "<<",
            ArithmeticOp::Shr => ">>",
            ArithmeticOp::And => "AND",
            ArithmeticOp::Or => "OR",
            ArithmeticOp::Xor => "XOR",
        }
    }
}

/// Either kind of operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Compare(ComparisonOp),
    Arithmetic(ArithmeticOp),
}

impl Operator {
    /// Parse any operator symbol, comparisons first.
    pub fn parse(symbol: &str) -> Result<Self, ValidationError> {
        ComparisonOp::parse(symbol)
            .map(Operator::Compare)
            .or_else(|| ArithmeticOp::parse(symbol).map(Operator::Arithmetic))
            .ok_or_else(|| ValidationError::UnknownOperator(symbol.to_string()))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Compare(op) => op.symbol(),
            Operator::Arithmetic(op) => op.symbol(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Operands and read mode
// ---------------------------------------------------------------------------

/// Right-hand side of a condition: a signal or a constant, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Signal(String),
    Constant(i32),
}

/// How a circuit-connected container reports its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadMode {
    Pulse,
    Hold,
}

impl ReadMode {
    /// Parse `"pulse"` or `"hold"`.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        match token {
            "pulse" => Ok(ReadMode::Pulse),
            "hold" => Ok(ReadMode::Hold),
            other => Err(ValidationError::InvalidReadMode(other.to_string())),
        }
    }

    /// The external flag: `0` is pulse, anything else hold.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 {
            ReadMode::Pulse
        } else {
            ReadMode::Hold
        }
    }

    pub fn flag(self) -> u8 {
        match self {
            ReadMode::Pulse => 0,
            ReadMode::Hold => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Normalized combinator or circuit condition. Signal names are canonical.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub left: Option<String>,
    pub right: Option<Operand>,
    pub operator: Option<Operator>,
    pub out: Option<String>,
    pub count_from_input: Option<bool>,
    pub control_enable: Option<bool>,
    pub read_contents: Option<bool>,
    pub read_mode: Option<ReadMode>,
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overlay `patch` on `self`: set fields in the patch win, unset fields
    /// keep their current value.
    pub fn merge(&self, patch: &Condition) -> Condition {
        Condition {
            left: patch.left.clone().or_else(|| self.left.clone()),
            right: patch.right.clone().or_else(|| self.right.clone()),
            operator: patch.operator.or(self.operator),
            out: patch.out.clone().or_else(|| self.out.clone()),
            count_from_input: patch.count_from_input.or(self.count_from_input),
            control_enable: patch.control_enable.or(self.control_enable),
            read_contents: patch.read_contents.or(self.read_contents),
            read_mode: patch.read_mode.or(self.read_mode),
        }
    }

    /// Canonicalize every signal name in place.
    pub fn canonicalize(&mut self, names: &dyn NameCanonicalizer) {
        if let Some(left) = &mut self.left {
            *left = names.to_internal(left);
        }
        if let Some(Operand::Signal(right)) = &mut self.right {
            *right = names.to_internal(right);
        }
        if let Some(out) = &mut self.out {
            *out = names.to_internal(out);
        }
    }

    /// Check a patch against the entity it is meant for, then check the
    /// merged result. Returns the merged condition.
    pub fn apply(
        &self,
        patch: &Condition,
        kind: EntityKind,
        entity: &str,
    ) -> Result<Condition, EntityError> {
        if patch.count_from_input.is_some() && kind != EntityKind::DeciderCombinator {
            return Err(CapabilityError::NoCountFromInput {
                entity: entity.to_string(),
            }
            .into());
        }
        let merged = self.merge(patch);
        merged.validate(kind)?;
        Ok(merged)
    }

    /// Check the signal rules that hold for every condition.
    pub fn validate(&self, kind: EntityKind) -> Result<(), ValidationError> {
        if kind == EntityKind::ArithmeticCombinator {
            for signal in [&self.left, &self.out].into_iter().flatten() {
                if signal == SIGNAL_EVERYTHING || signal == SIGNAL_ANYTHING {
                    return Err(ValidationError::WildcardInArithmetic {
                        signal: signal.clone(),
                    });
                }
            }
        }
        if self.out.as_deref() == Some(SIGNAL_EACH) && self.left.as_deref() != Some(SIGNAL_EACH) {
            return Err(ValidationError::EachOutputNeedsEachInput);
        }
        if let (Some(Operator::Arithmetic(op)), false) =
            (self.operator, kind == EntityKind::ArithmeticCombinator)
        {
            return Err(ValidationError::UnknownOperator(op.symbol().to_string()));
        }
        Ok(())
    }

    // -- External mapping --

    /// Read a condition object as written by the game.
    pub fn from_data(
        data: &ConditionData,
        kind: EntityKind,
        names: &dyn NameCanonicalizer,
    ) -> Result<Condition, ValidationError> {
        let signal = |s: &Option<SignalIdData>| s.as_ref().map(|s| names.to_internal(&s.name));

        let right = match (&data.second_signal, data.constant) {
            (Some(s), _) => Some(Operand::Signal(names.to_internal(&s.name))),
            (None, Some(c)) => Some(Operand::Constant(c)),
            (None, None) => None,
        };

        let operator = match (&data.comparator, &data.operation) {
            (Some(cmp), _) => Some(Operator::Compare(
                ComparisonOp::parse(cmp)
                    .ok_or_else(|| ValidationError::UnknownOperator(cmp.clone()))?,
            )),
            (None, Some(op)) => Some(Operator::Arithmetic(
                ArithmeticOp::parse(op)
                    .ok_or_else(|| ValidationError::UnknownOperator(op.clone()))?,
            )),
            (None, None) => None,
        };

        let count_from_input = if kind == EntityKind::DeciderCombinator {
            data.copy_count_from_input.as_ref().map(|b| b.0)
        } else {
            None
        };

        Ok(Condition {
            left: signal(&data.first_signal),
            right,
            operator,
            out: signal(&data.output_signal),
            count_from_input,
            control_enable: data.circuit_enable_disable,
            read_contents: data.circuit_read_hand_contents,
            read_mode: data.circuit_contents_read_mode.map(ReadMode::from_flag),
        })
    }

    /// Write the condition in the game's shape. Arithmetic combinators get
    /// `operation`; every other kind gets `comparator` and
    /// `copy_count_from_input`.
    pub fn to_data(&self, kind: EntityKind, lookup: Lookup<'_>) -> ConditionData {
        let signal = |name: &str| SignalIdData {
            signal_type: lookup.catalog.signal_type(name),
            name: lookup.external(name),
        };
        let (second_signal, constant) = match &self.right {
            Some(Operand::Signal(name)) => (Some(signal(name)), None),
            Some(Operand::Constant(c)) => (None, Some(*c)),
            None => (None, None),
        };
        let operator = self.operator.map(|op| op.symbol().to_string());
        let arithmetic = kind == EntityKind::ArithmeticCombinator;

        ConditionData {
            first_signal: self.left.as_deref().map(signal),
            second_signal,
            constant,
            operation: if arithmetic { operator.clone() } else { None },
            comparator: if arithmetic { None } else { operator },
            output_signal: self.out.as_deref().map(signal),
            circuit_enable_disable: self.control_enable,
            circuit_read_hand_contents: self.read_contents,
            circuit_contents_read_mode: self.read_mode.map(ReadMode::flag),
            copy_count_from_input: if arithmetic {
                None
            } else {
                self.count_from_input.map(LooseBool)
            },
        }
    }
}
