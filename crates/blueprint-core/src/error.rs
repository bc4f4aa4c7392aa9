//! Error taxonomy shared by every crate that mutates entities.

/// An operation needs a capability the entity's catalog entry lacks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("{entity} has no direction type; usually only underground belts do")]
    NoDirectionType { entity: String },
    #[error("{entity} cannot have a recipe")]
    NoRecipe { entity: String },
    #[error("{entity} cannot hold modules")]
    NoModules { entity: String },
    #[error("{entity} has no inventory, so it cannot have a bar")]
    NoInventory { entity: String },
    #[error("{entity} is not a constant combinator, so it has no constants")]
    NoConstants { entity: String },
    #[error("{entity} is not a decider combinator, so it cannot count from input")]
    NoCountFromInput { entity: String },
    #[error("{entity} does not take a circuit condition")]
    NoCondition { entity: String },
    #[error("{entity} has no speaker parameters")]
    NoParameters { entity: String },
    #[error("{entity} has no alert parameters")]
    NoAlertParameters { entity: String },
}

/// Malformed input: a value the model refuses rather than clamps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid side '{0}': expected 1, 2, \"in\" or \"out\"")]
    InvalidSide(String),
    #[error("{0} is an invalid constant index (must be between 0 and 17 inclusive)")]
    ConstantIndexOutOfRange(i64),
    #[error("read mode must be \"pulse\" or \"hold\", got '{0}'")]
    InvalidReadMode(String),
    #[error("direction type must be \"input\" or \"output\", got '{0}'")]
    InvalidDirectionType(String),
    #[error("bar must be a positive value, got {0}")]
    NegativeBar(i64),
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error(
        "only comparative conditions can contain {signal}; use signal_each instead"
    )]
    WildcardInArithmetic { signal: String },
    #[error("left signal must be signal_each for the output to be signal_each")]
    EachOutputNeedsEachInput,
}

/// External data that does not have the required shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{kind} '{name}' has no position")]
    MissingPosition { kind: &'static str, name: String },
    #[error("{kind} '{name}' lies more than 1000000 tiles from the origin")]
    PositionOutOfRange { kind: &'static str, name: String },
    #[error("connection references entity {0}, which is not in the entity list")]
    DanglingConnection(u32),
}

/// Any failure raised by an entity or tile operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        let err = CapabilityError::NoInventory {
            entity: "small_lamp".into(),
        };
        assert!(err.to_string().contains("small_lamp"));
    }

    #[test]
    fn wraps_into_entity_error() {
        let err: EntityError = ValidationError::ConstantIndexOutOfRange(18).into();
        assert!(matches!(
            err,
            EntityError::Validation(ValidationError::ConstantIndexOutOfRange(18))
        ));
        assert!(err.to_string().contains("18"));
    }
}
