// Error type for the generator.
//
// Only caller mistakes surface as errors: an invalid config, an empty point
// set handed to the triangulator, or a pass that placed no rooms at all.
// Everything the algorithms are expected to run into (a room slot that never
// fits, a degenerate tetrahedron, a disconnected graph, an unreachable
// hallway) degrades gracefully and is reported through `LayoutStats` instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("invalid dungeon config: {reason}")]
    InvalidConfig { reason: String },

    #[error("cannot triangulate an empty point set")]
    EmptyPointSet,

    #[error("no rooms could be placed ({target} requested, {attempts} attempts each)")]
    NoRoomsPlaced { target: u32, attempts: u32 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        GenError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = GenError::invalid_config("bounds.x must be at least 1");
        assert_eq!(
            e.to_string(),
            "invalid dungeon config: bounds.x must be at least 1"
        );
        let e = GenError::NoRoomsPlaced {
            target: 5,
            attempts: 10,
        };
        assert!(e.to_string().contains("5 requested"));
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: GenError = err.into();
        assert!(matches!(e, GenError::Json(_)));
    }
}
