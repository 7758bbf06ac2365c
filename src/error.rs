/// Errors raised while building an octree or answering a pair query.
///
/// All input validation happens before any tree is built, so an error never
/// leaves a half-constructed structure behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid input: at least {required} point(s) required, got {found}")]
    InvalidInput { required: usize, found: usize },

    #[error("insufficient points: at least {required} required, got {found}")]
    InsufficientPoints { required: usize, found: usize },

    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("epsilon must lie in the open interval (0, 1), got {0}")]
    InvalidEpsilon(f64),

    #[error("points {first} and {second} could not be separated (level {level})")]
    DegenerateGeometry { first: usize, second: usize, level: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
