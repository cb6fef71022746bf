use thiserror::Error;

/// Fatal model-construction errors.
///
/// These are deterministic structural mismatches; construction aborts and no
/// partial rotor is returned. Matrix accessors on a built rotor are
/// infallible.
#[derive(Debug, Error)]
pub enum RotorError {
    #[error("rotors must be modeled with 6 degrees of freedom, got {0}")]
    WrongDofCount(usize),

    #[error("rotor has no shaft elements")]
    EmptyRotor,

    #[error("shaft elements do not form a connected chain at node {0}")]
    DisconnectedShaft(usize),

    #[error("element references node {0}, which is not part of the rotor")]
    UnknownNode(usize),

    #[error("no gear element found at coupling node {0}")]
    MissingGear(usize),

    #[error("multiple gear elements found at coupling node {0}")]
    AmbiguousGear(usize),

    #[error("no rendered gear patch found for node {0}")]
    MissingGearTrace(usize),

    #[error("pressure angle must lie in (0, pi/2) rad, got {0}")]
    InvalidPressureAngle(f64),

    #[error("gear ratio must be positive, got {0}")]
    InvalidGearRatio(f64),

    #[error("gear mesh stiffness must be non-negative, got {0}")]
    InvalidMeshStiffness(f64),

    #[error("failed to read model file")]
    Read(#[from] std::io::Error),

    #[error("failed to parse model file")]
    Parse(#[from] serde_yaml::Error),
}
