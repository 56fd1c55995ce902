use hifitime::{Duration, Epoch};
use thiserror::Error;

/// Error type shared by every fallible operation in the crate.
///
/// Two families of hard errors exist, mirroring the two observer sources:
/// data-unavailable errors (the trajectory service is unreachable, returns an
/// unusable payload, or has no sample close enough to the requested epoch) and
/// malformed-metadata errors (a required image header field is missing or
/// unparseable). A geometrically undefined transform result is **not** an
/// error: it is reported as
/// [`Projection::Undefined`](crate::ref_system::Projection::Undefined).
#[derive(Error, Debug)]
pub enum HeliovisError {
    #[error("ephemeris service unreachable: {0}")]
    ServiceUnreachable(#[from] ureq::Error),

    #[error("malformed ephemeris response: {0}")]
    MalformedEphemeris(String),

    #[error("no ephemeris sample within {max_gap} of {requested} (nearest sample is {nearest_gap} away)")]
    NoEphemerisSample {
        requested: Epoch,
        max_gap: Duration,
        nearest_gap: Duration,
    },

    #[error("unknown instrument identifier: {0}")]
    UnknownInstrument(String),

    #[error("missing metadata field: {0}")]
    MissingMetadataField(String),

    #[error("malformed metadata field {field}: {value:?}")]
    MalformedMetadataField { field: String, value: String },

    #[error("malformed observation timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid position component: {0}")]
    InvalidFloat(#[from] ordered_float::FloatIsNan),
}

impl PartialEq for HeliovisError {
    fn eq(&self, other: &Self) -> bool {
        use HeliovisError::*;
        match (self, other) {
            (MalformedEphemeris(a), MalformedEphemeris(b)) => a == b,
            (
                NoEphemerisSample {
                    requested: r1,
                    max_gap: m1,
                    nearest_gap: n1,
                },
                NoEphemerisSample {
                    requested: r2,
                    max_gap: m2,
                    nearest_gap: n2,
                },
            ) => r1 == r2 && m1 == m2 && n1 == n2,
            (UnknownInstrument(a), UnknownInstrument(b)) => a == b,
            (MissingMetadataField(a), MissingMetadataField(b)) => a == b,
            (
                MalformedMetadataField { field: f1, value: v1 },
                MalformedMetadataField { field: f2, value: v2 },
            ) => f1 == f2 && v1 == v2,
            (MalformedTimestamp(a), MalformedTimestamp(b)) => a == b,
            (InvalidFloat(a), InvalidFloat(b)) => a == b,

            // Not comparable beyond the variant itself
            (ServiceUnreachable(_), ServiceUnreachable(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
