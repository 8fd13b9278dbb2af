use crate::geometry::TopologyError;
use crate::location::LocationFilter;
use crate::types::{OwnerId, ParcelId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied invalid input and can retry with a corrected call.
    RejectedInput,

    /// An upstream shape is malformed; the data has to be fixed.
    GeometryFailure,
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Parcel list is empty")]
    EmptyInput,

    #[error("Duplicate parcel id: {0}")]
    DuplicateParcel(ParcelId),

    #[error("Invalid owner id: {0} (must be positive)")]
    InvalidOwner(OwnerId),

    #[error("Invalid suggestion limit: {0} (must be positive)")]
    InvalidLimit(usize),

    #[error("At least one of district, municipality or county must be given")]
    MissingLocationFilter,

    #[error("No parcels match {0}")]
    NoMatchingParcels(LocationFilter),

    #[error("Graph build error: invalid shape for parcel {parcel}: {source}")]
    InvalidShape {
        parcel: ParcelId,
        #[source]
        source: TopologyError,
    },

    #[error("Graph build error: topology failure between parcels {first} and {second}: {source}")]
    Topology {
        first: ParcelId,
        second: ParcelId,
        #[source]
        source: TopologyError,
    },
}

impl GraphError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidShape { .. } | Self::Topology { .. } => ErrorKind::GeometryFailure,
            _ => ErrorKind::RejectedInput,
        }
    }

    #[must_use]
    pub const fn is_rejected_input(&self) -> bool {
        matches!(self.kind(), ErrorKind::RejectedInput)
    }
}
