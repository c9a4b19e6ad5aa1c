//! Error handling for the mapstream library.
//!
//! This module defines the error taxonomy for backend acquisition, index
//! loading, threading configuration, and mapping failures, together with the
//! boxed error alias used at the engine boundary.

use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for mapstream operations.
///
/// This type is used throughout the library for any operation that can fail.
/// It's equivalent to `std::result::Result<T, MapstreamError>`.
pub type Result<T> = std::result::Result<T, MapstreamError>;

/// Boxed error type carried across the engine boundary.
///
/// Engine implementations keep their own error enums; they cross into the
/// core as trait objects and surface inside [`MapstreamError::IndexLoad`] or
/// [`MapstreamError::Engine`].
pub type EngineError = Box<dyn StdError + Send + Sync>;

/// Result type returned by engine trait methods.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Error types for mapstream operations.
///
/// Each variant maps to one failure domain: backend acquisition, index
/// construction, threading configuration, or the engine's own mapping
/// failures. All of them propagate to the caller unmodified; the
/// empty-sequence skip rule is a filtering behavior and is never reported
/// through this enum.
///
/// # Examples
///
/// ```rust
/// use mapstream::MapstreamError;
///
/// let err = MapstreamError::Unsupported {
///     reason: "sequential backend has no worker pool",
/// };
///
/// match err {
///     MapstreamError::Unsupported { reason } => {
///         assert!(reason.contains("worker pool"));
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum MapstreamError {
    /// Neither engine variant could be acquired at process start.
    ///
    /// Absence is terminal for the process lifetime: the probe runs once and
    /// is never retried per call.
    #[error("no alignment engine backend is available")]
    BackendUnavailable,

    /// The engine rejected the index path or options at construction.
    ///
    /// Fatal to the mapper instance being built; no partially constructed
    /// instance is ever returned.
    #[error("failed to load alignment index from {}", path.display())]
    IndexLoad {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    /// Threading control was requested where it cannot apply.
    ///
    /// Raised on a backend without concurrency support, on a second
    /// configuration attempt, or once mapping has started. Fatal to the call
    /// only; the instance remains usable for mapping.
    #[error("unsupported operation: {reason}")]
    Unsupported { reason: &'static str },

    /// The underlying engine failed during a mapping call or batch drain.
    ///
    /// Terminates the in-progress result sequence; tuples already yielded
    /// remain valid. Not retried by the core.
    #[error("alignment engine failure")]
    Engine(#[source] EngineError),
}

/// Trait for converting foreign errors into [`MapstreamError::Engine`].
///
/// Engine implementations can use this to hand any error type across the
/// boundary without writing conversion code.
///
/// # Examples
///
/// ```rust
/// use mapstream::{IntoMapstreamError, MapstreamError};
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pool hung up");
/// let err = io_err.into_mapstream_error();
///
/// assert!(matches!(err, MapstreamError::Engine(_)));
/// ```
pub trait IntoMapstreamError {
    /// Converts the error into a [`MapstreamError`].
    fn into_mapstream_error(self) -> MapstreamError;
}

impl<E> IntoMapstreamError for E
where
    E: StdError + Send + Sync + 'static,
{
    fn into_mapstream_error(self) -> MapstreamError {
        MapstreamError::Engine(self.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct PoolError(String);

    impl fmt::Display for PoolError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pool error: {}", self.0)
        }
    }

    impl StdError for PoolError {}

    #[test]
    fn test_error_display_messages() {
        let err = MapstreamError::BackendUnavailable;
        assert!(format!("{}", err).contains("no alignment engine"));

        let err = MapstreamError::IndexLoad {
            path: PathBuf::from("/refs/grch38.fa"),
            source: "bad magic".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("/refs/grch38.fa"));

        let err = MapstreamError::Unsupported {
            reason: "thread pool may only be configured once",
        };
        assert!(format!("{}", err).contains("configured once"));

        let err = MapstreamError::Engine("worker died".into());
        assert!(format!("{}", err).contains("engine failure"));
    }

    #[test]
    fn test_error_source_chain() {
        let err = MapstreamError::IndexLoad {
            path: PathBuf::from("ref.fa"),
            source: Box::new(PoolError("truncated".to_string())),
        };
        let source = err.source().expect("index load carries a source");
        assert!(format!("{}", source).contains("truncated"));

        let err = MapstreamError::Engine(Box::new(PoolError("oom".to_string())));
        let source = err.source().expect("engine failure carries a source");
        assert!(source.downcast_ref::<PoolError>().is_some());

        assert!(MapstreamError::BackendUnavailable.source().is_none());
    }

    #[test]
    fn test_into_mapstream_error_blanket() {
        let err = PoolError("queue closed".to_string()).into_mapstream_error();
        match err {
            MapstreamError::Engine(boxed) => {
                assert!(format!("{}", boxed).contains("queue closed"));
            }
            other => panic!("expected Engine variant, got {:?}", other),
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<MapstreamError>();
        is_sync::<MapstreamError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn ready() -> Result<u32> {
            Ok(7)
        }
        fn failing() -> Result<u32> {
            Err(MapstreamError::BackendUnavailable)
        }

        assert_eq!(ready().unwrap(), 7);
        assert!(failing().is_err());
    }
}
