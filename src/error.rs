use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("operation request has no operation name")]
    MissingOperation,
    #[error("unknown operation `{name}`")]
    UnknownOperation { name: String },
    #[error("array descriptor has no dimensions")]
    EmptyExtents,
    #[error("chunk buffer holds {got} bytes, descriptor requires {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
    #[error("fill value holds {got} bytes, element type requires {expected}")]
    FillValueSizeMismatch { expected: usize, got: usize },
    #[error("output buffer holds {got} bytes, merge requires {required}")]
    OutputTooSmall { required: usize, got: usize },
    #[error("chunk accumulator kind does not match operation `{operation}`")]
    AccumulatorMismatch { operation: &'static str },
}
