//! Numeric element abstraction over the six supported widths/kinds.
//!
//! One generic kernel implementation replaces a per-type copy for every
//! operation: an element widens to `f64` for arithmetic and narrows back to
//! its native width on store, truncating toward zero exactly like the lossy
//! casts the storage format inherits.

use bytemuck::Pod;

use crate::error::KernelError;
use crate::types::ElementType;

/// A storable array element.
///
/// Fill-value comparison goes through `PartialEq` on the native type
/// rather than after widening, so float sentinels follow IEEE equality
/// (`-0.0` matches `0.0`, NaN matches nothing).
pub trait Element: Pod + PartialEq + PartialOrd + Send + Sync + 'static {
    const ELEMENT_TYPE: ElementType;

    /// Lossless conversion into the arithmetic domain.
    fn widen(self) -> f64;

    /// Lossy conversion back to the native width, truncating toward zero
    /// and saturating at the type bounds.
    fn narrow(value: f64) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $tag:expr) => {
        impl Element for $ty {
            const ELEMENT_TYPE: ElementType = $tag;

            #[inline]
            fn widen(self) -> f64 {
                self as f64
            }

            #[inline]
            fn narrow(value: f64) -> Self {
                value as Self
            }
        }
    };
}

impl_element!(i8, ElementType::Int8);
impl_element!(i16, ElementType::Int16);
impl_element!(i32, ElementType::Int32);
impl_element!(i64, ElementType::Int64);
impl_element!(f32, ElementType::Float32);
impl_element!(f64, ElementType::Float64);

/// Dispatches a block over the concrete element type behind an
/// [`ElementType`] tag. The block sees the type as `$t`.
macro_rules! with_element {
    ($tag:expr, $t:ident => $body:expr) => {
        match $tag {
            $crate::types::ElementType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::types::ElementType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::types::ElementType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::types::ElementType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::types::ElementType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::types::ElementType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}

pub(crate) use with_element;

/// Read-only typed view over a raw element buffer.
///
/// The length is validated once at construction; per-element access then
/// uses unaligned loads, since chunk buffers arrive as plain byte vectors
/// with no alignment guarantee.
pub struct ChunkView<'a, T: Element> {
    bytes: &'a [u8],
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: Element> ChunkView<'a, T> {
    pub fn new(bytes: &'a [u8], expected_elements: usize) -> Result<Self, KernelError> {
        let expected = expected_elements * std::mem::size_of::<T>();
        if bytes.len() != expected {
            return Err(KernelError::BufferSizeMismatch {
                expected,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            _marker: std::marker::PhantomData,
        })
    }

    #[inline]
    pub fn get(&self, idx: usize) -> T {
        let step = std::mem::size_of::<T>();
        bytemuck::pod_read_unaligned(&self.bytes[idx * step..idx * step + step])
    }
}

/// Mutable typed view over a raw element buffer.
pub struct ChunkViewMut<'a, T: Element> {
    bytes: &'a mut [u8],
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: Element> ChunkViewMut<'a, T> {
    pub fn new(bytes: &'a mut [u8], expected_elements: usize) -> Result<Self, KernelError> {
        let expected = expected_elements * std::mem::size_of::<T>();
        if bytes.len() != expected {
            return Err(KernelError::BufferSizeMismatch {
                expected,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            _marker: std::marker::PhantomData,
        })
    }

    #[inline]
    pub fn get(&self, idx: usize) -> T {
        let step = std::mem::size_of::<T>();
        bytemuck::pod_read_unaligned(&self.bytes[idx * step..idx * step + step])
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: T) {
        let step = std::mem::size_of::<T>();
        self.bytes[idx * step..idx * step + step].copy_from_slice(bytemuck::bytes_of(&value));
    }
}

/// Decodes an optional native-encoded fill value for the element type.
pub fn decode_fill<T: Element>(fill: Option<&[u8]>) -> Result<Option<T>, KernelError> {
    match fill {
        None => Ok(None),
        Some(bytes) => {
            if bytes.len() != std::mem::size_of::<T>() {
                return Err(KernelError::FillValueSizeMismatch {
                    expected: std::mem::size_of::<T>(),
                    got: bytes.len(),
                });
            }
            Ok(Some(bytemuck::pod_read_unaligned(bytes)))
        }
    }
}
