//! Erasure-coding bulk operations over the Solinas-64 field.
//!
//! A recovery packet is the matrix-vector product R = sum(m_i * f_i) over
//! p = 2^64 - 2^32 + 1, where f_i are equal-sized data blocks read as field
//! words and m_i are seed-derived nonzero coefficients:
//! - **region**: scalar-times-region and scalar-times-region-accumulate, plus
//!   the inverse mapping that turns a packed region back into bytes
//! - **encoder**: the encode driver deriving coefficients and folding rows
//!
//! All buffers are caller-owned and sized through
//! [`sol64_codec::AppDataReader`]'s helpers; nothing here allocates.

pub mod encoder;
pub mod region;


pub use encoder::{encode, recovery_coefficient, EncodeError};
pub use region::{multiply_add_region, multiply_region, recover_region};
