pub(crate) mod auxiliary;
pub mod delay;
pub mod sampler_error;
