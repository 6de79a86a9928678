//! Decoding many independent files at once.

use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::decode_file;
use crate::schema::Target;
use crate::{DecodeOptions, Result};

fn decode_one<T, P>(path: &P, options: &DecodeOptions) -> Result<T>
where
    T: Target + Default,
    P: AsRef<Path>,
{
    let mut target = T::default();
    decode_file(path, &mut target, options)?;
    Ok(target)
}

/// Decodes each path into its own fresh target. Results keep input order.
#[cfg(feature = "parallel")]
pub fn decode_paths<T, P>(paths: &[P], options: &DecodeOptions) -> Vec<Result<T>>
where
    T: Target + Default + Send,
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| decode_one(path, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn decode_paths<T, P>(paths: &[P], options: &DecodeOptions) -> Vec<Result<T>>
where
    T: Target + Default,
    P: AsRef<Path>,
{
    paths.iter().map(|path| decode_one(path, options)).collect()
}
