//! # upload_or_check
//!
//! Upload built conda distributions to anaconda.org unless they are
//! already there.
//!
//! A run lists the packages conda-build left under `noarch/` and the
//! platform subdir, asks anaconda.org which of them the owner already has,
//! and hands the rest to `anaconda upload` with a short-lived token file.
//! Transient failures re-run the whole pass with quadratic backoff.
//!
//! ## Usage
//!
//! ```bash
//! upload_or_check ./recipe conda-forge                  # check, upload if BINSTAR_TOKEN is set
//! upload_or_check ./recipe my-org --channel dev         # upload onto the "dev" label
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifact;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod upload;

pub use artifact::{ArtifactRef, built_distributions, split_pkg};
pub use batch::{BatchContext, BatchOutcome, upload_or_check};
pub use cli::{Args, RetryPolicy, RuntimeConfig, retry_with_backoff};
pub use config::{EnvConfig, Token};
pub use error::{Result, UploadError};
pub use index::{AnacondaApi, ChannelListing, PackageIndex};
pub use upload::{AnacondaCli, TokenFile, Uploader};
