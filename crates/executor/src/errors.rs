// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{io, sync::Arc};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Error type for the executor crate
#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),

    #[diagnostic(transparent)]
    #[error(transparent)]
    Kdl(#[from] kdl::KdlError),

    #[diagnostic(transparent)]
    #[error(transparent)]
    InvalidArguments(#[from] InvalidArguments),

    #[diagnostic(transparent)]
    #[error(transparent)]
    InvalidType(#[from] InvalidType),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnsupportedNode(#[from] UnsupportedNode),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnsupportedProperty(#[from] UnsupportedProperty),

    /// Device enumeration or allocation failed
    #[error(transparent)]
    Devices(#[from] devices::Error),

    /// The platform could not identify this instance
    #[error("no instance id available")]
    MissingInstanceId,
}

impl Error {
    /// Returns true if allocation failed because no device slot was left
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::Devices(e) if e.is_exhausted())
    }
}

/// Error for invalid types
#[derive(Debug, Diagnostic, Error)]
#[error("invalid type for {id}, expected string")]
#[diagnostic(severity(error))]
pub struct InvalidType {
    #[source_code]
    pub src: NamedSource<Arc<String>>,

    #[label]
    pub at: SourceSpan,

    pub id: String,

    #[help]
    pub advice: Option<String>,
}

/// Error for unsupported node types
#[derive(Debug, Diagnostic, Error)]
#[error("unsupported node: {name}")]
#[diagnostic(severity(error))]
pub struct UnsupportedNode {
    #[source_code]
    pub src: NamedSource<Arc<String>>,

    #[label]
    pub at: SourceSpan,

    pub name: String,

    #[help]
    pub advice: Option<String>,
}

/// Error for unknown properties
#[derive(Debug, Diagnostic, Error)]
#[error("unsupported property: {name}")]
#[diagnostic(severity(error))]
pub struct UnsupportedProperty {
    #[source_code]
    pub src: NamedSource<Arc<String>>,

    #[label]
    pub at: SourceSpan,

    pub name: String,

    #[help]
    pub advice: Option<String>,
}

/// Error for invalid arguments
#[derive(Debug, Diagnostic, Error)]
#[error("invalid arguments")]
#[diagnostic(severity(error))]
pub struct InvalidArguments {
    #[source_code]
    pub src: NamedSource<Arc<String>>,

    #[label]
    pub at: SourceSpan,

    #[help]
    pub advice: Option<String>,
}
