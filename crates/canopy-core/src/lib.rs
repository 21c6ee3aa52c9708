//! Canopy Core Types and Definitions
//!
//! This crate provides the foundational model types shared by the Canopy
//! crates. It includes:
//!
//! - **Declarations**: Type declarations handed in by a compiler front-end
//!   ([`declaration`] module)
//! - **Scenes**: Node trees produced by the scene grammar parser
//!   ([`scene`] module)

pub mod declaration;
pub mod scene;
