//! # Integration Tests
//!
//! Every test runs against a [`bc_chaincode::ChaincodeHost`], so each
//! invocation is a committed or rolled-back proposal exactly as a peer
//! would see it.

pub mod conservation;
pub mod dispatch;
pub mod runtime;
pub mod scenario;
