//! # File System Module
//!
//! Filesystem formats the toolkit decodes in process.  At present only
//! CramFS qualifies; every other filesystem or archive found during a scan is
//! handed to an external decoder by its classifier.

pub mod cramfs;
