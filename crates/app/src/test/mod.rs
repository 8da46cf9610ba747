//! Test fakes shared across unit tests.

mod catalog;

pub(crate) use catalog::ScriptedCatalog;
