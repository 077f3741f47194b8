//! Testing utilities.
pub(crate) mod route_builder;
pub(crate) mod test_context;
