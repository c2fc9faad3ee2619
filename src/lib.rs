pub mod core;
pub mod graph;
pub mod module;
pub mod nodes;
pub mod schema;
