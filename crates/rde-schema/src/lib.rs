#![deny(unsafe_code)]

mod compile;
mod loaders;
mod raw;

pub use compile::compile_cell_rule;
pub use loaders::{
    DEFAULT_SCHEMA_YAML, load_default_schema, load_schema, load_schema_or_default, parse_schema,
    schema_path_from_env,
};
