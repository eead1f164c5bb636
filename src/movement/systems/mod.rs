//! Movement domain: system modules for locomotion updates.

pub(crate) mod input;
pub(crate) mod locomotion;

pub(crate) use input::{consume_input_edges, read_input};
pub(crate) use locomotion::tick_locomotion;
