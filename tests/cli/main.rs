#[path = "../harness/mod.rs"]
mod harness;

mod generate;
mod usage;
