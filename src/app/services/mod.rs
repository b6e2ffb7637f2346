pub mod scaffold_transaction;
pub mod script_renderer;

pub use scaffold_transaction::ScaffoldTransaction;
pub use script_renderer::ScriptRenderer;
