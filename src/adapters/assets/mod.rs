pub mod script_templates;
