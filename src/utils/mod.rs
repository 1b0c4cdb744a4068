pub mod debounce;
pub mod draft_ops;
