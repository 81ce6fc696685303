pub mod delete;

// Re-export handler functions for use in routing
pub use delete::delete_media;
