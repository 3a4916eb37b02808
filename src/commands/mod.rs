// Command handlers - the boundary between the UI/CLI and the stores
// Each returns Result<_, String> so failures can be shown to the user as-is

pub mod image;
pub mod settings;
pub mod startup;
pub mod task;
