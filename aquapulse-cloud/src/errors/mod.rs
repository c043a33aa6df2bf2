mod cloud;
mod export;

pub use cloud::CloudError;
pub use export::ExportError;
