use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Invalid page description: {0}")]
    Json(#[from] serde_json::Error),
}
