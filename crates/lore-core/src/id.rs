use uuid::Uuid;

/// Opaque identifier for entities created on either side of the boundary.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
