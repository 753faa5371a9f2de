// Projection handlers
pub mod p900_manifest_facts;

// Dashboard handlers
pub mod d400_branch_delivery;

// UseCase handlers
pub mod usecases;
