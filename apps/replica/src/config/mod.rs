pub mod replica;

pub use replica::ReplicaConfig;
