//! Circuit gadgets over the substrate in [`crate::r1cs`].
//!
//! All gadgets follow the same two-phase contract: construction allocates
//! variables and fixes the constraint topology, `generate_constraints`
//! records the rank-1 relations, and `generate_witness` fills in concrete
//! field values. Topology never depends on witness data.

pub mod fields;
pub mod pairing;
